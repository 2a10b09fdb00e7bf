/*!
Endpoints serving Student callers: the plan catalog, signup, and the
student's own lesson list.
*/
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    Json,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::config::Glob;
use crate::error::Error;
use crate::user::{Plan, Role, PLAN_CATALOG};
use super::*;

/// `GET /plans`: the read-only subscription catalog shown at signup.
pub async fn plans() -> Response {
    log::trace!("plans() called.");

    Json(PLAN_CATALOG).into_response()
}

#[derive(Debug, Deserialize)]
pub struct SignupData {
    name: String,
    email: String,
    plan: Plan,
}

/// `POST /students`: open signup. The only directory mutation that needs
/// no admin context.
pub async fn signup(
    Extension(glob): Extension<Arc<Glob>>,
    body: String,
) -> Result<Response, Error> {
    log::trace!("student::signup( [ glob ], [ body ] ) called.");

    let data: SignupData = read_body(&body)?;
    if data.name.trim().is_empty() {
        return Err(Error::Validation("name must not be blank".to_owned()));
    }
    if data.email.trim().is_empty() {
        return Err(Error::Validation("email must not be blank".to_owned()));
    }

    let student = glob.store.insert_student(
        data.name.trim(),
        data.email.trim(),
        data.plan,
    ).await?;

    log::info!(
        "Student {} ({}) signed up on the {} plan.",
        student.id, &student.email, student.plan
    );
    Ok((StatusCode::CREATED, Json(student)).into_response())
}

/// `GET /students/lessons`: the lessons the calling student participates
/// in, and no one else's.
pub async fn own_lessons(
    headers: HeaderMap,
    Extension(glob): Extension<Arc<Glob>>,
) -> Result<Response, Error> {
    log::trace!("student::own_lessons( [ headers ], [ glob ] ) called.");

    let caller = caller_from_headers(&headers)?;
    if caller.role != Role::Student {
        return Err(Error::Unauthorized(
            "this listing is for student callers".to_owned()
        ));
    }

    let lessons = glob.store.lessons_for_student(caller.id).await?;
    Ok(Json(lessons).into_response())
}
