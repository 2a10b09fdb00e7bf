/*!
Endpoints for Admin callers: directory CRUD over students, teachers, and
admin accounts.

Admin capability stops at the directory; there is deliberately no
admin-wide lesson listing. Every handler here gates on `require_admin`
before touching the store.
*/
use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    Json,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::config::Glob;
use crate::error::Error;
use crate::user::{Language, Plan, Track};
use super::*;

#[derive(Debug, Deserialize)]
pub struct StudentData {
    name: String,
    email: String,
    plan: Plan,
}

#[derive(Debug, Deserialize)]
pub struct TeacherData {
    name: String,
    email: String,
    language: Language,
    track: Track,
}

/// Update half of the teacher record. Language and track are immutable
/// classification, so a payload naming them is rejected rather than
/// quietly ignored.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeacherUpdate {
    name: String,
    email: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminData {
    name: String,
    email: String,
}

/// `GET /students`
pub async fn list_students(
    headers: HeaderMap,
    Extension(glob): Extension<Arc<Glob>>,
) -> Result<Response, Error> {
    log::trace!("admin::list_students( [ headers ], [ glob ] ) called.");

    let caller = caller_from_headers(&headers)?;
    require_admin(&glob, &caller).await?;

    let students = glob.store.get_students().await?;
    Ok(Json(students).into_response())
}

/// `GET /admins`
pub async fn list_admins(
    headers: HeaderMap,
    Extension(glob): Extension<Arc<Glob>>,
) -> Result<Response, Error> {
    log::trace!("admin::list_admins( [ headers ], [ glob ] ) called.");

    let caller = caller_from_headers(&headers)?;
    require_admin(&glob, &caller).await?;

    let admins = glob.store.get_admins().await?;
    Ok(Json(admins).into_response())
}

/// `POST /teachers`
pub async fn add_teacher(
    headers: HeaderMap,
    Extension(glob): Extension<Arc<Glob>>,
    body: String,
) -> Result<Response, Error> {
    log::trace!("admin::add_teacher( [ headers ], [ glob ], [ body ] ) called.");

    let caller = caller_from_headers(&headers)?;
    require_admin(&glob, &caller).await?;

    let data: TeacherData = read_body(&body)?;
    let teacher = glob.store.insert_teacher(
        data.name.trim(),
        data.email.trim(),
        data.language,
        data.track,
    ).await?;

    log::info!(
        "Teacher {} ({}, {}/{}) added by admin {}.",
        teacher.id, &teacher.email, teacher.language, teacher.track, caller.id
    );
    Ok((StatusCode::CREATED, Json(teacher)).into_response())
}

/// `PUT /teachers/:id`
pub async fn update_teacher(
    headers: HeaderMap,
    Path(id): Path<i64>,
    Extension(glob): Extension<Arc<Glob>>,
    body: String,
) -> Result<Response, Error> {
    log::trace!(
        "admin::update_teacher( [ headers ], {}, [ glob ], [ body ] ) called.",
        id
    );

    let caller = caller_from_headers(&headers)?;
    require_admin(&glob, &caller).await?;

    let data: TeacherUpdate = read_body(&body)?;
    let teacher = glob.store.update_teacher(
        id,
        data.name.trim(),
        data.email.trim(),
    ).await?;

    Ok(Json(teacher).into_response())
}

/// `DELETE /teachers/:id`
///
/// Lessons the teacher still owns stay behind with a dangling reference.
pub async fn delete_teacher(
    headers: HeaderMap,
    Path(id): Path<i64>,
    Extension(glob): Extension<Arc<Glob>>,
) -> Result<Response, Error> {
    log::trace!(
        "admin::delete_teacher( [ headers ], {}, [ glob ] ) called.",
        id
    );

    let caller = caller_from_headers(&headers)?;
    require_admin(&glob, &caller).await?;

    glob.store.delete_teacher(id).await?;
    Ok(respond_no_content())
}

/// `PUT /students/:id`
pub async fn update_student(
    headers: HeaderMap,
    Path(id): Path<i64>,
    Extension(glob): Extension<Arc<Glob>>,
    body: String,
) -> Result<Response, Error> {
    log::trace!(
        "admin::update_student( [ headers ], {}, [ glob ], [ body ] ) called.",
        id
    );

    let caller = caller_from_headers(&headers)?;
    require_admin(&glob, &caller).await?;

    let data: StudentData = read_body(&body)?;
    let student = glob.store.update_student(
        id,
        data.name.trim(),
        data.email.trim(),
        data.plan,
    ).await?;

    Ok(Json(student).into_response())
}

/// `DELETE /students/:id`
pub async fn delete_student(
    headers: HeaderMap,
    Path(id): Path<i64>,
    Extension(glob): Extension<Arc<Glob>>,
) -> Result<Response, Error> {
    log::trace!(
        "admin::delete_student( [ headers ], {}, [ glob ] ) called.",
        id
    );

    let caller = caller_from_headers(&headers)?;
    require_admin(&glob, &caller).await?;

    glob.store.delete_student(id).await?;
    Ok(respond_no_content())
}

/// `POST /admins`
pub async fn add_admin(
    headers: HeaderMap,
    Extension(glob): Extension<Arc<Glob>>,
    body: String,
) -> Result<Response, Error> {
    log::trace!("admin::add_admin( [ headers ], [ glob ], [ body ] ) called.");

    let caller = caller_from_headers(&headers)?;
    require_admin(&glob, &caller).await?;

    let data: AdminData = read_body(&body)?;
    let admin = glob.store.insert_admin(
        data.name.trim(),
        data.email.trim(),
    ).await?;

    log::info!(
        "Admin {} ({}) added by admin {}.",
        admin.id, &admin.email, caller.id
    );
    Ok((StatusCode::CREATED, Json(admin)).into_response())
}

/// `PUT /admins/:id`
pub async fn update_admin(
    headers: HeaderMap,
    Path(id): Path<i64>,
    Extension(glob): Extension<Arc<Glob>>,
    body: String,
) -> Result<Response, Error> {
    log::trace!(
        "admin::update_admin( [ headers ], {}, [ glob ], [ body ] ) called.",
        id
    );

    let caller = caller_from_headers(&headers)?;
    require_admin(&glob, &caller).await?;

    let data: AdminData = read_body(&body)?;
    let admin = glob.store.update_admin(
        id,
        data.name.trim(),
        data.email.trim(),
    ).await?;

    Ok(Json(admin).into_response())
}

/// `DELETE /admins/:id`
///
/// An admin deleting their own record is always refused, even when
/// they're the only admin left.
pub async fn delete_admin(
    headers: HeaderMap,
    Path(id): Path<i64>,
    Extension(glob): Extension<Arc<Glob>>,
) -> Result<Response, Error> {
    log::trace!(
        "admin::delete_admin( [ headers ], {}, [ glob ] ) called.",
        id
    );

    let caller = caller_from_headers(&headers)?;
    require_admin(&glob, &caller).await?;

    if id == caller.id {
        return Err(Error::ForbiddenSelfDelete);
    }

    glob.store.delete_admin(id).await?;
    log::info!("Admin {} deleted by admin {}.", id, caller.id);

    Ok(respond_no_content())
}
