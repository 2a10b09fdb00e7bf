/*!
The lesson registry's endpoints: booking, partial update, and deletion.

Authorization happens here, at the registry boundary, before any mutation:
a lesson may only be edited by one of its two participants, and deleted by
a participant or an admin. The original front end trusted the client for
this; the server does not.
*/
use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    Json,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use time::PrimitiveDateTime;

use crate::config::Glob;
use crate::error::Error;
use crate::lesson::{when_fmt, Lesson, LessonPatch};
use crate::user::Role;
use super::*;

#[derive(Debug, Deserialize)]
pub struct BookingData {
    student_id: i64,
    teacher_id: i64,
    #[serde(with = "when_fmt")]
    when: PrimitiveDateTime,
}

/// `POST /lessons`: book a lesson. A student books for themself; an admin
/// may book on any student's behalf; a teacher may not book at all.
pub async fn create(
    headers: HeaderMap,
    Extension(glob): Extension<Arc<Glob>>,
    body: String,
) -> Result<Response, Error> {
    log::trace!("lessons::create( [ headers ], [ glob ], [ body ] ) called.");

    let caller = caller_from_headers(&headers)?;
    let data: BookingData = read_body(&body)?;

    match caller.role {
        Role::Student => {
            if data.student_id != caller.id {
                return Err(Error::Unauthorized(
                    "students may only book lessons for themselves".to_owned()
                ));
            }
        },
        Role::Admin => {
            require_admin(&glob, &caller).await?;
        },
        Role::Teacher => {
            return Err(Error::Unauthorized(
                "teachers do not book lessons".to_owned()
            ));
        },
    }

    let lesson = glob.store.insert_lesson(
        data.student_id,
        data.teacher_id,
        data.when,
    ).await?;

    log::info!(
        "Lesson {} booked: student {} with teacher {} at {}.",
        lesson.id, lesson.student_id, lesson.teacher_id, &lesson.when
    );
    Ok((StatusCode::CREATED, Json(lesson)).into_response())
}

/// Looks the lesson up and checks the caller against its participants.
async fn authorized_lesson(
    glob: &Glob,
    caller: &Caller,
    lesson_id: i64,
) -> Result<Lesson, Error> {
    let lesson = glob.store.get_lesson(lesson_id).await?
        .ok_or(Error::NotFound("lesson"))?;

    if !lesson.involves(caller.role, caller.id) {
        return Err(Error::Unauthorized(
            format!("caller is not a participant in lesson {}", lesson_id)
        ));
    }

    Ok(lesson)
}

/// `PUT /lessons/:id`: partial update of the scheduled time and/or
/// status, by a participant only. Any of the three statuses is accepted,
/// including putting a completed or cancelled lesson back to `scheduled`
/// as a correction.
pub async fn update(
    headers: HeaderMap,
    Path(lesson_id): Path<i64>,
    Extension(glob): Extension<Arc<Glob>>,
    body: String,
) -> Result<Response, Error> {
    log::trace!(
        "lessons::update( [ headers ], {}, [ glob ], [ body ] ) called.",
        lesson_id
    );

    let caller = caller_from_headers(&headers)?;
    let patch: LessonPatch = read_body(&body)?;
    if patch.is_empty() {
        return Err(Error::Validation(
            "update names no mutable field".to_owned()
        ));
    }

    authorized_lesson(&glob, &caller, lesson_id).await?;
    let lesson = glob.store.update_lesson(lesson_id, &patch).await?;

    Ok(Json(lesson).into_response())
}

/// `DELETE /lessons/:id`: removal by either participant or an admin.
pub async fn delete(
    headers: HeaderMap,
    Path(lesson_id): Path<i64>,
    Extension(glob): Extension<Arc<Glob>>,
) -> Result<Response, Error> {
    log::trace!(
        "lessons::delete( [ headers ], {}, [ glob ] ) called.",
        lesson_id
    );

    let caller = caller_from_headers(&headers)?;
    if caller.role == Role::Admin {
        require_admin(&glob, &caller).await?;
        // An admin may delete any lesson, but it still has to exist.
        glob.store.get_lesson(lesson_id).await?
            .ok_or(Error::NotFound("lesson"))?;
    } else {
        authorized_lesson(&glob, &caller, lesson_id).await?;
    }

    glob.store.delete_lesson(lesson_id).await?;
    log::info!("Lesson {} deleted by {:?}.", lesson_id, &caller);

    Ok(respond_no_content())
}
