/*
`Store` methods for the lesson registry: creation, partial update,
deletion, and the caller-scoped listings.

Referential integrity is checked at creation only: both participants must
exist inside the insert transaction, or nothing is persisted. After that a
lesson holds bare ids, and the listing queries LEFT JOIN the directory so a
participant deleted later simply comes back with null details.

Concurrent edits to the same lesson are last-write-wins; there is no
version token.
*/
use time::PrimitiveDateTime;
use tokio_postgres::{Row, types::Type};

use super::Store;
use crate::error::Error;
use crate::lesson::{Lesson, LessonPatch, LessonStatus, LessonView};

fn lesson_from_row(row: &Row) -> Result<Lesson, Error> {
    let status_str: &str = row.try_get("status")?;
    Ok(Lesson {
        id: row.try_get("id")?,
        student_id: row.try_get("student")?,
        teacher_id: row.try_get("teacher")?,
        when: row.try_get("at")?,
        status: status_str.parse()?,
    })
}

fn lesson_view_from_row(row: &Row) -> Result<LessonView, Error> {
    let status_str: &str = row.try_get("status")?;
    Ok(LessonView {
        id: row.try_get("id")?,
        student_id: row.try_get("student")?,
        student_name: row.try_get("student_name")?,
        student_email: row.try_get("student_email")?,
        teacher_id: row.try_get("teacher")?,
        teacher_name: row.try_get("teacher_name")?,
        when: row.try_get("at")?,
        status: status_str.parse()?,
    })
}

static LESSON_VIEW_QUERY: &str =
    "SELECT
        lessons.id, student, students.name AS student_name,
        students.email AS student_email,
        teacher, teachers.name AS teacher_name,
        at, status
    FROM
        lessons
        LEFT JOIN students ON lessons.student = students.id
        LEFT JOIN teachers ON lessons.teacher = teachers.id";

impl Store {
    /// Books a lesson. Both participants are verified inside the insert
    /// transaction; a nonexistent one fails the whole call and nothing is
    /// persisted. The new lesson always starts out `scheduled`.
    pub async fn insert_lesson(
        &self,
        student_id: i64,
        teacher_id: i64,
        when: PrimitiveDateTime,
    ) -> Result<Lesson, Error> {
        log::trace!(
            "Store::insert_lesson( {}, {}, {} ) called.",
            student_id, teacher_id, &when
        );

        let mut client = self.connect().await?;
        let t = client.transaction().await?;

        if t.query_opt(
            "SELECT id FROM students WHERE id = $1", &[&student_id]
        ).await?.is_none() {
            return Err(Error::UnknownParticipant(
                format!("student {}", student_id)
            ));
        }
        if t.query_opt(
            "SELECT id FROM teachers WHERE id = $1", &[&teacher_id]
        ).await?.is_none() {
            return Err(Error::UnknownParticipant(
                format!("teacher {}", teacher_id)
            ));
        }

        let row = t.query_one(
            "INSERT INTO lessons (student, teacher, at, status)
                VALUES ($1, $2, $3, $4) RETURNING *",
            &[
                &student_id,
                &teacher_id,
                &when,
                &LessonStatus::Scheduled.to_string(),
            ]
        ).await?;
        let lesson = lesson_from_row(&row)?;

        t.commit().await?;
        log::trace!("Inserted Lesson {}.", lesson.id);
        Ok(lesson)
    }

    pub async fn get_lesson(&self, id: i64) -> Result<Option<Lesson>, Error> {
        log::trace!("Store::get_lesson( {} ) called.", id);

        let client = self.connect().await?;
        match client.query_opt(
            "SELECT * FROM lessons WHERE id = $1", &[&id]
        ).await? {
            Some(row) => Ok(Some(lesson_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Applies a partial update; omitted fields keep their stored values.
    pub async fn update_lesson(
        &self,
        id: i64,
        patch: &LessonPatch,
    ) -> Result<Lesson, Error> {
        log::trace!("Store::update_lesson( {}, {:?} ) called.", id, patch);

        let client = self.connect().await?;

        let update_stmt = client.prepare_typed(
            "UPDATE lessons SET
                at = COALESCE($1, at),
                status = COALESCE($2, status)
            WHERE id = $3 RETURNING *",
            &[Type::TIMESTAMP, Type::TEXT, Type::INT8]
        ).await?;

        let status = patch.status.map(|s| s.to_string());
        let row = client.query_opt(
            &update_stmt,
            &[&patch.when, &status, &id]
        ).await?.ok_or(Error::NotFound("lesson"))?;

        lesson_from_row(&row)
    }

    pub async fn delete_lesson(&self, id: i64) -> Result<(), Error> {
        log::trace!("Store::delete_lesson( {} ) called.", id);

        let client = self.connect().await?;
        let n = client.execute(
            "DELETE FROM lessons WHERE id = $1", &[&id]
        ).await?;

        if n == 0 {
            Err(Error::NotFound("lesson"))
        } else {
            Ok(())
        }
    }

    pub async fn lessons_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<LessonView>, Error> {
        log::trace!("Store::lessons_for_student( {} ) called.", student_id);

        let client = self.connect().await?;
        let query = format!("{} WHERE lessons.student = $1 ORDER BY at", LESSON_VIEW_QUERY);
        let rows = client.query(query.as_str(), &[&student_id]).await?;

        let mut lessons: Vec<LessonView> = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            lessons.push(lesson_view_from_row(row)?);
        }

        Ok(lessons)
    }

    pub async fn lessons_for_teacher(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<LessonView>, Error> {
        log::trace!("Store::lessons_for_teacher( {} ) called.", teacher_id);

        let client = self.connect().await?;
        let query = format!("{} WHERE lessons.teacher = $1 ORDER BY at", LESSON_VIEW_QUERY);
        let rows = client.query(query.as_str(), &[&teacher_id]).await?;

        let mut lessons: Vec<LessonView> = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            lessons.push(lesson_view_from_row(row)?);
        }

        Ok(lessons)
    }
}
