/*!
The taxonomy of ways a request can fail.

Every variant is scoped to a single request; nothing here is fatal to the
process, and nothing is worth retrying automatically, so each one maps
straight to a status code and a plain-text body.
*/
use std::fmt::Write;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// No entity with the requested id.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// A lesson names a student or teacher that doesn't exist.
    #[error("unknown lesson participant: {0}")]
    UnknownParticipant(String),
    /// Email already in use within the same role's namespace.
    #[error("email address {0:?} is already in use")]
    DuplicateEmail(String),
    /// An admin tried to delete their own account record.
    #[error("an admin may not delete their own account")]
    ForbiddenSelfDelete,
    /// The caller isn't allowed to do that.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Malformed or missing required input.
    #[error("invalid request: {0}")]
    Validation(String),
    /// Something went wrong talking to the database.
    #[error("database error: {0}")]
    Db(String),
}

impl Error {
    /// Prepend some contextual `annotation` for the error.
    pub fn annotate(self, annotation: &str) -> Self {
        match self {
            Error::Db(s) => Error::Db(format!("{}: {}", annotation, &s)),
            x => x,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::UnknownParticipant(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::DuplicateEmail(_) => StatusCode::CONFLICT,
            Error::ForbiddenSelfDelete => StatusCode::FORBIDDEN,
            Error::Unauthorized(_) => StatusCode::FORBIDDEN,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tokio_postgres::error::Error> for Error {
    fn from(e: tokio_postgres::error::Error) -> Error {
        let mut s = format!("Data DB: {}", &e);
        if let Some(dbe) = e.as_db_error() {
            write!(&mut s, "; {}", dbe).unwrap();
        }
        Error::Db(s)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Error::Db(ref s) = self {
            log::error!("Request failed on the database: {}", s);
        }
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(Error::NotFound("lesson").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::UnknownParticipant("teacher 99".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::DuplicateEmail("a@b.c".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(Error::ForbiddenSelfDelete.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            Error::Unauthorized("not yours".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            Error::Validation("no such status".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn annotation_only_touches_db_errors() {
        let e = Error::Db("connection refused".into()).annotate("fetching teachers");
        assert_eq!(e, Error::Db("fetching teachers: connection refused".into()));

        let e = Error::ForbiddenSelfDelete.annotate("whatever");
        assert_eq!(e, Error::ForbiddenSelfDelete);
    }
}
