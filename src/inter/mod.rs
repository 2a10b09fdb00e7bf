/*!
Interoperation between the client and the server.

Every request that needs an identity carries it in two headers:
`x-fluente-role` and `x-fluente-id`. Establishing that identity
(login, sessions) belongs to an outside collaborator; this layer just
reads the context and enforces what that caller may do. There is no
ambient "current user" anywhere.
*/
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::Glob;
use crate::error::Error;
use crate::user::{Admin, Role};

pub mod admin;
pub mod lessons;
pub mod student;
pub mod teacher;

pub static ROLE_HEADER: &str = "x-fluente-role";
pub static ID_HEADER: &str = "x-fluente-id";

/// The identity context of one request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Caller {
    pub role: Role,
    pub id: i64,
}

pub fn caller_from_headers(headers: &HeaderMap) -> Result<Caller, Error> {
    log::trace!("caller_from_headers( [ {} headers ] ) called.", headers.len());

    let role_str = match headers.get(ROLE_HEADER) {
        Some(v) => v.to_str().map_err(|_| Error::Validation(
            format!("{} header value unrecognizable", ROLE_HEADER)
        ))?,
        None => {
            return Err(Error::Validation(
                format!("request must have an {} header", ROLE_HEADER)
            ));
        },
    };
    let role: Role = role_str.parse()?;

    let id_str = match headers.get(ID_HEADER) {
        Some(v) => v.to_str().map_err(|_| Error::Validation(
            format!("{} header value unrecognizable", ID_HEADER)
        ))?,
        None => {
            return Err(Error::Validation(
                format!("request must have an {} header", ID_HEADER)
            ));
        },
    };
    let id: i64 = id_str.parse().map_err(|_| Error::Validation(
        format!("{:?} is not a valid id", id_str)
    ))?;

    Ok(Caller { role, id })
}

/// Admit only callers whose context claims the admin role *and* whose
/// admin record actually exists in the directory.
pub async fn require_admin(glob: &Glob, caller: &Caller) -> Result<Admin, Error> {
    log::trace!("require_admin( Glob, {:?} ) called.", caller);

    if caller.role != Role::Admin {
        return Err(Error::Unauthorized(
            "this operation is for admins".to_owned()
        ));
    }

    glob.store.get_admin(caller.id).await?
        .ok_or_else(|| Error::Unauthorized(
            format!("no admin with id {}", caller.id)
        ))
}

/// Parse a JSON request body the way the store expects it, turning any
/// deserialization complaint into a `Validation` response.
pub fn read_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        log::trace!("Undeserializable request body {:?}: {}", body, &e);
        Error::Validation(format!("unreadable request body: {}", e))
    })
}

pub fn respond_no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
