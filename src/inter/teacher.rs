/*!
Endpoints serving Teacher callers and the teacher search every student
starts a booking from.
*/
use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::HeaderMap,
    Json,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::config::Glob;
use crate::error::Error;
use crate::matching::eligible_teachers;
use crate::user::{Language, Role, Track};
use super::*;

/// Query half of `GET /teachers`. The front end submits empty strings for
/// "any", so both filters arrive as raw text and blank means no
/// constraint on that dimension.
#[derive(Debug, Default, Deserialize)]
pub struct TeacherQuery {
    language: Option<String>,
    track: Option<String>,
}

fn parse_filter<T: std::str::FromStr<Err = Error>>(
    raw: &Option<String>,
) -> Result<Option<T>, Error> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Ok(Some(s.parse()?)),
    }
}

/// `GET /teachers?language=&track=`: the matching engine's door. Returns
/// every eligible teacher in directory order; the caller picks one
/// explicitly. No availability is implied.
pub async fn find(
    Query(query): Query<TeacherQuery>,
    Extension(glob): Extension<Arc<Glob>>,
) -> Result<Response, Error> {
    log::trace!("teacher::find( {:?}, [ glob ] ) called.", &query);

    let language: Option<Language> = parse_filter(&query.language)?;
    let track: Option<Track> = parse_filter(&query.track)?;

    let teachers = glob.store.get_teachers().await?;
    let found = eligible_teachers(teachers, language, track);

    Ok(Json(found).into_response())
}

/// `GET /teachers/lessons`: the lessons assigned to the calling teacher.
pub async fn own_lessons(
    headers: HeaderMap,
    Extension(glob): Extension<Arc<Glob>>,
) -> Result<Response, Error> {
    log::trace!("teacher::own_lessons( [ headers ], [ glob ] ) called.");

    let caller = caller_from_headers(&headers)?;
    if caller.role != Role::Teacher {
        return Err(Error::Unauthorized(
            "this listing is for teacher callers".to_owned()
        ));
    }

    let lessons = glob.store.lessons_for_teacher(caller.id).await?;
    Ok(Json(lessons).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_mean_unconstrained() {
        let lang: Option<Language> = parse_filter(&None).unwrap();
        assert!(lang.is_none());

        let lang: Option<Language> = parse_filter(&Some(String::new())).unwrap();
        assert!(lang.is_none());

        let lang: Option<Language> = parse_filter(&Some("english".to_owned())).unwrap();
        assert_eq!(lang, Some(Language::English));

        let track: Result<Option<Track>, _> = parse_filter(&Some("piano".to_owned()));
        assert!(matches!(track, Err(Error::Validation(_))));
    }
}
