/*!
The `Lesson` record and its lifecycle.

A lesson is one scheduled meeting between one student and one teacher. Its
participant references are fixed at creation; only the scheduled time and
the status ever change afterward.

The lifecycle is deliberately permissive: `scheduled` is the initial state,
`completed` and `cancelled` are terminal, but an update may set any of the
three values, including moving a terminal lesson back to `scheduled` as an
explicit correction. There is no automatic transition when the scheduled
time elapses.
*/
use serde::{Deserialize, Serialize};
use time::{
    format_description::FormatItem,
    macros::format_description,
    PrimitiveDateTime,
};

use crate::error::Error;
use crate::user::Role;

/// Wall-clock wire format, matching what an HTML datetime-local control
/// submits: `2025-01-10T10:00`.
pub const WHEN_FMT: &[FormatItem] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]"
);

/// Serde glue for carrying `WHEN_FMT`-formatted datetimes in JSON.
pub(crate) mod when_fmt {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::PrimitiveDateTime;

    use super::WHEN_FMT;

    pub fn serialize<S: Serializer>(
        when: &PrimitiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let text = when.format(WHEN_FMT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<PrimitiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        PrimitiveDateTime::parse(&text, WHEN_FMT)
            .map_err(de::Error::custom)
    }

    pub mod option {
        use serde::{de, Deserialize, Deserializer};
        use time::PrimitiveDateTime;

        use super::WHEN_FMT;

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<PrimitiveDateTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(text) => PrimitiveDateTime::parse(&text, WHEN_FMT)
                    .map(Some)
                    .map_err(de::Error::custom),
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl LessonStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LessonStatus::Scheduled)
    }
}

impl std::fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let token = match self {
            LessonStatus::Scheduled => "scheduled",
            LessonStatus::Completed => "completed",
            LessonStatus::Cancelled => "cancelled",
        };

        write!(f, "{}", token)
    }
}

impl std::str::FromStr for LessonStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(LessonStatus::Scheduled),
            "completed" => Ok(LessonStatus::Completed),
            "cancelled" => Ok(LessonStatus::Cancelled),
            _ => Err(Error::Validation(format!(
                "{:?} is not a valid lesson status", s
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Lesson {
    pub id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    #[serde(with = "when_fmt")]
    pub when: PrimitiveDateTime,
    pub status: LessonStatus,
}

impl Lesson {
    /// Is the given caller one of this lesson's two participants?
    ///
    /// This is the visibility rule and also the authorization rule for
    /// mutation; admins get no special treatment here.
    pub fn involves(&self, role: Role, id: i64) -> bool {
        match role {
            Role::Student => self.student_id == id,
            Role::Teacher => self.teacher_id == id,
            Role::Admin => false,
        }
    }
}

/// A lesson as listings return it: joined with whatever participant
/// details still exist in the directory. A deleted participant leaves
/// `None`s behind, and the display layer substitutes its fallback label.
#[derive(Clone, Debug, Serialize)]
pub struct LessonView {
    pub id: i64,
    pub student_id: i64,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub teacher_id: i64,
    pub teacher_name: Option<String>,
    #[serde(with = "when_fmt")]
    pub when: PrimitiveDateTime,
    pub status: LessonStatus,
}

/// Partial update to a lesson. Only these two fields are mutable; a body
/// naming anything else is rejected outright.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LessonPatch {
    #[serde(default, with = "when_fmt::option")]
    pub when: Option<PrimitiveDateTime>,
    #[serde(default)]
    pub status: Option<LessonStatus>,
}

impl LessonPatch {
    pub fn is_empty(&self) -> bool {
        self.when.is_none() && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn some_lesson() -> Lesson {
        Lesson {
            id: 10,
            student_id: 1,
            teacher_id: 2,
            when: datetime!(2025-01-10 10:00),
            status: LessonStatus::Scheduled,
        }
    }

    #[test]
    fn status_round_trip() {
        for status in [
            LessonStatus::Scheduled,
            LessonStatus::Completed,
            LessonStatus::Cancelled,
        ] {
            assert_eq!(status.to_string().parse::<LessonStatus>().unwrap(), status);
        }
        assert!("done".parse::<LessonStatus>().is_err());
        assert!("Scheduled".parse::<LessonStatus>().is_err());
    }

    #[test]
    fn terminality() {
        assert!(!LessonStatus::Scheduled.is_terminal());
        assert!(LessonStatus::Completed.is_terminal());
        assert!(LessonStatus::Cancelled.is_terminal());
    }

    #[test]
    fn wire_format() {
        let l = some_lesson();
        let v = serde_json::to_value(&l).unwrap();
        assert_eq!(v["when"], "2025-01-10T10:00");
        assert_eq!(v["status"], "scheduled");

        let back: Lesson = serde_json::from_value(v).unwrap();
        assert_eq!(back, l);
    }

    #[test]
    fn participation() {
        let l = some_lesson();
        assert!(l.involves(Role::Student, 1));
        assert!(l.involves(Role::Teacher, 2));
        // Same id under the wrong role is not participation.
        assert!(!l.involves(Role::Student, 2));
        assert!(!l.involves(Role::Teacher, 1));
        assert!(!l.involves(Role::Admin, 1));
    }

    #[test]
    fn patch_parsing() {
        let p: LessonPatch = serde_json::from_str(
            r#"{"when": "2025-02-01T14:30"}"#
        ).unwrap();
        assert_eq!(p.when, Some(datetime!(2025-02-01 14:30)));
        assert!(p.status.is_none());
        assert!(!p.is_empty());

        let p: LessonPatch = serde_json::from_str(
            r#"{"status": "completed"}"#
        ).unwrap();
        assert_eq!(p.status, Some(LessonStatus::Completed));

        let p: LessonPatch = serde_json::from_str("{}").unwrap();
        assert!(p.is_empty());

        // Participants are never reassigned through a patch.
        assert!(serde_json::from_str::<LessonPatch>(
            r#"{"teacher_id": 5}"#
        ).is_err());
        assert!(serde_json::from_str::<LessonPatch>(
            r#"{"status": "postponed"}"#
        ).is_err());
    }
}
