/*!
Directory entities: the three kinds of account the school knows about.

Students, teachers, and admins are three distinct record types sharing no
common base; code that works across roles dispatches on the explicit
`Role` tag a request carries. All classification enums travel the wire as
lowercase strings and are stored in the database the same way.
*/
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let token = match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        };

        write!(f, "{}", token)
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            _ => Err(Error::Validation(format!("{:?} is not a valid role", s))),
        }
    }
}

/// The language a teacher teaches.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let token = match self {
            Language::English => "english",
            Language::Spanish => "spanish",
        };

        write!(f, "{}", token)
    }
}

impl std::str::FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "english" => Ok(Language::English),
            "spanish" => Ok(Language::Spanish),
            _ => Err(Error::Validation(format!("{:?} is not a valid language", s))),
        }
    }
}

/// The subject track a teacher specializes in.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Finance,
    Corporate,
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let token = match self {
            Track::Finance => "finance",
            Track::Corporate => "corporate",
        };

        write!(f, "{}", token)
    }
}

impl std::str::FromStr for Track {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "finance" => Ok(Track::Finance),
            "corporate" => Ok(Track::Corporate),
            _ => Err(Error::Validation(format!("{:?} is not a valid track", s))),
        }
    }
}

/// Subscription tier chosen at signup. Affects pricing, never booking logic.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Individual,
    Group,
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let token = match self {
            Plan::Individual => "individual",
            Plan::Group => "group",
        };

        write!(f, "{}", token)
    }
}

impl std::str::FromStr for Plan {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(Plan::Individual),
            "group" => Ok(Plan::Group),
            _ => Err(Error::Validation(format!("{:?} is not a valid plan", s))),
        }
    }
}

/// A read-only catalog entry describing what a `Plan` buys.
#[derive(Debug, Serialize)]
pub struct PlanInfo {
    pub plan: Plan,
    pub name: &'static str,
    /// Monthly price in whole cents.
    pub monthly_price_cents: u32,
    pub description: &'static str,
    pub benefits: &'static [&'static str],
}

pub static PLAN_CATALOG: &[PlanInfo] = &[
    PlanInfo {
        plan: Plan::Individual,
        name: "Individual Plan",
        monthly_price_cents: 54500,
        description: "Lessons tailored to you alone",
        benefits: &[
            "One-on-one private lessons",
            "Flexible scheduling",
            "Personalized material",
            "Direct line to your teacher",
            "Accelerated progression",
        ],
    },
    PlanInfo {
        plan: Plan::Group,
        name: "Group Plan",
        monthly_price_cents: 25900,
        description: "Learn alongside other students",
        benefits: &[
            "Small classes (max. 10 students)",
            "Interaction with classmates",
            "Group dynamics",
            "Affordable price",
            "Collaborative environment",
        ],
    },
];

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub plan: Plan,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Immutable classification; set at creation, used for matching.
    pub language: Language,
    pub track: Track,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Admin {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trip() {
        for role in [Role::Student, Role::Teacher, Role::Admin] {
            let token = role.to_string();
            assert_eq!(token.parse::<Role>().unwrap(), role);
        }
        assert!("boss".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn classification_round_trips() {
        for lang in [Language::English, Language::Spanish] {
            assert_eq!(lang.to_string().parse::<Language>().unwrap(), lang);
        }
        for track in [Track::Finance, Track::Corporate] {
            assert_eq!(track.to_string().parse::<Track>().unwrap(), track);
        }
        for plan in [Plan::Individual, Plan::Group] {
            assert_eq!(plan.to_string().parse::<Plan>().unwrap(), plan);
        }
        assert!("portuguese".parse::<Language>().is_err());
        assert!("fin".parse::<Track>().is_err());
    }

    #[test]
    fn enums_serialize_lowercase() {
        let t = Teacher {
            id: 1,
            name: "Ms Jenny".to_owned(),
            email: "jenny@fluente.school".to_owned(),
            language: Language::English,
            track: Track::Finance,
        };
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["language"], "english");
        assert_eq!(v["track"], "finance");

        let s = Student {
            id: 2,
            name: "John Smith".to_owned(),
            email: "jsmith@gmail.com".to_owned(),
            plan: Plan::Group,
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["plan"], "group");
    }

}
