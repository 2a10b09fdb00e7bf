/*!
The matching rule: which teachers are eligible for a requested
language/track combination.

Filtering is a plain conjunction of the two optional predicates. An absent
filter constrains nothing. Matches come back in directory order and the
caller picks one explicitly; there is no ranking, no load balancing, and no
availability check.
*/
use crate::user::{Language, Teacher, Track};

pub fn teacher_matches(
    teacher: &Teacher,
    language: Option<Language>,
    track: Option<Track>,
) -> bool {
    let lang_ok = match language {
        Some(l) => teacher.language == l,
        None => true,
    };
    let track_ok = match track {
        Some(t) => teacher.track == t,
        None => true,
    };

    lang_ok && track_ok
}

pub fn eligible_teachers(
    teachers: Vec<Teacher>,
    language: Option<Language>,
    track: Option<Track>,
) -> Vec<Teacher> {
    teachers
        .into_iter()
        .filter(|t| teacher_matches(t, language, track))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> Vec<Teacher> {
        vec![
            Teacher {
                id: 1,
                name: "Mr Berro".to_owned(),
                email: "berro@fluente.school".to_owned(),
                language: Language::English,
                track: Track::Finance,
            },
            Teacher {
                id: 2,
                name: "Ms Irfan".to_owned(),
                email: "irfan@fluente.school".to_owned(),
                language: Language::Spanish,
                track: Track::Corporate,
            },
            Teacher {
                id: 3,
                name: "Ms Jenny".to_owned(),
                email: "jenny@fluente.school".to_owned(),
                language: Language::English,
                track: Track::Corporate,
            },
        ]
    }

    #[test]
    fn conjunction_of_both_filters() {
        let found = eligible_teachers(
            directory(),
            Some(Language::English),
            Some(Track::Finance),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
    }

    #[test]
    fn omitted_filter_constrains_nothing() {
        let found = eligible_teachers(directory(), Some(Language::English), None);
        assert_eq!(
            found.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 3]
        );

        let found = eligible_teachers(directory(), None, Some(Track::Corporate));
        assert_eq!(
            found.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![2, 3]
        );

        let found = eligible_teachers(directory(), None, None);
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn returns_exactly_the_matching_subset() {
        for lang in [None, Some(Language::English), Some(Language::Spanish)] {
            for track in [None, Some(Track::Finance), Some(Track::Corporate)] {
                let found = eligible_teachers(directory(), lang, track);
                for t in directory() {
                    let expected = lang.map_or(true, |l| t.language == l)
                        && track.map_or(true, |tr| t.track == tr);
                    assert_eq!(
                        found.iter().any(|f| f.id == t.id),
                        expected,
                        "teacher {} with filters {:?}/{:?}",
                        t.id, lang, track
                    );
                }
            }
        }
    }

    #[test]
    fn directory_order_preserved() {
        let found = eligible_teachers(directory(), None, None);
        let ids: Vec<i64> = found.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
