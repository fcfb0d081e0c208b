use crate::Course;

/// Upper bound on the number of courses any search surface shows.
pub const MAX_MATCHES: usize = 5;

/// Whether `course` matches a query that is already lower-cased.
fn course_matches(course: &Course, query_lower: &str) -> bool {
    course.course_title.to_lowercase().contains(query_lower)
        || course
            .course_code
            .as_ref()
            .is_some_and(|code| code.to_lowercase().contains(query_lower))
}

/// Positions of the first [`MAX_MATCHES`] courses whose title or code contains
/// `query`, case-insensitively, in index order. An empty query matches everything.
pub fn matched_indices(courses: &[Course], query: &str) -> Vec<usize> {
    let query_lower = query.to_lowercase();
    courses
        .iter()
        .enumerate()
        .filter(|(_, c)| query.is_empty() || course_matches(c, &query_lower))
        .map(|(i, _)| i)
        .take(MAX_MATCHES)
        .collect()
}

/// Same as [`matched_indices`] but yields the courses themselves.
pub fn match_courses<'a>(courses: &'a [Course], query: &str) -> Vec<&'a Course> {
    matched_indices(courses, query)
        .into_iter()
        .map(|i| &courses[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(title: &str, code: Option<&str>) -> Course {
        Course {
            course_title: title.into(),
            course_code: code.map(Into::into),
            paper_count: 0,
        }
    }

    fn courses() -> Vec<Course> {
        vec![
            course("Data Structures and Algorithms", Some("BCSE202L")),
            course("Operating Systems", Some("BCSE303L")),
            course("Computer Networks", None),
            course("Computer Architecture and Organization", Some("BCSE205L")),
            course("Database Systems", Some("BCSE302L")),
            course("Compiler Design", Some("BCSE307L")),
            course("Discrete Mathematics", None),
        ]
    }

    fn titles(found: &[&Course]) -> Vec<String> {
        found.iter().map(|c| c.course_title.clone()).collect()
    }

    #[test]
    fn empty_query_returns_first_five_in_order() {
        let c = courses();
        let found = match_courses(&c, "");
        assert_eq!(found.len(), MAX_MATCHES);
        assert_eq!(found[0].course_title, "Data Structures and Algorithms");
        assert_eq!(found[4].course_title, "Database Systems");
    }

    #[test]
    fn title_match_is_case_insensitive() {
        let c = courses();
        assert_eq!(
            titles(&match_courses(&c, "SYSTEMS")),
            vec!["Operating Systems", "Database Systems"]
        );
    }

    #[test]
    fn code_match_when_present() {
        let c = courses();
        assert_eq!(titles(&match_courses(&c, "bcse30")).len(), 3);
        assert_eq!(titles(&match_courses(&c, "303l")), vec!["Operating Systems"]);
    }

    #[test]
    fn results_are_capped() {
        let c = courses();
        // Every title contains an "e".
        assert_eq!(matched_indices(&c, "e"), vec![0, 1, 2, 3, 4]);
        assert_eq!(matched_indices(&c, "bcse"), vec![0, 1, 3, 4, 5]);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(match_courses(&courses(), "quantum").is_empty());
        assert!(match_courses(&[], "").is_empty());
    }
}
