use crate::data::student::Student;

/// Students whose display name contains `query`, ignoring case. A blank
/// query lets everyone through; otherwise the query is matched as typed,
/// surrounding spaces included.
pub fn filter<'a>(students: &'a [Student], query: &str) -> Vec<&'a Student> {
    if query.trim().is_empty() {
        return students.iter().collect();
    }
    let query = query.to_lowercase();

    students
        .iter()
        .filter(|student| student.display_name.to_lowercase().contains(&query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::student::RawStudent;
    use serde_json::json;
    use url::Url;

    fn students(names: &[&str]) -> Vec<Student> {
        let origin = Url::parse("https://dvonb.xyz/").unwrap();
        names
            .iter()
            .map(|name| {
                let raw: RawStudent =
                    serde_json::from_value(json!({"name": {"first": name}})).unwrap();
                Student::normalize(raw, &origin)
            })
            .collect()
    }

    fn names<'a>(filtered: &[&'a Student]) -> Vec<&'a str> {
        filtered.iter().map(|s| s.display_name.as_str()).collect()
    }

    #[test]
    fn blank_query_is_identity() {
        let all = students(&["Ada", "Grace", "Alan"]);
        assert_eq!(filter(&all, "").len(), 3);
        assert_eq!(filter(&all, "   ").len(), 3);
    }

    #[test]
    fn match_is_case_insensitive_substring_in_input_order() {
        let all = students(&["Ada", "Grace", "Alan", "Barbara"]);
        assert_eq!(names(&filter(&all, "A")), ["Ada", "Grace", "Alan", "Barbara"]);
        assert_eq!(names(&filter(&all, "aL")), ["Alan"]);
        assert_eq!(names(&filter(&all, "ara")), ["Barbara"]);
        assert!(filter(&all, "zzz").is_empty());
    }

    #[test]
    fn surrounding_spaces_are_part_of_the_query() {
        let all = students(&["Ada", "Ada Lovelace"]);
        assert_eq!(names(&filter(&all, "Ada ")), ["Ada Lovelace"]);
        assert_eq!(names(&filter(&all, " love")), ["Ada Lovelace"]);
    }

    #[test]
    fn source_list_is_untouched() {
        let all = students(&["Ada", "Grace"]);
        let before = all.clone();
        let _ = filter(&all, "grace");
        assert_eq!(all, before);
    }
}
