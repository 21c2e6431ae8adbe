use super::*;

#[derive(Debug, Clone, PartialEq)]
enum Color {
    Red,
    Green,
    Blue,
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
        };
        f.write_str(name)
    }
}

const COLORS: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

// ===== booleans =====

#[test]
fn boolean_accepts_yes_and_no_in_any_case() {
    assert_eq!(parse_boolean("yes"), Some(true));
    assert_eq!(parse_boolean(" No.\n"), Some(false));
    assert_eq!(parse_boolean("YES"), Some(true));
}

#[test]
fn boolean_accepts_short_forms() {
    for reply in ["yes", "Yes", "Y", "1", "true"] {
        assert_eq!(parse_boolean(reply), Some(true), "{reply}");
    }
    for reply in ["no", "No", "N", "0", "FALSE"] {
        assert_eq!(parse_boolean(reply), Some(false), "{reply}");
    }
}

#[test]
fn boolean_rejects_other_replies() {
    assert_eq!(parse_boolean("maybe"), None);
    assert_eq!(parse_boolean("yes, definitely"), None);
}

// ===== numbers =====

#[test]
fn number_parses_trimmed_literals() {
    assert_eq!(parse_number(" 42\n"), Some(42.0));
    assert_eq!(parse_number("-3.5"), Some(-3.5));
    assert_eq!(parse_number("1e3"), Some(1000.0));
}

#[test]
fn number_rejects_words_and_non_finite() {
    assert_eq!(parse_number("forty two"), None);
    assert_eq!(parse_number("NaN"), None);
    assert_eq!(parse_number("inf"), None);
}

// ===== enums =====

#[test]
fn enum_case_matches_case_insensitively() {
    assert_eq!(parse_enum_case("red", &COLORS), Some(&Color::Red));
    assert_eq!(parse_enum_case(" BLUE.", &COLORS), Some(&Color::Blue));
    assert_eq!(parse_enum_case("Purple", &COLORS), None);
    assert_eq!(parse_enum_case("Reds", &COLORS), None);
}

#[test]
fn enum_case_option_with_trailing_dot() {
    let options = ["St.", "Ave."];
    assert_eq!(parse_enum_case("St.", &options), Some(&"St."));
    assert_eq!(parse_enum_case("ave", &options), Some(&"Ave."));
    assert_eq!(parse_enum_case("\"AVE.\"", &options), Some(&"Ave."));
}

#[test]
fn enum_case_prefers_exact_match() {
    let options = ["v1", "v1."];
    assert_eq!(parse_enum_case("v1.", &options), Some(&"v1."));
    assert_eq!(parse_enum_case("v1", &options), Some(&"v1"));
}

#[test]
fn enum_cases_option_with_trailing_dot() {
    let options = ["Dr.", "St.", "Ave."];
    assert_eq!(parse_enum_cases("Ave., St.", &options), Some(vec![&"St.", &"Ave."]));
}

#[test]
fn enum_cases_keep_option_order() {
    let parsed = parse_enum_cases("Blue, red", &COLORS).unwrap();
    assert_eq!(parsed, vec![&Color::Red, &Color::Blue]);
}

#[test]
fn enum_cases_none_is_empty_set() {
    assert_eq!(parse_enum_cases("None", &COLORS), Some(vec![]));
}

#[test]
fn enum_cases_none_can_be_an_option() {
    let options = ["None", "Some"];
    assert_eq!(parse_enum_cases("none", &options), Some(vec![&"None"]));
}

#[test]
fn enum_cases_reject_unknown_token() {
    assert_eq!(parse_enum_cases("Red, Purple", &COLORS), None);
    assert_eq!(parse_enum_cases("   ", &COLORS), None);
}

// ===== items =====

#[test]
fn items_skip_blank_lines() {
    assert_eq!(parse_items("a\n\nb\n"), vec!["a", "b"]);
    assert_eq!(parse_items("  apple \r\n banana"), vec!["apple", "banana"]);
    assert!(parse_items("\n\n").is_empty());
}

// ===== JSON =====

#[test]
fn json_decodes_plain_reply() {
    let items: Vec<String> = parse_json("[\"a\",\"b\"]").unwrap();
    assert_eq!(items, vec!["a", "b"]);
}

#[test]
fn json_unwraps_code_fence() {
    let items: Vec<u32> = parse_json("```json\n[1, 2]\n```").unwrap();
    assert_eq!(items, vec![1, 2]);
    let bare: Vec<u32> = parse_json("```\n[3]\n```").unwrap();
    assert_eq!(bare, vec![3]);
}

#[test]
fn json_unwraps_single_line_fence() {
    let items: Vec<String> = parse_json("```[\"a\"]```").unwrap();
    assert_eq!(items, vec!["a"]);
}

#[test]
fn json_rejects_prose() {
    assert!(parse_json::<Vec<String>>("Here you go: [\"a\"]").is_err());
}

// ===== I don't know =====

#[test]
fn i_dont_know_detection() {
    assert!(i_dont_know("I don't know"));
    assert!(i_dont_know("  Sorry, I DON'T KNOW.  "));
    assert!(i_dont_know("I don\u{2019}t know"));
    assert!(!i_dont_know("42"));
}
