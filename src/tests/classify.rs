use super::{classify_line, classify_lines, ClassifyOptions, HeaderPolicy, LineKind};
use crate::error::Error;

fn header(level: usize, title: &str) -> LineKind {
    LineKind::Header {
        level,
        title: title.to_string(),
        number: None,
    }
}

fn classify(line: &str) -> LineKind {
    classify_line(line, 1, &ClassifyOptions::default()).unwrap()
}

#[test]
fn test_header_levels_one_to_six() {
    assert_eq!(classify("# Title"), header(1, "Title"));
    assert_eq!(classify("### Deep"), header(3, "Deep"));
    assert_eq!(classify("###### Six"), header(6, "Six"));
}

#[test]
fn test_seven_markers_is_content() {
    assert_eq!(
        classify("####### Seven"),
        LineKind::Content("####### Seven".to_string())
    );
}

#[test]
fn test_missing_space_is_content() {
    assert_eq!(classify("#hashtag"), LineKind::Content("#hashtag".to_string()));
    assert_eq!(classify("#"), LineKind::Content("#".to_string()));
    assert_eq!(classify("##   "), LineKind::Content("##   ".to_string()));
}

#[test]
fn test_indentation_and_closing_markers() {
    assert_eq!(classify("   ## Indented ##"), header(2, "Indented"));
    assert_eq!(
        classify("    # code"),
        LineKind::Content("    # code".to_string()),
        "Four spaces is an indented code block, not a header"
    );
    assert_eq!(classify("# C#"), header(1, "C#"), "Closing run needs a space");
}

#[test]
fn test_blank_lines_keep_their_text() {
    assert_eq!(classify(""), LineKind::Blank(String::new()));
    assert_eq!(classify("  \t"), LineKind::Blank("  \t".to_string()));
}

#[test]
fn test_carriage_return_is_ignored_for_headers() {
    assert_eq!(classify("## Windows\r"), header(2, "Windows"));
    assert_eq!(classify("text\r"), LineKind::Content("text\r".to_string()));
}

#[test]
fn test_outline_numbers_are_split_from_titles() {
    assert_eq!(
        classify("## 1.2 Installation"),
        LineKind::Header {
            level: 2,
            title: "Installation".to_string(),
            number: Some("1.2".to_string()),
        }
    );
    // A single component is part of the title
    assert_eq!(classify("# 2024 Review"), header(1, "2024 Review"));
    assert_eq!(classify("# 1.x Notes"), header(1, "1.x Notes"));
}

#[test]
fn test_number_extraction_can_be_disabled() {
    let options = ClassifyOptions {
        extract_numbers: false,
        ..ClassifyOptions::default()
    };
    assert_eq!(
        classify_line("## 1.2 Installation", 1, &options).unwrap(),
        header(2, "1.2 Installation")
    );
}

#[test]
fn test_strict_policy_rejects_malformed_headers() {
    let options = ClassifyOptions {
        policy: HeaderPolicy::Strict,
        ..ClassifyOptions::default()
    };

    match classify_line("#hashtag", 12, &options) {
        Err(Error::MalformedHeader { line, text }) => {
            assert_eq!(line, 12);
            assert_eq!(text, "#hashtag");
        }
        other => panic!("expected malformed header error, got {other:?}"),
    }

    // Plain content is never malformed
    assert!(classify_line("plain text", 1, &options).is_ok());
}

#[test]
fn test_custom_marker() {
    let options = ClassifyOptions {
        marker: '=',
        ..ClassifyOptions::default()
    };
    assert_eq!(classify_line("== Part", 1, &options).unwrap(), header(2, "Part"));
    assert_eq!(
        classify_line("# Part", 1, &options).unwrap(),
        LineKind::Content("# Part".to_string())
    );
}

#[test]
fn test_classify_lines_numbers_from_one() {
    let options = ClassifyOptions {
        policy: HeaderPolicy::Strict,
        ..ClassifyOptions::default()
    };
    let results: Vec<_> = classify_lines(["# ok", "fine", "#bad"], &options).collect();

    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(results[2], Err(Error::MalformedHeader { line: 3, .. })));
}

#[test]
fn test_header_policy_from_str() {
    assert_eq!("strict".parse::<HeaderPolicy>().unwrap(), HeaderPolicy::Strict);
    assert!("loose".parse::<HeaderPolicy>().is_err());
}
