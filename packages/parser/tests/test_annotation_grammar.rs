//! Grammar tests across the four scanner entry points
//!
//! Validates:
//! - Same body grammar everywhere (colon, padding, blank bodies)
//! - Position rules per entry point
//! - Attribute order and duplicates are preserved

use attrmark_parser::{
    find_first, parse_whole, probe_contains, probe_whole, scan_block_trailer, scan_line,
    Attribute, AttributeToken,
};

#[test]
fn test_full_example_annotation() {
    let found = scan_line("Careful here {.warning #note data-x=1}");
    assert_eq!(found.len(), 1);

    let m = &found[0];
    assert_eq!(m.raw, "{.warning #note data-x=1}");
    assert_eq!(m.inner, ".warning #note data-x=1");
    assert_eq!(
        m.attributes,
        vec![
            Attribute::new("class", "warning"),
            Attribute::new("id", "note"),
            Attribute::new("data-x", "1"),
        ]
    );
    assert!(m.validate().is_ok());
}

#[test]
fn test_duplicates_kept_in_order() {
    let m = parse_whole("{title=a .x title=b .x}").unwrap();
    assert_eq!(
        m.attributes,
        vec![
            Attribute::new("title", "a"),
            Attribute::new("class", "x"),
            Attribute::new("title", "b"),
            Attribute::new("class", "x"),
        ]
    );
}

#[test]
fn test_quoted_value_with_flag() {
    let m = parse_whole(r#"{data-x="a b" checked}"#).unwrap();
    assert_eq!(
        m.attributes,
        vec![Attribute::new("data-x", "a b"), Attribute::flag("checked")]
    );
}

#[test]
fn test_entry_points_agree_on_body() {
    for text in ["{.a}", "{: .a}", "{  .a  }", "{:.a}"] {
        assert!(probe_whole(text), "{text} should be a whole annotation");
        assert!(probe_contains(text));
        assert_eq!(scan_line(text).len(), 1);
        assert_eq!(find_first(text).unwrap().inner, ".a");
    }

    for text in ["{}", "{ }", "{\n}", "{.a"] {
        assert!(!probe_whole(text), "{text:?} should not match");
        assert!(!probe_contains(text));
        assert!(scan_line(text).is_empty());
    }
}

#[test]
fn test_body_excludes_open_brace() {
    for text in ["{a{b}", "{ {x}", "{{.a}"] {
        assert!(!probe_whole(text), "{text:?} is not one annotation");
        assert!(parse_whole(text).is_none());
    }

    // The annotation starts at the last `{` before the `}`
    for (text, raw) in [("{a{b}", "{b}"), ("{ {x}", "{x}"), ("x { {.note}", "{.note}")] {
        let found = scan_line(text);
        assert_eq!(found.len(), 1, "{text:?}");
        assert_eq!(found[0].raw, raw);
        assert_eq!(&text[found[0].span.clone()], raw);
        assert_eq!(find_first(text).unwrap().raw, raw);
    }

    let m = find_first("Use {curly {.note}").unwrap();
    assert_eq!(m.attributes, vec![Attribute::new("class", "note")]);
}

#[test]
fn test_one_annotation_per_line_in_multiline_text() {
    let found = scan_line("one {.a}
two {.b}
three");
    let raws: Vec<_> = found.iter().map(|m| m.raw.as_str()).collect();
    assert_eq!(raws, vec!["{.a}", "{.b}"]);
    assert_eq!(found[1].span, 13..17);
}

#[test]
fn test_inline_vs_trailing() {
    let text = "mid {.a} line";
    assert!(probe_contains(text));
    assert!(scan_line(text).is_empty());
    assert!(scan_block_trailer(text).is_none());
}

#[test]
fn test_block_trailer_after_inline() {
    // The trailer is found even when an inline annotation comes first
    let text = "Hello {.a}\n{.b}";
    let trailer = scan_block_trailer(text).unwrap();
    assert_eq!(trailer.raw, "{.b}");
    assert_eq!(find_first(text).unwrap().raw, "{.a}");
}

#[test]
fn test_tokens_roundtrip_serde() {
    let m = parse_whole("{.a checked}").unwrap();
    let json = serde_json::to_string(&m).unwrap();
    let back: attrmark_parser::AnnotationMatch = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);

    let token = AttributeToken::Class {
        name: "a".to_string(),
    };
    let json = serde_json::to_value(&token).unwrap();
    assert_eq!(json["type"], "class");
}
