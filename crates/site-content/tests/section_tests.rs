//! Tests for named-section editing

use pretty_assertions::assert_eq;
use site_content::{extract_named_section, has_named_section, replace_named_section};

const HOME_LAYOUT: &str = r#"---
layout: default
---

<div class="hero">Welcome</div>

<!-- about-section -->
<h1><u>About</u></h1>
<p>We write about indigenous plants.</p>
<!-- /about-section -->

<!-- footer-note -->Built with Jekyll<!-- /footer-note -->
"#;

#[test]
fn test_extract_multiline_section() {
    let about = extract_named_section(HOME_LAYOUT, "about-section").unwrap();
    assert_eq!(
        about,
        "<h1><u>About</u></h1>\n<p>We write about indigenous plants.</p>"
    );
}

#[test]
fn test_extract_inline_section() {
    assert_eq!(
        extract_named_section(HOME_LAYOUT, "footer-note").as_deref(),
        Some("Built with Jekyll")
    );
}

#[test]
fn test_extract_missing_section() {
    assert_eq!(extract_named_section(HOME_LAYOUT, "missing-id"), None);
    assert!(!has_named_section(HOME_LAYOUT, "missing-id"));
}

#[test]
fn test_replace_missing_section_is_noop() {
    assert_eq!(
        replace_named_section(HOME_LAYOUT, "missing-id", "X"),
        HOME_LAYOUT
    );
}

#[test]
fn test_replace_only_touches_target_section() {
    let updated = replace_named_section(HOME_LAYOUT, "about-section", "<p>New about.</p>");

    assert_eq!(
        extract_named_section(&updated, "about-section").as_deref(),
        Some("<p>New about.</p>")
    );
    assert_eq!(
        extract_named_section(&updated, "footer-note").as_deref(),
        Some("Built with Jekyll")
    );
    assert!(updated.starts_with("---\nlayout: default\n---"));
    assert!(updated.contains("<div class=\"hero\">Welcome</div>"));
}

#[test]
fn test_replace_every_occurrence() {
    let content = "<!-- s -->a<!-- /s -->\n<!-- s -->b<!-- /s -->";
    let updated = replace_named_section(content, "s", "z");
    assert_eq!(updated, "<!-- s -->\nz\n<!-- /s -->\n<!-- s -->\nz\n<!-- /s -->");
}

#[test]
fn test_replace_then_extract_round_trip() {
    let updated = replace_named_section(HOME_LAYOUT, "about-section", "  padded  ");
    assert_eq!(
        extract_named_section(&updated, "about-section").as_deref(),
        Some("padded")
    );
}
