//! Named sections delimited by HTML comments
//!
//! A section looks like `<!-- about-section -->...<!-- /about-section -->`
//! and lets one fragment of a larger page be edited without touching the
//! rest of the file.

use regex::{Captures, Regex};

/// Start and end markers for a section id
pub fn section_markers(section_id: &str) -> (String, String) {
    (
        format!("<!-- {section_id} -->"),
        format!("<!-- /{section_id} -->"),
    )
}

fn section_pattern(section_id: &str) -> Option<Regex> {
    let id = regex::escape(section_id);
    Regex::new(&format!(r"(?s)(<!-- {id} -->)(.*?)(<!-- /{id} -->)")).ok()
}

/// Extract the trimmed inner text of the first section with this id.
pub fn extract_named_section(content: &str, section_id: &str) -> Option<String> {
    let pattern = section_pattern(section_id)?;
    let captures = pattern.captures(content)?;
    captures.get(2).map(|m| m.as_str().trim().to_string())
}

/// Whether the content carries a section with this id
pub fn has_named_section(content: &str, section_id: &str) -> bool {
    section_pattern(section_id).is_some_and(|p| p.is_match(content))
}

/// Replace the inner text of every section with this id.
///
/// The new text is placed on its own lines between the markers and is
/// inserted literally. Content without the section is returned unchanged;
/// use [`has_named_section`] first when absence matters.
pub fn replace_named_section(content: &str, section_id: &str, new_text: &str) -> String {
    let Some(pattern) = section_pattern(section_id) else {
        return content.to_string();
    };

    pattern
        .replace_all(content, |caps: &Captures| {
            format!("{}\n{}\n{}", &caps[1], new_text, &caps[3])
        })
        .into_owned()
}
