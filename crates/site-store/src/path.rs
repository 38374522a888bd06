//! Repository path normalization

use crate::{Error, Result};

/// Normalize a repository path for file operations.
///
/// Strips surrounding slashes and rejects empty paths, `.`/`..` segments,
/// empty segments and backslashes.
pub fn normalize_file_path(path: &str) -> Result<String> {
    let normalized = normalize_dir_path(path)?;
    if normalized.is_empty() {
        return Err(invalid(path, "file path is empty"));
    }
    Ok(normalized)
}

/// Normalize a repository path for directory operations.
///
/// The empty string (or `/`) names the repository root.
pub fn normalize_dir_path(path: &str) -> Result<String> {
    if path.contains('\\') {
        return Err(invalid(path, "backslashes are not allowed"));
    }

    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    for segment in trimmed.split('/') {
        match segment {
            "" => return Err(invalid(path, "empty path segment")),
            "." | ".." => return Err(invalid(path, "relative segments are not allowed")),
            _ => {}
        }
    }

    Ok(trimmed.to_string())
}

/// Parent directory of a normalized path, empty for root-level files
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

fn invalid(path: &str, reason: &str) -> Error {
    Error::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("about.html", "about.html")]
    #[case("/_posts/a.md", "_posts/a.md")]
    #[case("_layouts/home.html/", "_layouts/home.html")]
    fn test_normalize_file_path(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_file_path(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("/")]
    #[case("_posts/../secret")]
    #[case("_posts//a.md")]
    #[case("_posts\\a.md")]
    fn test_normalize_file_path_rejects(#[case] input: &str) {
        assert!(matches!(
            normalize_file_path(input),
            Err(Error::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_root_dir() {
        assert_eq!(normalize_dir_path("/").unwrap(), "");
        assert_eq!(normalize_dir_path("").unwrap(), "");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("_posts/a.md"), "_posts");
        assert_eq!(parent_dir("a/b/c.md"), "a/b");
        assert_eq!(parent_dir("about.html"), "");
    }
}
