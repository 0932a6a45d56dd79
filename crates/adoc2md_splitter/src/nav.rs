//! Navigation-file patcher: substitutes the generated nav entries into a
//! block delimited by `# <doc> {` / `# <doc> }` marker lines inside an
//! existing MkDocs nav YAML file. Ported from `nav.go`'s `writeNav`.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("cannot find a `# {doc_name} {{ ... # {doc_name} }}` block to replace")]
    MarkerNotFound { doc_name: String },
}

/// Replaces the content between `# <doc_name> {` and `# <doc_name> }` in
/// `input` with `nav`, one entry per line, indented to match the opening
/// marker's own indentation.
pub fn write_nav(input: &str, doc_name: &str, nav: &[String]) -> Result<String, NavError> {
    let quoted = regex::escape(doc_name);
    // (?s) lets `.` cross newlines, (?m) anchors `^`/`$` per line; mirrors
    // Go's `(?ms)` inline flags in `nav.go`.
    let pattern = format!(r"(?sm)^(\s*)(# {quoted} \{{\s*?\r?\n).*(^\s*# {quoted} \}})");
    static CACHE: Lazy<std::sync::Mutex<std::collections::HashMap<String, Regex>>> =
        Lazy::new(|| std::sync::Mutex::new(std::collections::HashMap::new()));
    let mut cache = CACHE.lock().unwrap();
    let re = cache.entry(pattern.clone()).or_insert_with(|| Regex::new(&pattern).unwrap());

    let caps = re.captures(input).ok_or_else(|| NavError::MarkerNotFound { doc_name: doc_name.to_string() })?;
    let indent = &caps[1];
    let mut nav_str = String::new();
    for (i, line) in nav.iter().enumerate() {
        if i > 0 {
            nav_str.push('\n');
        }
        nav_str.push_str(indent);
        nav_str.push_str(line);
    }
    nav_str.push('\n');

    let opener = &caps[2];
    let closer = &caps[3];
    let replacement = format!("{indent}{opener}{nav_str}{closer}");
    Ok(re.replace(input, regex::NoExpand(&replacement)).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_block_between_markers() {
        let input = "nav:\n  - Home: index.md\n  # guide {\n  - stale: old.md\n  # guide }\n  - Other: other.md\n";
        let out = write_nav(input, "guide", &["- Intro: guide_1.md".to_string(), "- Setup: guide_2.md".to_string()]).unwrap();
        assert!(out.contains("# guide {\n  - Intro: guide_1.md\n  - Setup: guide_2.md\n  # guide }"));
        assert!(out.contains("- Other: other.md"));
    }

    #[test]
    fn missing_markers_is_an_error() {
        let input = "nav:\n  - Home: index.md\n";
        let err = write_nav(input, "guide", &[]).unwrap_err();
        assert!(matches!(err, NavError::MarkerNotFound { .. }));
    }
}
