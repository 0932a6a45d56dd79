//! Rune-aware string helpers and path arithmetic used across the pipeline.
//!
//! Mirrors `asciidoc2md/utils` from the original Go implementation
//! (`FirstN`/`LastN`/`ShortenString`), expressed with Rust's native
//! `char`-boundary iteration instead of manual byte scanning.

/// Number of Unicode scalar values (runes) in `s`.
pub fn rune_len(s: &str) -> usize {
    s.chars().count()
}

/// Returns the substring spanning runes `[start, end)`. Clamps to the
/// string's rune length; `start >= end` yields an empty string.
pub fn slice_runes(s: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let mut char_indices = s.char_indices().map(|(i, _)| i).chain(std::iter::once(s.len()));
    let byte_start = char_indices.clone().nth(start).unwrap_or(s.len());
    let byte_end = char_indices.nth(end).unwrap_or(s.len());
    if byte_start >= byte_end {
        return "";
    }
    &s[byte_start..byte_end]
}

/// Lowercases `text` and replaces every run of characters that are neither
/// letters nor digits with a single `-`, trimming leading/trailing dashes.
/// Used to derive a heading's implicit permalink anchor.
pub fn kebab_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_dash = true; // swallow a leading dash
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            out.push('-');
            last_was_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Joins a directory and a relative path the way the splitter/renderer need
/// to for image prefixes and include resolution: no normalization beyond
/// collapsing a doubled separator, since AsciiDoc includes and image paths
/// are always forward-slash relative paths regardless of host OS.
pub fn join_path(base: &str, rel: &str) -> String {
    if base.is_empty() {
        return rel.to_string();
    }
    if base.ends_with('/') {
        format!("{base}{rel}")
    } else {
        format!("{base}/{rel}")
    }
}

/// Splits `text` into alternating (outside-backtick, inside-backtick)
/// segments, applying `outside` and `inside` respectively, and
/// concatenating the results. A backtick only opens/closes a span when it
/// sits at a word boundary (preceded/followed by start-of-string,
/// whitespace, or punctuation other than another backtick), matching
/// spec.md §4.4's "recognised only when backticks are at word boundaries".
/// An unterminated opening backtick is treated as plain text and handed to
/// `outside`.
pub fn escape_outside_backticks(
    text: &str,
    mut outside: impl FnMut(&str) -> String,
    mut inside: impl FnMut(&str) -> String,
) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    let mut seg_start = 0;

    let is_boundary = |idx: isize| -> bool {
        if idx < 0 || idx as usize >= chars.len() {
            return true;
        }
        let c = chars[idx as usize];
        c.is_whitespace() || (c.is_ascii_punctuation() && c != '`')
    };

    while i < chars.len() {
        if chars[i] == '`' && is_boundary(i as isize - 1) {
            // Look for a matching closing backtick at a word boundary.
            let mut j = i + 1;
            let mut found = None;
            while j < chars.len() {
                if chars[j] == '`' && is_boundary(j as isize + 1) {
                    found = Some(j);
                    break;
                }
                j += 1;
            }
            if let Some(close) = found {
                let before: String = chars[seg_start..i].iter().collect();
                out.push_str(&outside(&before));
                let within: String = chars[i + 1..close].iter().collect();
                out.push('`');
                out.push_str(&inside(&within));
                out.push('`');
                i = close + 1;
                seg_start = i;
                continue;
            }
        }
        i += 1;
    }
    let rest: String = chars[seg_start..].iter().collect();
    out.push_str(&outside(&rest));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_case_lowercases_and_collapses() {
        assert_eq!(kebab_case("Версия 3.6"), "версия-3-6");
        assert_eq!(kebab_case("  Hello, World!  "), "hello-world");
    }

    #[test]
    fn slice_runes_handles_multibyte() {
        let s = "héllo wörld";
        assert_eq!(slice_runes(s, 0, 5), "héllo");
    }

    #[test]
    fn escape_outside_backticks_splits_segments() {
        let out = escape_outside_backticks(
            "a *b* `c*d` e",
            |s| s.replace('*', "**"),
            |s| s.to_string(),
        );
        assert_eq!(out, "a **b** `c*d` e");
    }

    #[test]
    fn escape_outside_backticks_unterminated_is_plain() {
        let out = escape_outside_backticks("a `b", |s| s.to_string(), |s| s.to_string());
        assert_eq!(out, "a `b");
    }
}
