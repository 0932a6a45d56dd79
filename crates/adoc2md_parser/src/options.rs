//! Parses the contents of a `BLOCK_OPTS` token (`[source,json]`, `[#id,
//! float]`, `[NOTE]`, ...) into the handful of flags the rest of the
//! parser cares about. Grounded on spec.md §4.2's description of what the
//! option string may carry; the original implementation never models this
//! (block options are out of scope there), so there is no Go counterpart.

const KNOWN_LANGUAGES: &[&str] = &["sql", "json", "c#", "js", "ts", "xml"];
const ADMONITION_KINDS: &[&str] = &["note", "tip", "important", "warning", "caution"];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockOptions {
    pub id: Option<String>,
    pub float: bool,
    pub collapsible: bool,
    pub language: Option<String>,
    pub kind: Option<String>,
    /// `macros+`: enables inline highlight passthrough for syntax blocks.
    pub inline_highlight: bool,
}

impl BlockOptions {
    pub fn parse(raw: &str) -> BlockOptions {
        let mut opts = BlockOptions::default();
        for part in raw.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some(id) = part.strip_prefix('#') {
                opts.id = Some(id.to_string());
                continue;
            }
            if part.eq_ignore_ascii_case("float") {
                opts.float = true;
                continue;
            }
            if part.eq_ignore_ascii_case("collapsible") {
                opts.collapsible = true;
                continue;
            }
            if part.eq_ignore_ascii_case("macros+") {
                opts.inline_highlight = true;
                continue;
            }
            let lower = part.to_ascii_lowercase();
            if KNOWN_LANGUAGES.contains(&lower.as_str()) {
                opts.language = Some(lower);
                continue;
            }
            if ADMONITION_KINDS.contains(&lower.as_str()) {
                opts.kind = Some(lower);
                continue;
            }
            // Unrecognized option words (e.g. "source") are ignored: they
            // describe rendering hints the splitter/renderer don't need.
        }
        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_id_and_float() {
        let opts = BlockOptions::parse("#v3.6, float");
        assert_eq!(opts.id.as_deref(), Some("v3.6"));
        assert!(opts.float);
    }

    #[test]
    fn parses_language() {
        let opts = BlockOptions::parse("source,json");
        assert_eq!(opts.language.as_deref(), Some("json"));
    }

    #[test]
    fn parses_admonition_kind_and_collapsible() {
        let opts = BlockOptions::parse("WARNING, collapsible");
        assert_eq!(opts.kind.as_deref(), Some("warning"));
        assert!(opts.collapsible);
    }
}
