//! Verbatim/syntax-block rendering: fenced code with callout-to-comment
//! rewriting, and the raw `<pre><code>` path for `inline-highlight?`
//! blocks. Grounded on `markdown.go`'s handling of `SyntaxBlock` (the
//! callout regex and the `pass:quotes[#…#]` span substitution follow
//! spec.md §4.4 literally, since the Go snapshot's fenced-block writer
//! was one of the pieces missing its own source file in the pack).

use once_cell::sync::Lazy;
use regex::Regex;

use adoc2md_ast::SyntaxBlock;

static CALLOUT: Lazy<Regex> = Lazy::new(|| Regex::new(r"<(?:\.|\d+)>").unwrap());
static PASS_QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"pass:quotes\[#(.*?)#\]").unwrap());

pub(crate) fn render_syntax(block: &SyntaxBlock, indent: &str) -> String {
    if block.inline_highlight {
        return render_inline_highlight(block, indent);
    }

    let mut seq = 0u32;
    let rewritten = CALLOUT.replace_all(&block.literal, |_: &regex::Captures| {
        seq += 1;
        format!("/* ({seq}) */")
    });

    let lang = block.language.as_deref().unwrap_or("");
    let fence_info = if seq > 0 {
        format!("{{ .{lang} .annotate }}")
    } else if lang.is_empty() {
        String::new()
    } else {
        lang.to_string()
    };

    let mut out = String::new();
    out.push_str(indent);
    out.push_str("```");
    out.push_str(&fence_info);
    out.push('\n');
    for line in rewritten.lines() {
        out.push_str(indent);
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(indent);
    out.push_str("```\n");
    out
}

fn render_inline_highlight(block: &SyntaxBlock, indent: &str) -> String {
    let spanned = PASS_QUOTES.replace_all(&block.literal, r#"<span class="hl">$1</span>"#);
    let mut out = String::new();
    out.push_str(indent);
    out.push_str("<pre><code>\n");
    for line in spanned.lines() {
        out.push_str(indent);
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(indent);
    out.push_str("</code></pre>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callouts_become_sequential_comments_and_annotate_suffix_is_added() {
        let block = SyntaxBlock {
            language: Some("rust".into()),
            literal: "let x = 1; <.>\nlet y = 2; <.>".into(),
            inline_highlight: false,
        };
        let out = render_syntax(&block, "");
        assert!(out.starts_with("```{ .rust .annotate }\n"));
        assert!(out.contains("/* (1) */"));
        assert!(out.contains("/* (2) */"));
    }

    #[test]
    fn plain_block_without_callouts_has_bare_language_fence() {
        let block = SyntaxBlock { language: Some("json".into()), literal: "{}".into(), inline_highlight: false };
        let out = render_syntax(&block, "");
        assert_eq!(out, "```json\n{}\n```\n");
    }

    #[test]
    fn inline_highlight_emits_raw_pre_code_with_spans() {
        let block = SyntaxBlock {
            language: None,
            literal: "see pass:quotes[#term#] here".into(),
            inline_highlight: true,
        };
        let out = render_inline_highlight(&block, "");
        assert!(out.contains(r#"<span class="hl">term</span>"#));
        assert!(out.starts_with("<pre><code>\n"));
    }
}
