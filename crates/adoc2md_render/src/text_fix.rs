//! The text-fix pipeline applied to every `Text` node outside a code span,
//! per spec.md §4.4. Has no direct `original_source` counterpart —
//! `markdown.go`'s `ConvertParagraph` writes `Text.Text` through
//! unmodified — so the escaping rules here are built straight from
//! spec.md's bullet list, using `adoc2md_syntax::escape_outside_backticks`
//! to split a line into the inside/outside-backtick segments the rules
//! apply differently to.

use once_cell::sync::Lazy;
use regex::Regex;

use adoc2md_syntax::escape_outside_backticks;

static SMALL_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[small\]#([^#]*)#").unwrap());
static IDENT_HASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([^\s`#|{}\[\]]+)").unwrap());
static BOLD_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(^|[\s(])\*([^*\s][^*]*?)\*([\s).,;:!?]|$)").unwrap());
static TRAILING_BR: Lazy<Regex> = Lazy::new(|| Regex::new(r" \+$").unwrap());
static PASSTHROUGH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+\+\+(.*?)\+\+\+").unwrap());

/// Runs the complete pipeline over one line of plain text (a `Text`
/// node's literal, or a paragraph rendered as one line).
pub fn fix_text(input: &str) -> String {
    let unescaped = input.replace(r"\->", "->").replace(r"\=>", "=>").replace('\u{00A0}', " ");
    let unwrapped = SMALL_SPAN.replace_all(&unescaped, "$1").into_owned();

    let fixed = escape_outside_backticks(&unwrapped, fix_outside, fix_inside);

    let with_br = TRAILING_BR.replace(&fixed, "<br>").into_owned();
    checklist_marker(&with_br)
}

fn fix_inside(segment: &str) -> String {
    let no_passthrough = PASSTHROUGH.replace_all(segment, "$1");
    let stripped = strip_bold_mono_combo(&no_passthrough);
    defuse_templating(&stripped)
}

/// A zero-width word-joiner between `{` and `#` keeps a literal `{#...}`
/// (e.g. a CSS id selector shown in code) from being swallowed by a
/// template engine scanning the rendered Markdown for `{#...}` syntax.
fn defuse_templating(segment: &str) -> String {
    segment.replace("{#", "{\u{200d}#")
}

/// `` `*mono and bold*` `` -> `` `mono and bold` ``: a `*...*` pair that
/// spans the *entire* inside-backtick segment is AsciiDoc's mono+bold
/// combo and contributes no visible markup in the Markdown target.
fn strip_bold_mono_combo(segment: &str) -> String {
    if let Some(stripped) = segment.strip_prefix('*').and_then(|s| s.strip_suffix('*')) {
        if !stripped.is_empty() {
            return stripped.to_string();
        }
    }
    segment.to_string()
}

fn fix_outside(segment: &str) -> String {
    let passthrough_escaped = PASSTHROUGH
        .replace_all(segment, |caps: &regex::Captures| escape_markdown_specials(&caps[1]))
        .into_owned();
    let hash_wrapped = IDENT_HASH.replace_all(&passthrough_escaped, "`#$1`").into_owned();
    let escaped = hash_wrapped.replace('|', r"\|");
    let bolded = BOLD_STAR.replace_all(&escaped, "$1**$2**$3").into_owned();
    let arrowed = bolded.replace("->", "\u{2192}");
    arrowed.replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_markdown_specials(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '*' | '_' | '`' | '#' | '|' | '[' | ']') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn checklist_marker(s: &str) -> String {
    s.replace("[*]", "[x]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_star_becomes_double_star() {
        assert_eq!(fix_text("*SQL условие* - условие"), "**SQL условие** - условие");
    }

    #[test]
    fn hash_ident_outside_backticks_is_wrapped() {
        assert_eq!(fix_text("Через #view представление"), "Через `#view` представление");
    }

    #[test]
    fn mono_bold_combo_inside_backticks_unwraps() {
        assert_eq!(fix_text("`*mono and bold*`"), "`mono and bold`");
    }

    #[test]
    fn small_span_unwraps_to_its_inner_text() {
        assert_eq!(fix_text("[small]#note#"), "note");
    }

    #[test]
    fn trailing_space_plus_becomes_br() {
        assert_eq!(fix_text("line one +"), "line one<br>");
    }

    #[test]
    fn checked_list_marker_rewrites() {
        assert_eq!(fix_text("[*] done"), "[x] done");
    }

    #[test]
    fn arrow_and_angle_brackets_outside_backticks() {
        assert_eq!(fix_text("a -> b, x<y>z"), "a \u{2192} b, x&lt;y&gt;z");
    }

    #[test]
    fn backtick_segments_are_left_unescaped() {
        assert_eq!(fix_text("see `a -> b` here"), "see `a -> b` here");
    }

    #[test]
    fn brace_hash_inside_backticks_gets_a_word_joiner() {
        assert_eq!(fix_text("`{#nav}`"), "`{\u{200d}#nav}`");
    }
}
