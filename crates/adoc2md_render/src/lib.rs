//! Block tree to Markdown renderer. Grounded on `markdown.go`'s per-kind
//! `Convert*` methods and `RenderMarkdown`'s blank-line-between-siblings
//! rule; text escaping lives in [`text_fix`], table shaping in `table`,
//! verbatim/code-block shaping in `syntax`.
//!
//! Deliberately independent of the splitter/config crates: by the time a
//! block tree reaches here every `Link.url` has already been resolved, so
//! all this crate needs is where split chapters start (`split_level`) and
//! where images live (`image_prefix`).

mod syntax;
mod table;
pub mod text_fix;

use adoc2md_ast::{
    Admonition, AdmonitionKind, Block, ContainerBlock, DelimiterKind, ExampleBlock, Header, List, Paragraph,
};

pub struct Renderer {
    image_prefix: String,
    split_level: u8,
}

impl Renderer {
    pub fn new(image_prefix: &str, split_level: u8) -> Self {
        Self { image_prefix: image_prefix.to_string(), split_level }
    }

    /// Renders one already-partitioned chapter (the slice of top-level
    /// blocks destined for a single output file).
    pub fn render_chapter(&self, blocks: &[Block]) -> String {
        self.render_blocks(blocks, "")
    }

    fn render_blocks(&self, blocks: &[Block], indent: &str) -> String {
        let mut out = String::new();
        let mut first = true;
        for block in blocks {
            if let Some(rendered) = self.render_block(block, indent) {
                if rendered.is_empty() {
                    continue;
                }
                if !first {
                    out.push('\n');
                }
                out.push_str(&rendered);
                first = false;
            }
        }
        out
    }

    fn render_block(&self, block: &Block, indent: &str) -> Option<String> {
        match block {
            Block::Header(h) => self.render_header(h, indent),
            Block::Paragraph(p) => Some(format!("{indent}{}\n", render_paragraph_text(self, p))),
            Block::BlockTitle(bt) => Some(format!("{indent}**{}**\n", text_fix::fix_text(&bt.text))),
            Block::List(l) => Some(self.render_list(l, indent)),
            Block::ListBlock(lb) => Some(self.render_blocks(&lb.children, indent)),
            Block::Example(e) => Some(self.render_example(e, indent)),
            Block::Admonition(a) => Some(self.render_admonition(a, indent)),
            Block::Table(t) => Some(table::render_table(self, t, indent)),
            Block::Image(img) => Some(format!("{indent}![]({})\n", self.image_path(&img.path))),
            Block::InlineImage(img) => Some(format!("{indent}![]({})\n", self.image_path(&img.path))),
            Block::Link(l) => {
                let text = if l.text.is_empty() { l.url.as_str() } else { l.text.as_str() };
                Some(format!("{indent}[{text}]({})\n", l.url))
            }
            Block::Bookmark(_) => None,
            Block::HorLine => Some(format!("{indent}***\n")),
            Block::Syntax(s) => Some(syntax::render_syntax(s, indent)),
            Block::Text(t) => Some(format!("{indent}{}\n", text_fix::fix_text(&t.literal))),
            Block::Container(c) => Some(self.render_blocks(&c.children, indent)),
            Block::Document(d) => Some(self.render_blocks(&d.children, indent)),
        }
    }

    /// Headers below `split_level` carry no heading in the output at all
    /// (their chapter boundary already excluded them from this slice, but
    /// a stray one-off reference can still appear via an include). The
    /// split-level header itself prints unchanged — it reads as the page's
    /// title — while anything deeper decrements by one to close the gap
    /// left by the omitted levels below it, unless `split_level == 1`, in
    /// which case every level already starts from the top and nothing
    /// needs to move.
    fn render_header(&self, h: &Header, indent: &str) -> Option<String> {
        if h.float {
            return Some(format!("{indent}_{}_\n", text_fix::fix_text(&h.text)));
        }
        if h.level < self.split_level {
            return None;
        }
        let level = if h.level > self.split_level && self.split_level != 1 { h.level - 1 } else { h.level };
        let hashes = "#".repeat(level as usize);
        let id_suffix = h.id.as_ref().map(|id| format!(" {{ #{id} }}")).unwrap_or_default();
        Some(format!("{indent}{hashes} {}{id_suffix}\n", text_fix::fix_text(&h.text)))
    }

    fn render_list(&self, list: &List, indent: &str) -> String {
        let child_indent = format!("{indent}    ");
        let mut out = String::new();
        for (i, item) in list.items.iter().enumerate() {
            let marker = if list.numbered || list.callouts { format!("{}. ", i + 1) } else { "* ".to_string() };
            let body = self.render_blocks(&item.children, &child_indent);
            let first_line_stripped = body.strip_prefix(&child_indent).unwrap_or(&body);
            out.push_str(indent);
            out.push_str(&marker);
            out.push_str(first_line_stripped);
            if !out.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }

    fn render_admonition(&self, a: &Admonition, indent: &str) -> String {
        let kind = match a.kind {
            AdmonitionKind::Caution => "danger".to_string(),
            other => other.as_str().to_lowercase(),
        };
        let body = render_paragraph_text(self, &a.content);
        format!("{indent}!!! {kind}\n{indent}    {body}\n")
    }

    fn render_example(&self, e: &ExampleBlock, indent: &str) -> String {
        let prefix = if e.collapsible { "???" } else { "!!!" };
        let kind = e.kind.clone().unwrap_or_else(|| match e.delimiter {
            DelimiterKind::Example => "example".to_string(),
            DelimiterKind::Quote | DelimiterKind::Sidebar => "info".to_string(),
        });
        let child_indent = format!("{indent}    ");
        let body = self.render_blocks(&e.children, &child_indent);
        format!("{indent}{prefix} {kind}\n{body}")
    }

    fn image_path(&self, path: &str) -> String {
        adoc2md_syntax::join_path(&self.image_prefix, path)
    }
}

pub(crate) fn render_paragraph_text(renderer: &Renderer, p: &Paragraph) -> String {
    let mut out = String::new();
    for inline in &p.inlines {
        match inline {
            adoc2md_ast::Inline::Text(t) => out.push_str(&text_fix::fix_text(&t.literal)),
            adoc2md_ast::Inline::Link(l) => {
                let text = if l.text.is_empty() { l.url.as_str() } else { l.text.as_str() };
                out.push_str(&format!("[{text}]({})", l.url));
            }
            adoc2md_ast::Inline::InlineImage(img) => {
                out.push_str(&format!("![]({})", renderer.image_path(&img.path)));
            }
        }
    }
    out
}

pub(crate) fn render_container(renderer: &Renderer, container: &ContainerBlock, indent: &str) -> String {
    renderer.render_blocks(&container.children, indent)
}

/// Splits a flat top-level block slice into per-chapter slices at every
/// occurrence of a `split_level` header, the same boundary the map pass
/// uses: everything before the first one (typically a document title)
/// stays bundled into the first chapter.
pub fn partition_chapters(blocks: &[Block], split_level: u8) -> Vec<Vec<Block>> {
    let header_idxs: Vec<usize> = blocks
        .iter()
        .enumerate()
        .filter_map(|(i, b)| match b {
            Block::Header(h) if h.level == split_level => Some(i),
            _ => None,
        })
        .collect();

    if header_idxs.is_empty() {
        return vec![blocks.to_vec()];
    }

    let mut bounds = vec![0usize];
    bounds.extend(header_idxs.iter().skip(1).copied());
    bounds.push(blocks.len());

    bounds.windows(2).map(|w| blocks[w[0]..w[1]].to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adoc2md_ast::{Inline, Text};

    fn header(level: u8, text: &str, id: Option<&str>) -> Header {
        Header { level, text: text.to_string(), id: id.map(str::to_string), float: false, options: None }
    }

    #[test]
    fn heading_with_custom_id_renders_with_id_suffix() {
        let renderer = Renderer::new("", 2);
        let h = header(2, "Версия 3.6", Some("v3.6"));
        assert_eq!(
            renderer.render_header(&h, "").unwrap(),
            "## Версия 3.6 { #v3.6 }\n"
        );
    }

    #[test]
    fn header_below_split_level_is_omitted() {
        let renderer = Renderer::new("", 2);
        let h = header(1, "Title", None);
        assert_eq!(renderer.render_header(&h, ""), None);
    }

    #[test]
    fn header_above_split_level_decrements() {
        let renderer = Renderer::new("", 2);
        let h = header(3, "Sub", None);
        assert_eq!(renderer.render_header(&h, "").unwrap(), "## Sub\n");
    }

    #[test]
    fn float_header_renders_as_italic_text() {
        let renderer = Renderer::new("", 2);
        let mut h = header(4, "Aside", None);
        h.float = true;
        assert_eq!(renderer.render_header(&h, "").unwrap(), "_Aside_\n");
    }

    #[test]
    fn note_admonition_renders_kind_and_indented_body() {
        let renderer = Renderer::new("", 2);
        let a = Admonition {
            kind: AdmonitionKind::Note,
            content: Paragraph { inlines: vec![Inline::Text(Text { literal: "hello".into() })] },
        };
        assert_eq!(renderer.render_admonition(&a, ""), "!!! note\n    hello\n");
    }

    #[test]
    fn caution_admonition_maps_to_danger() {
        let renderer = Renderer::new("", 2);
        let a = Admonition {
            kind: AdmonitionKind::Caution,
            content: Paragraph { inlines: vec![Inline::Text(Text { literal: "careful".into() })] },
        };
        assert!(renderer.render_admonition(&a, "").starts_with("!!! danger"));
    }

    #[test]
    fn partition_chapters_groups_pre_header_content_with_first_chapter() {
        let blocks = vec![
            Block::Header(header(1, "Title", None)),
            Block::Header(header(2, "Intro", None)),
            Block::Header(header(2, "Setup", None)),
        ];
        let chapters = partition_chapters(&blocks, 2);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].len(), 2);
        assert_eq!(chapters[1].len(), 1);
    }

    #[test]
    fn unordered_list_items_are_indented_four_spaces() {
        let renderer = Renderer::new("", 2);
        let list = List {
            marker: "*".into(),
            numbered: false,
            definition: false,
            callouts: false,
            level: 0,
            items: vec![ContainerBlock {
                children: vec![Block::Paragraph(Paragraph { inlines: vec![Inline::Text(Text { literal: "one".into() })] })],
            }],
        };
        let out = renderer.render_list(&list, "");
        assert_eq!(out, "* one\n");
    }
}
