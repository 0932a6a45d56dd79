//! Recursive textual dump of a `Block` tree, used by the CLI's `--dump` flag
//! and as the golden output format for parser tests. Shape follows the
//! original implementation's per-node `String(indent)` methods: one node
//! per line, a leading newline, two spaces of indent per nesting level.

use crate::block::{AdmonitionKind, Block, DelimiterKind, Inline};
use std::fmt::Write;

/// Renders `block` and its descendants as an indented text tree.
pub fn dump(block: &Block) -> String {
    let mut out = String::new();
    write_block(&mut out, block, 0);
    out
}

fn indent(out: &mut String, level: usize) {
    out.push('\n');
    for _ in 0..level {
        out.push_str("  ");
    }
}

fn write_children(out: &mut String, children: &[Block], level: usize) {
    for child in children {
        write_block(out, child, level);
    }
}

fn write_block(out: &mut String, block: &Block, level: usize) {
    match block {
        Block::Document(d) => {
            indent(out, level);
            let _ = write!(out, "document: {}", d.name);
            write_children(out, &d.children, level + 1);
        }
        Block::Container(c) => {
            indent(out, level);
            out.push_str("container block:");
            write_children(out, &c.children, level + 1);
        }
        Block::Paragraph(p) => {
            indent(out, level);
            out.push_str("paragraph:");
            for inline in &p.inlines {
                write_inline(out, inline, level + 1);
            }
        }
        Block::Header(h) => {
            indent(out, level);
            let _ = write!(
                out,
                "header: {}, {}{}",
                h.level,
                h.text,
                h.id.as_deref().map(|id| format!(" [[{id}]]")).unwrap_or_default()
            );
        }
        Block::BlockTitle(t) => {
            indent(out, level);
            let _ = write!(out, "block title: {}", t.text);
        }
        Block::List(l) => {
            indent(out, level);
            let _ = write!(
                out,
                "list begin: ({}/{}/{})",
                l.level, l.numbered, l.marker
            );
            for (i, item) in l.items.iter().enumerate() {
                indent(out, level + 1);
                if l.numbered {
                    let _ = write!(out, "item {}:", i + 1);
                } else {
                    out.push_str("item:");
                }
                write_children(out, &item.children, level + 2);
            }
            indent(out, level);
            out.push_str("list end");
        }
        Block::ListBlock(lb) => {
            indent(out, level);
            out.push_str("list block:");
            write_children(out, &lb.children, level + 1);
        }
        Block::Example(e) => {
            indent(out, level);
            let delim = match e.delimiter {
                DelimiterKind::Example => "example",
                DelimiterKind::Quote => "quote",
                DelimiterKind::Sidebar => "sidebar",
            };
            let _ = write!(
                out,
                "example: {}, {}{}",
                delim,
                e.kind.as_deref().unwrap_or("-"),
                if e.collapsible { ", collapsible" } else { "" }
            );
            write_children(out, &e.children, level + 1);
        }
        Block::Admonition(a) => {
            indent(out, level);
            let _ = write!(out, "admonition: {}", a.kind.as_str());
            for inline in &a.content.inlines {
                write_inline(out, inline, level + 1);
            }
        }
        Block::Table(t) => {
            indent(out, level);
            let _ = write!(out, "table: {} cols, header={}", t.cols, t.header);
            write_children(out, &t.cells, level + 1);
        }
        Block::Image(i) => {
            indent(out, level);
            let _ = write!(out, "image: {}", i.path);
        }
        Block::InlineImage(i) => {
            indent(out, level);
            let _ = write!(out, "inline image: {}", i.path);
        }
        Block::Link(l) => {
            indent(out, level);
            let _ = write!(out, "link: {} -> {}", l.text, l.url);
        }
        Block::Bookmark(b) => {
            indent(out, level);
            let _ = write!(out, "bookmark: {}", b.literal);
        }
        Block::HorLine => {
            indent(out, level);
            out.push_str("hor line");
        }
        Block::Syntax(s) => {
            indent(out, level);
            let _ = write!(out, "syntax block: {}", s.language.as_deref().unwrap_or("-"));
        }
        Block::Text(t) => {
            indent(out, level);
            let _ = write!(out, "text: {}", truncate(&t.literal, 100));
        }
    }
}

fn write_inline(out: &mut String, inline: &Inline, level: usize) {
    let as_block: Block = inline.clone().into();
    write_block(out, &as_block, level);
}

fn truncate(s: &str, max_chars: usize) -> String {
    let truncated: String = s.chars().take(max_chars).collect();
    if truncated.chars().count() < s.chars().count() {
        format!("{truncated}...")
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::*;

    #[test]
    fn dumps_nested_tree() {
        let doc = Block::Document(Document {
            name: "index".into(),
            children: vec![
                Block::Header(Header {
                    level: 1,
                    text: "Title".into(),
                    id: None,
                    float: false,
                    options: None,
                }),
                Block::Paragraph(Paragraph {
                    inlines: vec![Inline::Text(Text { literal: "hello".into() })],
                }),
            ],
        });
        let rendered = dump(&doc);
        assert!(rendered.contains("document: index"));
        assert!(rendered.contains("header: 1, Title"));
        assert!(rendered.contains("paragraph:"));
        assert!(rendered.contains("text: hello"));
    }

    #[test]
    fn truncates_long_text() {
        let long = "a".repeat(150);
        let rendered = dump(&Block::Text(Text { literal: long }));
        assert!(rendered.contains("..."));
    }
}
