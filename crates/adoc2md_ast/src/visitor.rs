use crate::block::{Block, Inline};

/// Walks `block` and every descendant depth-first, calling `f` on each one.
///
/// `f` returns `false` to stop the walk early (a short-circuit "don't go
/// any further", not just "skip this node's children"): once any call
/// returns `false`, `visit` stops recursing and propagates `false` all the
/// way back up, mirroring the boolean "continue visiting" return used by
/// the original CST visitor this is grounded on.
pub fn visit(block: &Block, f: &mut impl FnMut(&Block) -> bool) -> bool {
    if !f(block) {
        return false;
    }
    match block {
        Block::Document(d) => visit_children(&d.children, f),
        Block::Container(c) => visit_children(&c.children, f),
        Block::Paragraph(p) => {
            for inline in &p.inlines {
                let as_block: Block = inline.clone().into();
                if !visit(&as_block, f) {
                    return false;
                }
            }
            true
        }
        Block::Example(e) => visit_children(&e.children, f),
        Block::ListBlock(lb) => visit_children(&lb.children, f),
        Block::List(l) => {
            for item in &l.items {
                if !visit_children(&item.children, f) {
                    return false;
                }
            }
            true
        }
        Block::Table(t) => {
            for cell in &t.cells {
                if !visit_children(&cell.children, f) {
                    return false;
                }
            }
            true
        }
        Block::Admonition(a) => {
            for inline in &a.content.inlines {
                let as_block: Block = inline.clone().into();
                if !visit(&as_block, f) {
                    return false;
                }
            }
            true
        }
        Block::Header(_)
        | Block::BlockTitle(_)
        | Block::Image(_)
        | Block::InlineImage(_)
        | Block::Link(_)
        | Block::Bookmark(_)
        | Block::HorLine
        | Block::Syntax(_)
        | Block::Text(_) => true,
    }
}

fn visit_children(children: &[Block], f: &mut impl FnMut(&Block) -> bool) -> bool {
    for child in children {
        if !visit(child, f) {
            return false;
        }
    }
    true
}

/// Mutable counterpart of `visit`, used by include level-offsetting and by
/// the renderer's header-level decrement: same depth-first, short-circuit
/// shape, but `f` may rewrite the node in place.
pub fn visit_mut(block: &mut Block, f: &mut impl FnMut(&mut Block) -> bool) -> bool {
    if !f(block) {
        return false;
    }
    match block {
        Block::Document(d) => visit_children_mut(&mut d.children, f),
        Block::Container(c) => visit_children_mut(&mut c.children, f),
        Block::Paragraph(p) => visit_inlines_mut(&mut p.inlines, f),
        Block::Example(e) => visit_children_mut(&mut e.children, f),
        Block::ListBlock(lb) => visit_children_mut(&mut lb.children, f),
        Block::List(l) => {
            for item in &mut l.items {
                if !visit_children_mut(&mut item.children, f) {
                    return false;
                }
            }
            true
        }
        Block::Table(t) => {
            for cell in &mut t.cells {
                if !visit_children_mut(&mut cell.children, f) {
                    return false;
                }
            }
            true
        }
        Block::Admonition(a) => visit_inlines_mut(&mut a.content.inlines, f),
        Block::Header(_)
        | Block::BlockTitle(_)
        | Block::Image(_)
        | Block::InlineImage(_)
        | Block::Link(_)
        | Block::Bookmark(_)
        | Block::HorLine
        | Block::Syntax(_)
        | Block::Text(_) => true,
    }
}

fn visit_children_mut(children: &mut [Block], f: &mut impl FnMut(&mut Block) -> bool) -> bool {
    for child in children {
        if !visit_mut(child, f) {
            return false;
        }
    }
    true
}

/// Runs `f` over each inline by converting it to a `Block` and back (see
/// `TryFrom<Block> for Inline`). Uses a placeholder to satisfy the borrow
/// checker while the owned value is out for conversion.
fn visit_inlines_mut(inlines: &mut [Inline], f: &mut impl FnMut(&mut Block) -> bool) -> bool {
    for inline in inlines {
        let owned = std::mem::replace(inline, Inline::Text(crate::block::Text { literal: String::new() }));
        let mut as_block: Block = owned.into();
        let keep_going = visit_mut(&mut as_block, f);
        *inline = Inline::try_from(as_block).expect("visit_mut must not change an inline's variant kind");
        if !keep_going {
            return false;
        }
    }
    true
}

#[allow(dead_code)]
fn assert_inline_is_block(i: Inline) -> Block {
    i.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::*;

    #[test]
    fn stops_at_first_false() {
        let doc = Block::Document(Document {
            name: "x".into(),
            children: vec![
                Block::Text(Text { literal: "a".into() }),
                Block::Text(Text { literal: "b".into() }),
                Block::Text(Text { literal: "c".into() }),
            ],
        });
        let mut seen = Vec::new();
        visit(&doc, &mut |b| {
            if let Block::Text(t) = b {
                seen.push(t.literal.clone());
                t.literal != "b"
            } else {
                true
            }
        });
        assert_eq!(seen, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn descends_into_list_items() {
        let list = Block::List(List {
            marker: "*".into(),
            numbered: false,
            definition: false,
            callouts: false,
            level: 0,
            items: vec![ContainerBlock {
                children: vec![Block::Text(Text { literal: "item".into() })],
            }],
        });
        let mut seen = Vec::new();
        visit(&list, &mut |b| {
            if let Block::Text(t) = b {
                seen.push(t.literal.clone());
            }
            true
        });
        assert_eq!(seen, vec!["item".to_string()]);
    }

    #[test]
    fn visit_mut_rewrites_links_inside_paragraphs() {
        let mut p = Block::Paragraph(Paragraph {
            inlines: vec![
                Inline::Text(Text { literal: "see ".into() }),
                Inline::Link(Link { url: "old".into(), text: "here".into(), internal: true }),
            ],
        });
        visit_mut(&mut p, &mut |b| {
            if let Block::Link(l) = b {
                l.url = "new".into();
            }
            true
        });
        let Block::Paragraph(p) = p else { unreachable!() };
        let Inline::Link(l) = &p.inlines[1] else { panic!("expected a link") };
        assert_eq!(l.url, "new");
    }
}
