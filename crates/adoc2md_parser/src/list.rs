//! List parsing: marker/ancestor-chain resolution, ported from
//! `parser.go`'s `parseList`/`parseListItem` and `ast.go`'s
//! `List.CheckMarker`.
//!
//! The Go version gives every in-progress `List` an owning pointer to its
//! parent so it can walk up the chain. We pass the chain explicitly down
//! the recursion instead, as an ordinary slice of marker strings — see the
//! note on `adoc2md_ast::List` for why the finished tree doesn't carry a
//! back-reference at all.

use adoc2md_ast::{Block, ContainerBlock, List};
use adoc2md_syntax::TokenKind;

use crate::{IncludeError, ParseError, Parser};

impl<'a, F> Parser<'a, F>
where
    F: FnMut(&str) -> Result<String, IncludeError>,
{
    /// `ancestors` holds the marker of every enclosing list, outermost
    /// first. Reaching a marker token equal to one of them means control
    /// returns to that ancestor without consuming the token.
    pub(crate) fn parse_list(&mut self, ancestors: Option<&[String]>) -> Result<List, ParseError> {
        let marker = self.tok.literal.clone();
        let numbered = self.tok.kind == TokenKind::NlMark || self.tok.kind == TokenKind::AlMark;
        let callouts = self.tok.kind == TokenKind::AlMark;
        let mut chain: Vec<String> = ancestors.map(|a| a.to_vec()).unwrap_or_default();
        let level = chain.len() as u32;

        let mut list = List {
            marker: marker.clone(),
            numbered,
            definition: false,
            callouts,
            level,
            items: Vec::new(),
        };
        chain.push(marker.clone());

        loop {
            if (self.tok.kind == TokenKind::Newline && self.prev_tok.kind == TokenKind::Newline)
                || self.tok.kind == TokenKind::Eof
            {
                return Ok(list);
            }
            let is_marker = matches!(self.tok.kind, TokenKind::LMark | TokenKind::NlMark | TokenKind::AlMark);
            if is_marker && self.tok.literal == marker {
                if !self.advance() {
                    return Err(ParseError::unexpected_eof(&self.tok, "after list marker"));
                }
                let item = self.parse_list_item()?;
                list.items.push(item);
            } else if is_marker && chain[..chain.len() - 1].iter().any(|m| *m == self.tok.literal) {
                // A marker matching an ancestor's: stop here so that
                // ancestor's own loop picks it back up.
                return Ok(list);
            } else if is_marker {
                let nested = self.parse_list(Some(&chain))?;
                match list.items.last_mut() {
                    Some(item) => item.children.push(Block::List(nested)),
                    None => {
                        return Err(ParseError::unexpected_eof(&self.tok, "nested list with no preceding item"))
                    }
                }
            } else {
                return Err(ParseError::unknown_token(&self.tok));
            }
        }
    }

    fn parse_list_item(&mut self) -> Result<ContainerBlock, ParseError> {
        let mut item = ContainerBlock::default();
        loop {
            let is_marker = matches!(self.tok.kind, TokenKind::LMark | TokenKind::NlMark | TokenKind::AlMark);
            if self.is_double_newline() || is_marker || self.tok.kind == TokenKind::Eof {
                break;
            }
            if self.tok.kind == TokenKind::Newline {
                if !self.advance() {
                    return Err(ParseError::unexpected_eof(&self.tok, "inside list item"));
                }
                continue;
            }
            if self.tok.kind == TokenKind::ConcatPar {
                if !self.advance_many(2) {
                    return Err(ParseError::unexpected_eof(&self.tok, "after paragraph-concat marker"));
                }
                continue;
            }
            if let Some(b) = self.parse_block()? {
                item.children.push(b);
            }
        }
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::parse;
    use adoc2md_ast::Block;

    #[test]
    fn ancestor_marker_returns_to_parent_level() {
        let src = "* item1\n** item1.1\n* item2\n";
        let doc = parse(src);
        match &doc.children[0] {
            Block::List(l) => assert_eq!(l.items.len(), 2, "expected two top-level items: {l:?}"),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn different_marker_nests() {
        let src = "* item1\n. nested\n* item2\n";
        let doc = parse(src);
        match &doc.children[0] {
            Block::List(l) => {
                assert_eq!(l.items.len(), 2);
                let has_nested = l.items[0].children.iter().any(|b| matches!(b, Block::List(_)));
                assert!(has_nested, "expected a nested list under the first item: {:?}", l.items[0]);
            }
            other => panic!("expected list, got {other:?}"),
        }
    }
}
