//! `include::file[leveloffset=±N]` resolution.
//!
//! Grounded on spec.md §4.2: the callback loads raw bytes for a path (the
//! parser doesn't know or care how), a fresh parser consumes them as a
//! complete document, and every header in the result has `leveloffset`
//! added to its level before being spliced in place of the include.

use adoc2md_ast::{visit_mut, Block};
use adoc2md_syntax::join_path;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{IncludeError, ParseError, Parser};

static INCLUDE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^include::([^\[]+)\[([^\]]*)\]$").unwrap());
static LEVELOFFSET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"leveloffset=([+-]?\d+)").unwrap());

/// A source file matching this is a tracking snippet the original system
/// special-cased to skip entirely; every revision silently ignores it
/// rather than erroring, so we do the same.
const IGNORED_INCLUDE: &str = "yandex-counter.adoc";

impl<'a, F> Parser<'a, F>
where
    F: FnMut(&str) -> Result<String, IncludeError>,
{
    pub(crate) fn parse_include(&mut self) -> Result<Option<Block>, ParseError> {
        let literal = self.tok.literal.clone();
        let line = self.tok.line;
        let caps = INCLUDE_RE
            .captures(&literal)
            .ok_or_else(|| ParseError::MalformedDirective { line, literal: literal.clone() })?;
        let file = caps.get(1).unwrap().as_str().to_string();
        let opts = caps.get(2).unwrap().as_str();
        let leveloffset: i32 = LEVELOFFSET_RE
            .captures(opts)
            .and_then(|c| c.get(1).unwrap().as_str().parse().ok())
            .unwrap_or(0);

        if !self.advance() {
            return Err(ParseError::unexpected_eof(&self.tok, "after include directive"));
        }

        if file.ends_with(IGNORED_INCLUDE) {
            return Ok(None);
        }

        let path = join_path(&self.dir, &file);
        let dir = parent_dir(&path);
        let source = (self.include)(&path).map_err(|source| ParseError::IncludeFailed { line, file: path.clone(), source })?;

        let mut nested_include = |p: &str| (self.include)(p);
        let included = Parser::parse_document(&source, file.clone(), dir, &mut nested_include)?;

        let mut children = included.children;
        if leveloffset != 0 {
            for child in &mut children {
                visit_mut(child, &mut |b| {
                    if let Block::Header(h) = b {
                        h.level = (h.level as i32 + leveloffset).clamp(1, 6) as u8;
                    }
                    true
                });
            }
        }
        Ok(Some(Block::Container(adoc2md_ast::ContainerBlock { children })))
    }
}

fn parent_dir(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[..idx].to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::unreachable_include;
    use adoc2md_ast::{Block, Document};

    use crate::Parser;

    #[test]
    fn splices_included_document_with_level_offset() {
        let mut loader = |path: &str| -> Result<String, crate::IncludeError> {
            assert_eq!(path, "inc.adoc");
            Ok("= H1\n\ntext\n\n== H1.1\n\nmore\n".to_string())
        };
        let doc: Document =
            Parser::parse_document("include::inc.adoc[leveloffset=+1]\n", "parent", "", &mut loader).unwrap();
        let Block::Container(container) = &doc.children[0] else {
            panic!("expected the include to splice in a container: {:?}", doc.children[0]);
        };
        let headers: Vec<_> = container
            .children
            .iter()
            .filter_map(|b| match b {
                Block::Header(h) => Some((h.level, h.text.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(headers, vec![(2, "H1".to_string()), (3, "H1.1".to_string())]);
    }

    #[test]
    fn skips_yandex_counter_include() {
        let doc = Parser::parse_document(
            "include::yandex-counter.adoc[]\ntext\n",
            "doc",
            "",
            &mut unreachable_include(),
        )
        .unwrap();
        assert!(matches!(doc.children[0], Block::Paragraph(_)));
    }
}
