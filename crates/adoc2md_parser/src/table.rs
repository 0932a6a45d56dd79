//! Table parsing. Absent from `original_source` entirely (the Go
//! snapshot this spec was distilled from never implements `|===` tables),
//! so this is built directly from spec.md §4.2's description rather than
//! ported from a concrete original: read cells until the closing
//! `|===`, counting columns from the first row.

use adoc2md_ast::{Block, ContainerBlock, Table};
use adoc2md_syntax::TokenKind;

use crate::{IncludeError, ParseError, Parser};

/// Parses a `TABLE`-opened block. `p.tok` is the opening `|===` on entry;
/// on return `p.tok` is the token after the closing `|===`.
pub(crate) fn parse_table<F>(p: &mut Parser<'_, F>) -> Result<Table, ParseError>
where
    F: FnMut(&str) -> Result<String, IncludeError>,
{
    if !p.advance_many(2) {
        return Err(ParseError::unexpected_eof(&p.tok, "opening table"));
    }

    let mut cells = Vec::new();
    let mut cols = None;

    while p.tok.kind != TokenKind::Table && p.tok.kind != TokenKind::Eof {
        match p.tok.kind {
            TokenKind::Newline => {
                if cols.is_none() && !cells.is_empty() {
                    cols = Some(cells.len());
                }
                if !p.advance() {
                    return Err(ParseError::unexpected_eof(&p.tok, "inside table"));
                }
            }
            TokenKind::AColumn => {
                if !p.advance() {
                    return Err(ParseError::unexpected_eof(&p.tok, "after a| column marker"));
                }
                let mut cell = ContainerBlock::default();
                while !matches!(p.tok.kind, TokenKind::Column | TokenKind::AColumn | TokenKind::Table | TokenKind::Eof)
                {
                    if p.tok.kind == TokenKind::Newline {
                        if !p.advance() {
                            return Err(ParseError::unexpected_eof(&p.tok, "inside a| cell"));
                        }
                        continue;
                    }
                    if let Some(b) = p.parse_block()? {
                        cell.children.push(b);
                    }
                }
                cells.push(cell);
            }
            TokenKind::Column => {
                if !p.advance() {
                    return Err(ParseError::unexpected_eof(&p.tok, "after | column marker"));
                }
                let par = p.parse_paragraph(true)?;
                cells.push(ContainerBlock { children: vec![Block::Paragraph(par)] });
            }
            _ => {
                // Stray content between cells (extra whitespace, a lone
                // comment) — skip rather than fail the whole table.
                if !p.advance() {
                    return Err(ParseError::unexpected_eof(&p.tok, "inside table row"));
                }
            }
        }
    }

    let cols = cols.unwrap_or_else(|| cells.len().max(1));
    let header = cells.len() > cols;

    if p.tok.kind == TokenKind::Table && !p.advance() {
        return Err(ParseError::unexpected_eof(&p.tok, "closing table"));
    }

    Ok(Table { cols, header, cells })
}
