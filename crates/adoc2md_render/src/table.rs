//! Table-to-Markdown conversion, including the table-to-list transform.
//! Grounded on `markdown.go`'s `ConvertTable`/`ConvertComplexTable` for the
//! exact per-row `_{header}_:` labelling (the simple-table HTML-width
//! hint and the "single cell, no header" admonition case are spec.md §4.4
//! additions the Go source doesn't have).

use adoc2md_ast::{Block, ContainerBlock, Table};

use crate::{render_container, render_paragraph_text, Renderer};

enum Shape {
    Simple,
    SingleCellAdmonition,
    ListTransform,
}

fn classify(table: &Table) -> Shape {
    if table.cols == 1 && !table.header {
        return Shape::SingleCellAdmonition;
    }
    if table.cols >= 2 && table.cells.iter().all(is_single_paragraph) {
        return Shape::Simple;
    }
    Shape::ListTransform
}

fn is_single_paragraph(cell: &ContainerBlock) -> bool {
    matches!(cell.children.as_slice(), [Block::Paragraph(_)])
}

fn cell_text(renderer: &Renderer, cell: &ContainerBlock) -> String {
    match cell.children.first() {
        Some(Block::Paragraph(p)) => render_paragraph_text(renderer, p),
        _ => render_container(renderer, cell, ""),
    }
}

pub(crate) fn render_table(renderer: &Renderer, table: &Table, indent: &str) -> String {
    match classify(table) {
        Shape::SingleCellAdmonition => {
            let body = table.cells.first().map(|c| cell_text(renderer, c)).unwrap_or_default();
            format!("{indent}!!! info\n{indent}    {body}\n")
        }
        Shape::Simple => render_simple(renderer, table, indent),
        Shape::ListTransform => render_as_list(renderer, table, indent),
    }
}

fn render_simple(renderer: &Renderer, table: &Table, indent: &str) -> String {
    let mut out = String::new();
    for (i, cell) in table.cells.iter().enumerate() {
        let col = i % table.cols;
        if col == 0 {
            out.push_str(indent);
            out.push_str("| ");
        }
        let text = cell_text(renderer, cell);
        if table.header && i < table.cols {
            // HTML-width hint on every header cell, per the first column's
            // convention extended across the row.
            out.push_str(&format!(r#"<div style="min-width: 120px">{text}</div>"#));
        } else {
            out.push_str(&text);
        }
        out.push_str(" |");
        if col == table.cols - 1 {
            out.push('\n');
            if table.header && i + 1 == table.cols {
                out.push_str(indent);
                out.push_str(&" --- |".repeat(table.cols));
                out.push('\n');
            }
        }
    }
    out
}

fn render_as_list(renderer: &Renderer, table: &Table, indent: &str) -> String {
    if !table.header {
        // No header row to draw per-column labels from: fall back to
        // treating every row as a flat bullet of its joined cell text.
        let mut out = String::new();
        for row in table.cells.chunks(table.cols.max(1)) {
            out.push_str(indent);
            out.push_str("* ");
            let joined: Vec<String> = row.iter().map(|c| cell_text(renderer, c)).collect();
            out.push_str(&joined.join(", "));
            out.push('\n');
        }
        return out;
    }
    let header: Vec<String> = table.cells[..table.cols].iter().map(|c| cell_text(renderer, c)).collect();
    let mut out = String::new();
    let body = &table.cells[table.cols..];
    for row in body.chunks(table.cols) {
        out.push_str(indent);
        out.push_str("* ");
        for (col, cell) in row.iter().enumerate() {
            if col > 0 {
                out.push('\n');
                out.push_str(indent);
                out.push_str("  ");
            }
            let label = &header[col];
            let text = cell_text(renderer, cell);
            if col == 0 {
                out.push_str(&format!("_{label}_: {text}"));
            } else {
                out.push_str(&format!("_{label}_: {text}"));
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use adoc2md_ast::{Inline, Paragraph, Text};

    fn para_cell(text: &str) -> ContainerBlock {
        ContainerBlock { children: vec![Block::Paragraph(Paragraph { inlines: vec![Inline::Text(Text { literal: text.to_string() })] })] }
    }

    #[test]
    fn simple_two_column_table_renders_as_markdown_table() {
        let table = Table {
            cols: 2,
            header: true,
            cells: vec![para_cell("Name"), para_cell("Value"), para_cell("a"), para_cell("1")],
        };
        let renderer = Renderer::new("", 2);
        let out = render_table(&renderer, &table, "");
        assert!(out.contains("--- |"));
        assert!(out.contains("| a |"));
    }

    #[test]
    fn single_cell_without_header_becomes_admonition() {
        let table = Table { cols: 1, header: false, cells: vec![para_cell("hello")] };
        let renderer = Renderer::new("", 2);
        let out = render_table(&renderer, &table, "");
        assert!(out.starts_with("!!! info"));
    }

    #[test]
    fn multi_paragraph_cells_become_a_bulleted_list() {
        let complex_cell = ContainerBlock {
            children: vec![
                Block::Paragraph(Paragraph { inlines: vec![Inline::Text(Text { literal: "one".into() })] }),
                Block::Paragraph(Paragraph { inlines: vec![Inline::Text(Text { literal: "two".into() })] }),
            ],
        };
        let table = Table { cols: 2, header: true, cells: vec![para_cell("Col1"), para_cell("Col2"), complex_cell, para_cell("x")] };
        let renderer = Renderer::new("", 2);
        let out = render_table(&renderer, &table, "");
        assert!(out.trim_start().starts_with('*'));
        assert!(out.contains("_Col1_"));
    }
}
