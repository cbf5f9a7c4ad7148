use crate::error::{Result, SermonError};

/// Raw text out of a `.docx`: one line per paragraph, table cells tab-separated.
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn extract(bytes: &[u8]) -> Result<String> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| SermonError::Extraction(format!("DOCX parse error: {e}")))?;

        let mut lines: Vec<String> = Vec::new();

        for child in &docx.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(paragraph) => {
                    lines.push(Self::paragraph_text(paragraph));
                }
                docx_rs::DocumentChild::Table(table) => {
                    lines.extend(Self::table_rows(table));
                }
                _ => {}
            }
        }

        // Trailing empty paragraphs carry no text
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }

        Ok(lines.join("\n"))
    }

    fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
        let mut content = String::new();
        for para_child in &paragraph.children {
            if let docx_rs::ParagraphChild::Run(run) = para_child {
                for run_child in &run.children {
                    match run_child {
                        docx_rs::RunChild::Text(text) => content.push_str(&text.text),
                        docx_rs::RunChild::Tab(_) => content.push('\t'),
                        docx_rs::RunChild::Break(_) => content.push('\n'),
                        _ => {}
                    }
                }
            }
        }
        content
    }

    fn table_rows(table: &docx_rs::Table) -> Vec<String> {
        let mut rows = Vec::new();

        for table_child in &table.rows {
            let docx_rs::TableChild::TableRow(row) = table_child;
            let mut cells: Vec<String> = Vec::new();
            for row_child in &row.cells {
                let docx_rs::TableRowChild::TableCell(cell) = row_child;
                let mut cell_text = String::new();
                for cell_child in &cell.children {
                    if let docx_rs::TableCellContent::Paragraph(para) = cell_child {
                        let para_text = Self::paragraph_text(para);
                        if !cell_text.is_empty() && !para_text.is_empty() {
                            cell_text.push(' ');
                        }
                        cell_text.push_str(&para_text);
                    }
                }
                cells.push(cell_text.trim().to_string());
            }
            if cells.iter().any(|c| !c.is_empty()) {
                rows.push(cells.join("\t"));
            }
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};
    use std::io::Cursor;

    fn pack(docx: Docx) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).expect("Failed to pack DOCX");
        buffer.into_inner()
    }

    #[test]
    fn test_paragraphs_become_lines() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("믿음의 길")))
                .add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text("첫째"))
                        .add_run(Run::new().add_text("기도하라.")),
                ),
        );

        let text = DocxExtractor::extract(&bytes).unwrap();
        assert_eq!(text, "믿음의 길\n첫째기도하라.");
    }

    #[test]
    fn test_table_cells_are_tab_separated() {
        let table = Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("본문"))),
            TableCell::new()
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("요 3:16"))),
        ])]);
        let bytes = pack(Docx::new().add_table(table));

        let text = DocxExtractor::extract(&bytes).unwrap();
        assert!(text.contains("본문\t요 3:16"));
    }

    #[test]
    fn test_empty_document_yields_empty_text() {
        let bytes = pack(Docx::new());
        let text = DocxExtractor::extract(&bytes).unwrap();
        assert!(text.trim().is_empty());
    }

    #[test]
    fn test_garbage_is_an_extraction_error() {
        let err = DocxExtractor::extract(b"not a zip archive").unwrap_err();
        assert!(matches!(err, SermonError::Extraction(_)));
    }
}
