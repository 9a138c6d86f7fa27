use std::{
    io::Write,
    panic,
    path::{Path, PathBuf},
};

use docx_rs::{
    DocumentChild, InsertChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};
use tracing::{debug, info, warn};

use crate::ingest::{
    error::IngestError,
    models::{DocumentKind, DocumentMeta, IngestSource, IngestedDocument, SourceKind},
};

pub const MIN_TEXT_CHARS: usize = 50;
pub const MAX_ESTIMATED_QUESTIONS: usize = 50;

const SPARSE_PDF_CHARS: usize = 100;
const WORDS_PER_QUESTION: usize = 50;
const CHARS_PER_QUESTION: usize = 100;
const SPARSE_PDF_WARNING: &str =
    "Very little text was extracted, this may be a scanned/protected document";

#[derive(Debug, Clone)]
pub struct DocumentIngestor {
    max_file_bytes: u64,
    upload_dir: PathBuf,
}

struct Extracted {
    text: String,
    warning: Option<String>,
}

impl DocumentIngestor {
    pub fn new(max_file_bytes: u64, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            max_file_bytes,
            upload_dir: upload_dir.into(),
        }
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    pub fn ingest(&self, source: IngestSource) -> Result<IngestedDocument, IngestError> {
        match source {
            IngestSource::Pasted(text) => {
                ensure_long_enough(&text)?;
                let meta = derive_meta(&text, SourceKind::Paste, None, None);
                debug!("Ingested pasted text: {} characters", meta.length);

                Ok(IngestedDocument { text, meta })
            }
            IngestSource::Upload { file_name, bytes } => {
                let kind = DocumentKind::from_file_name(&file_name)?;
                self.check_size(&file_name, bytes.len() as u64)?;

                info!(
                    "Ingesting upload {} ({} bytes) as {}",
                    file_name,
                    bytes.len(),
                    kind
                );

                let extracted = self.extract_staged(kind, &bytes)?;
                ensure_long_enough(&extracted.text)?;

                let meta = derive_meta(
                    &extracted.text,
                    SourceKind::Upload,
                    Some(file_name),
                    extracted.warning,
                );

                Ok(IngestedDocument {
                    text: extracted.text,
                    meta,
                })
            }
        }
    }

    fn check_size(&self, file_name: &str, size: u64) -> Result<(), IngestError> {
        if size == 0 {
            return Err(IngestError::Validation(format!("File '{}' is empty", file_name)));
        }

        if size > self.max_file_bytes {
            return Err(IngestError::Validation(format!(
                "File '{}' is too large: {} bytes, maximum is {} MB",
                file_name,
                size,
                self.max_file_bytes / (1024 * 1024)
            )));
        }

        Ok(())
    }

    /// Stages the bytes in a temporary file which is removed when the guard drops,
    /// whichever way extraction ends.
    fn extract_staged(&self, kind: DocumentKind, bytes: &[u8]) -> Result<Extracted, IngestError> {
        let mut staged = tempfile::Builder::new()
            .prefix("quizgen-upload-")
            .suffix(&format!(".{}", kind.extension()))
            .tempfile_in(&self.upload_dir)?;

        staged.write_all(bytes)?;
        staged.flush()?;

        let extracted = match kind {
            DocumentKind::Pdf => extract_pdf(staged.path()),
            DocumentKind::Docx => extract_docx(staged.path()),
            DocumentKind::Text | DocumentKind::Markdown | DocumentKind::Json => {
                extract_plain(staged.path())
            }
        };

        if let Err(e) = staged.close() {
            warn!("Failed to remove staged upload: {}", e);
        }

        extracted
    }
}

fn extract_pdf(path: &Path) -> Result<Extracted, IngestError> {
    // The extractor panics on some malformed files instead of returning an error.
    let text = panic::catch_unwind(|| pdf_extract::extract_text(path))
        .map_err(|_| IngestError::Parse("PDF extractor aborted on a malformed file".into()))?
        .map_err(|e| IngestError::Parse(e.to_string()))?;

    let warning = match text.trim().chars().count() < SPARSE_PDF_CHARS {
        true => {
            warn!("Sparse PDF text extracted from {}", path.display());
            Some(SPARSE_PDF_WARNING.to_string())
        }
        false => None,
    };

    Ok(Extracted { text, warning })
}

fn extract_docx(path: &Path) -> Result<Extracted, IngestError> {
    let bytes = std::fs::read(path)?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| IngestError::Parse(e.to_string()))?;

    let mut text = String::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => {
                push_paragraph_text(paragraph, &mut text);
                text.push('\n');
            }
            DocumentChild::Table(table) => push_table_text(table, &mut text),
            _ => {}
        }
    }

    Ok(Extracted {
        text,
        warning: None,
    })
}

/// Runs, hyperlinks and tracked insertions. Tracked deletions are not part of the text.
fn push_paragraph_text(paragraph: &Paragraph, out: &mut String) {
    for child in &paragraph.children {
        match child {
            ParagraphChild::Run(run) => push_run_text(run, out),
            ParagraphChild::Hyperlink(hyperlink) => {
                for link_child in &hyperlink.children {
                    if let ParagraphChild::Run(run) = link_child {
                        push_run_text(run, out);
                    }
                }
            }
            ParagraphChild::Insert(insert) => {
                for insert_child in &insert.children {
                    if let InsertChild::Run(run) = insert_child {
                        push_run_text(run, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run_text(run: &Run, out: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(run_text) => out.push_str(&run_text.text),
            RunChild::Tab(_) => out.push('\t'),
            _ => {}
        }
    }
}

// One line per row, cells separated by tabs.
fn push_table_text(table: &Table, out: &mut String) {
    for table_child in &table.rows {
        let TableChild::TableRow(row) = table_child;

        let mut cells = Vec::new();
        for row_child in &row.cells {
            let TableRowChild::TableCell(cell) = row_child;

            let mut cell_text = String::new();
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => {
                        if !cell_text.is_empty() {
                            cell_text.push(' ');
                        }
                        push_paragraph_text(paragraph, &mut cell_text);
                    }
                    TableCellContent::Table(nested) => push_table_text(nested, &mut cell_text),
                    _ => {}
                }
            }
            cells.push(cell_text.trim().to_string());
        }

        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
}

fn extract_plain(path: &Path) -> Result<Extracted, IngestError> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| IngestError::Parse(format!("File is not valid UTF-8: {}", e)))?;

    Ok(Extracted {
        text,
        warning: None,
    })
}

fn ensure_long_enough(text: &str) -> Result<(), IngestError> {
    let length = text.trim().chars().count();
    if length < MIN_TEXT_CHARS {
        return Err(IngestError::TooShort {
            length,
            minimum: MIN_TEXT_CHARS,
        });
    }

    Ok(())
}

pub fn derive_meta(
    text: &str,
    source: SourceKind,
    file_name: Option<String>,
    warning: Option<String>,
) -> DocumentMeta {
    let length = text.chars().count();
    let word_count = text.split_whitespace().count();

    // Uploads and pasted text use different heuristics.
    let estimated_questions = match source {
        SourceKind::Upload => (word_count / WORDS_PER_QUESTION).min(MAX_ESTIMATED_QUESTIONS),
        SourceKind::Paste => length / CHARS_PER_QUESTION,
    };

    DocumentMeta {
        length,
        word_count,
        estimated_questions,
        source,
        file_name,
        warning,
    }
}
