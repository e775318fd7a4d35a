//! DOCX text: body paragraphs, one per line.

use crate::error::ReaderError;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};

pub fn extract_docx(bytes: &[u8]) -> Result<String, ReaderError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ReaderError::parse("DOCX", format!("{:?}", e)))?;

    let mut out = String::with_capacity(4096);
    let mut paragraphs = 0usize;
    for node in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = node {
            push_paragraph(&mut out, &paragraph.children);
            out.push('\n');
            paragraphs += 1;
        }
    }

    log::info!("[EXTRACT] DOCX: {} paragraphs, {} chars", paragraphs, out.len());
    Ok(out)
}

fn push_paragraph(out: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for item in &run.children {
                    match item {
                        RunChild::Text(text) => out.push_str(&text.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => (),
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph(out, &link.children),
            _ => (),
        }
    }
}
