//! PDF text: lopdf, one segment per page.

use crate::error::ReaderError;
use lopdf::Document;

/// Concatenate every page's text in page order, each followed by `\n`.
///
/// A page whose text cannot be decoded contributes an empty segment, so an
/// N-page document always yields N segments. Line breaks inside a page are
/// joined with spaces for the same reason; the page's own line layout is
/// not preserved.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ReaderError> {
    let document = Document::load_mem(bytes).map_err(|e| ReaderError::parse("PDF", e))?;
    let pages = document.get_pages();

    let mut out = String::new();
    for page_number in pages.keys() {
        let page_text = match document.extract_text(&[*page_number]) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("[EXTRACT] PDF page {} has no extractable text: {}", page_number, e);
                String::new()
            }
        };
        // Flatten page-internal line breaks so segments stay one per page.
        let flattened: Vec<&str> = page_text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect();
        out.push_str(&flattened.join(" "));
        out.push('\n');
    }

    log::info!("[EXTRACT] PDF: {} pages, {} chars", pages.len(), out.len());
    Ok(out)
}


#[cfg(test)]
mod tests {
    use super::fixtures::pdf_with_pages;
    use super::*;

    #[test]
    fn one_segment_per_page_including_blank_pages() {
        let bytes = pdf_with_pages(&[Some("Primeira pagina"), None, Some("Terceira pagina")]);
        let text = extract_pdf(&bytes).unwrap();

        assert!(text.ends_with('\n'));
        let segments: Vec<&str> = text.split_terminator('\n').collect();
        assert_eq!(segments.len(), 3, "got {:?}", text);
        assert!(segments[0].contains("Primeira"));
        assert_eq!(segments[1], "");
        assert!(segments[2].contains("Terceira"));
    }

    #[test]
    fn garbage_is_a_parse_failure() {
        let err = extract_pdf(b"%PDF-1.4 but not really").unwrap_err();
        assert!(matches!(err, ReaderError::ParseFailure { format: "PDF", .. }));
    }
}
