//! Integration tests for opening files through `Reader`.
//!
//! Covers the three ways a file arrives (picker bytes, picker path, completed
//! upload) and the per-format text shapes the text area receives.

use leitor_lib::extract::{DocumentKind, NO_TEXT_FOUND};
use leitor_lib::speech::{AudioPlayer, SpeechEngine, Synthesizer};
use leitor_lib::{Extractor, ReaderError, Reader, Settings, SourceFile};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

struct SilentEngine;

#[async_trait::async_trait]
impl SpeechEngine for SilentEngine {
    async fn synthesize(&self, _text: &str, _language: &str) -> Result<Vec<u8>, String> {
        Ok(b"ID3".to_vec())
    }
}

struct NoPlayer;

#[async_trait::async_trait]
impl AudioPlayer for NoPlayer {
    async fn play(&self, _path: &Path) -> Result<(), String> {
        Err("no device".into())
    }
}

fn reader_in(dir: &Path) -> Reader {
    let settings = Settings {
        uploads_dir: dir.to_path_buf(),
        ..Settings::default()
    };
    let synthesizer = Synthesizer::new(dir, "pt", Box::new(SilentEngine));
    Reader::new(settings, Extractor::without_ocr(), synthesizer, Box::new(NoPlayer))
}

fn pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[tokio::test]
async fn utf8_text_round_trips_from_bytes_and_path() {
    let dir = tempfile::tempdir().unwrap();
    let reader = reader_in(dir.path());
    let content = "Olá, mundo!\nSegunda linha com acentuação: ção, ê, ü.\n";

    let from_bytes = reader
        .open_pick("notas.txt", None, Some(content.as_bytes().to_vec()))
        .await;
    assert_eq!(from_bytes.result.as_ref().unwrap().text, content);
    assert_eq!(from_bytes.display, content);

    let path = dir.path().join("notas.txt");
    std::fs::write(&path, content).unwrap();
    let from_path = reader.open(&SourceFile::from_path(&path)).await;
    assert_eq!(from_path.result.unwrap().text, content);
}

#[tokio::test]
async fn latin1_bytes_are_decoded() {
    let dir = tempfile::tempdir().unwrap();
    let reader = reader_in(dir.path());

    // "ação" in ISO-8859-1
    let opened = reader
        .open_pick("antigo.TXT", None, Some(vec![0x61, 0xE7, 0xE3, 0x6F]))
        .await;
    assert_eq!(opened.result.unwrap().text, "ação");
}

#[tokio::test]
async fn empty_text_file_shows_no_text_message() {
    let dir = tempfile::tempdir().unwrap();
    let reader = reader_in(dir.path());

    let opened = reader.open_pick("vazio.txt", None, Some(Vec::new())).await;
    assert!(!opened.is_error());
    assert!(opened.result.as_ref().unwrap().is_blank());
    assert_eq!(opened.display, NO_TEXT_FOUND);
}

#[tokio::test]
async fn pdf_yields_one_segment_per_page() {
    let dir = tempfile::tempdir().unwrap();
    let reader = reader_in(dir.path());

    let bytes = pdf(&["Capitulo um", "Capitulo dois", "Capitulo tres"]);
    let opened = reader.open_pick("livro.pdf", None, Some(bytes)).await;
    let extraction = opened.result.unwrap();

    assert_eq!(extraction.kind, DocumentKind::Pdf);
    let segments: Vec<&str> = extraction.text.split_terminator('\n').collect();
    assert_eq!(segments.len(), 3, "got {:?}", extraction.text);
    assert!(segments[0].contains("Capitulo um"));
    assert!(segments[2].contains("Capitulo tres"));
}

#[tokio::test]
async fn docx_upload_is_read_from_uploads_dir() {
    let dir = tempfile::tempdir().unwrap();
    let reader = reader_in(dir.path());

    let docx = docx_rs::Docx::new()
        .add_paragraph(docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("Ata da reunião")))
        .add_paragraph(docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("Presentes: 4")));
    let mut cursor = std::io::Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).unwrap();
    std::fs::write(dir.path().join("ata.docx"), cursor.into_inner()).unwrap();

    let opened = reader.open_upload("ata.docx").await;
    assert_eq!(opened.result.unwrap().text, "Ata da reunião\nPresentes: 4\n");
}

#[tokio::test]
async fn missing_upload_is_an_error_display() {
    let dir = tempfile::tempdir().unwrap();
    let reader = reader_in(dir.path());

    let opened = reader.open_upload("sumiu.pdf").await;
    assert!(opened.is_error());
    assert!(opened.display.starts_with("Erro ao processar arquivo:"), "{}", opened.display);
}

#[tokio::test]
async fn pick_without_path_or_bytes_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let reader = reader_in(dir.path());

    let opened = reader.open_pick("nada.txt", None, None).await;
    assert!(matches!(opened.result, Err(ReaderError::UnsupportedOrUnreadable(_))));
}

#[tokio::test]
async fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let reader = reader_in(dir.path());

    let opened = reader.open_pick("musica.mp3", None, Some(b"ID3".to_vec())).await;
    assert!(matches!(opened.result, Err(ReaderError::UnsupportedOrUnreadable(_))));
    assert!(opened.display.contains("musica.mp3"));
}

#[tokio::test]
async fn images_are_refused_without_ocr() {
    let dir = tempfile::tempdir().unwrap();
    let reader = reader_in(dir.path());

    assert!(!reader.allowed_extensions().contains(&"png"));
    let opened = reader
        .open_pick("foto.png", None, Some(b"\x89PNG\r\n\x1a\n".to_vec()))
        .await;
    assert!(opened.is_error());
}

#[tokio::test]
async fn xlsx_workbook_renders_as_table() {
    let dir = tempfile::tempdir().unwrap();
    let reader = reader_in(dir.path());

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Nome").unwrap();
    sheet.write_string(0, 1, "Idade").unwrap();
    sheet.write_string(1, 0, "Ana").unwrap();
    sheet.write_number(1, 1, 31).unwrap();
    sheet.write_string(2, 0, "Bruno").unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let opened = reader.open_pick("planilha.xlsx", None, Some(bytes)).await;
    let extraction = opened.result.unwrap();
    assert_eq!(extraction.kind, DocumentKind::Spreadsheet);
    assert_eq!(extraction.text, " Nome Idade\n  Ana    31\nBruno   NaN");
}

#[tokio::test]
async fn upload_names_are_confined_to_uploads_dir() {
    let root = tempfile::tempdir().unwrap();
    let uploads = root.path().join("uploads");
    std::fs::create_dir(&uploads).unwrap();
    std::fs::write(root.path().join("segredo.txt"), "fora do diretório").unwrap();
    let reader = reader_in(&uploads);

    let opened = reader.open_upload("../segredo.txt").await;
    assert!(matches!(opened.result, Err(ReaderError::UnsupportedOrUnreadable(_))));
    assert!(!opened.display.contains("fora do diretório"));
}
