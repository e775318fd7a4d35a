//! `leitor`: command-line shell for the accessible reader.
//!
//! Loads .env files, initialises logging, builds a `Reader` from
//! `LEITOR_*` settings and runs one action:
//!   - extract <FILE>   print the extracted text
//!   - speak <TEXT>     synthesize text (or --from FILE, or stdin) and play it
//!   - read <FILE>      extract, then speak the result
//!   - probe            report OCR engine, audio player and picker filter

use clap::{Parser, Subcommand};
use leitor_lib::extract::text::decode_bytes;
use leitor_lib::ocr::{LocalRecognizer, TesseractEngine};
use leitor_lib::speech::SystemPlayer;
use leitor_lib::{ReadAloud, Reader, Settings, SourceFile};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "leitor", version, about = "Transforme arquivos de texto em voz")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract text from a file (txt, pdf, docx, xlsx/xls, png/jpg/bmp)
    Extract {
        file: PathBuf,
        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert text to speech
    Speak {
        /// Text to speak; read from stdin when omitted
        text: Option<String>,
        /// Read the text from a file instead
        #[arg(long = "from", conflicts_with = "text")]
        from: Option<PathBuf>,
        /// Only write the MP3, do not start playback
        #[arg(long)]
        no_play: bool,
    },
    /// Extract text from a file and read it aloud
    Read {
        file: PathBuf,
        #[arg(long)]
        no_play: bool,
    },
    /// Show which engines and players are available
    Probe,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let loaded = leitor_lib::config::load_env_files(&cwd);

    env_logger::init();
    for path in &loaded {
        log::info!("[STARTUP] Loaded {}", path.display());
    }

    let cli = Cli::parse();
    let settings = Settings::from_env();
    let reader = match Reader::from_settings(settings) {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Extract { file, json } => extract(&reader, file, json).await,
        Command::Speak { text, from, no_play } => {
            let text = match speak_input(text, from).await {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            let outcome = reader.read_aloud(&text, !no_play).await;
            report_read_aloud(&outcome)
        }
        Command::Read { file, no_play } => {
            let opened = reader.open(&SourceFile::from_path(file)).await;
            println!("{}", opened.display);
            let text = match &opened.result {
                Ok(extraction) if !extraction.is_blank() => extraction.text.clone(),
                Ok(_) => return ExitCode::SUCCESS,
                Err(_) => return ExitCode::FAILURE,
            };
            let outcome = reader.read_aloud(&text, !no_play).await;
            report_read_aloud(&outcome)
        }
        Command::Probe => probe(&reader).await,
    }
}

async fn extract(reader: &Reader, file: PathBuf, json: bool) -> ExitCode {
    let opened = reader.open(&SourceFile::from_path(file)).await;
    if json {
        match serde_json::to_string_pretty(&opened) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Failed to serialize result: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", opened.display);
    }
    if opened.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn speak_input(text: Option<String>, from: Option<PathBuf>) -> Result<String, String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = from {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        return Ok(decode_bytes(&bytes));
    }
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .map_err(|e| format!("failed to read stdin: {}", e))?;
    Ok(decode_bytes(&buf))
}

fn report_read_aloud(outcome: &ReadAloud) -> ExitCode {
    if let Some(display) = outcome.display() {
        eprintln!("{}", display);
    }
    if let Some(path) = outcome.download_path() {
        println!("{}", path.display());
    }
    if let Some(warning) = outcome.warning() {
        eprintln!("{}", warning);
    }
    if outcome.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn probe(reader: &Reader) -> ExitCode {
    let settings = reader.settings();
    let tesseract = TesseractEngine::new(settings.ocr.tesseract.clone());
    let ocr_local = if settings.ocr.disabled {
        "disabled".to_string()
    } else if tesseract.is_available().await {
        "available".to_string()
    } else {
        "not found (hosted API only)".to_string()
    };

    println!("uploads dir:  {}", settings.uploads_dir.display());
    println!("OCR local:    {}", ocr_local);
    println!("OCR online:   {}", settings.ocr.api_url);
    println!("TTS:          {} (lang={})", settings.speech.tts_url, settings.speech.language);
    println!(
        "player:       {}",
        SystemPlayer::detect().unwrap_or("none (download only)")
    );
    println!("extensions:   {}", reader.allowed_extensions().join(", "));
    ExitCode::SUCCESS
}
