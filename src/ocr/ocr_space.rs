//! Hosted tier: OCR.space `parse/image` API.
//!
//! Request: urlencoded form with a data-URL image, API key in the `apikey`
//! header. Response fields of interest:
//! - `IsErroredOnProcessing`: true when the service rejected the image
//! - `ErrorMessage`: a string or a list of strings
//! - `ParsedResults[0].ParsedText`: the recognised text

use super::HostedRecognizer;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::Value;

/// Engine 2 handles rotated photos and mixed Latin scripts better than 1.
const OCR_ENGINE: &str = "2";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrSpaceResponse {
    #[serde(default)]
    is_errored_on_processing: bool,
    #[serde(default)]
    error_message: Option<Value>,
    #[serde(default)]
    parsed_results: Option<Vec<ParsedResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    #[serde(default)]
    parsed_text: String,
}

pub struct OcrSpaceClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    language: String,
}

impl OcrSpaceClient {
    pub fn new(client: reqwest::Client, url: &str, api_key: &str, language: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
            api_key: api_key.to_string(),
            language: language.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl HostedRecognizer for OcrSpaceClient {
    async fn recognize(&self, image: &[u8]) -> Result<String, String> {
        let form = build_form(image, &self.language);

        let response = self
            .client
            .post(&self.url)
            .header("apikey", &self.api_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    "OCR.space request timed out".to_string()
                } else {
                    format!("OCR.space request failed: {}", e)
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("OCR.space response unreadable: {}", e))?;
        if !status.is_success() {
            return Err(format!("OCR.space returned {}: {}", status, body.trim()));
        }

        parse_response(&body)
    }
}

/// Mime type for the data-URL prefix, sniffed from the image header.
pub fn image_mime(image: &[u8]) -> &'static str {
    image::guess_format(image)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// Form fields for one recognition request.
pub fn build_form(image: &[u8], language: &str) -> Vec<(&'static str, String)> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(image);
    vec![
        ("base64Image", format!("data:{};base64,{}", image_mime(image), encoded)),
        ("language", language.to_string()),
        ("isOverlayRequired", "false".to_string()),
        ("detectOrientation", "true".to_string()),
        ("scale", "true".to_string()),
        ("OCREngine", OCR_ENGINE.to_string()),
    ]
}

/// Extract the first parsed text, or the service's reason for failing.
pub fn parse_response(body: &str) -> Result<String, String> {
    let parsed: OcrSpaceResponse = serde_json::from_str(body)
        .map_err(|e| format!("unexpected OCR.space response ({}): {}", e, truncate(body, 200)))?;

    if parsed.is_errored_on_processing {
        let reason = parsed
            .error_message
            .as_ref()
            .map(error_text)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(format!("OCR.space could not process the image: {}", reason));
    }

    parsed
        .parsed_results
        .and_then(|results| results.into_iter().next())
        .map(|r| r.parsed_text)
        .ok_or_else(|| "OCR.space returned no parsed results".to_string())
}

fn error_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
