//! Pieces of the analysis exchange shared by the browser and the server.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

pub const ANALYSIS_FALLBACK_TEXT: &str = "Unable to generate analysis.";
pub const ANALYSIS_FAILED_ALERT: &str = "Analysis failed. Ensure Gemini API key is active.";
pub const ANALYSIS_FAILED_BODY: &str = "Analysis failed";

/// Falls back to [`ANALYSIS_FALLBACK_TEXT`] when the service answered with
/// nothing readable.
pub fn text_or_fallback(text: &str) -> String {
    if text.trim().is_empty() {
        ANALYSIS_FALLBACK_TEXT.to_string()
    } else {
        text.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportBlock {
    Heading(String),
    Paragraph(String),
    Break,
}

/// Splits the markdown-ish answer into displayable blocks, one per line.
pub fn parse_report(text: &str) -> Vec<ReportBlock> {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                ReportBlock::Break
            } else if line.starts_with('#') {
                ReportBlock::Heading(line.trim_start_matches('#').trim_start().to_string())
            } else {
                ReportBlock::Paragraph(line.to_string())
            }
        })
        .collect()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUriError {
    #[error("missing data: prefix")]
    MissingScheme,
    #[error("missing ;base64, marker")]
    NotBase64,
    #[error("empty payload")]
    EmptyPayload,
    #[error("invalid base64 payload: {0}")]
    Decode(String),
}

/// A borrowed view of a `data:<mime>;base64,<payload>` URI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime: &'a str,
    pub payload: &'a str,
}

impl<'a> DataUri<'a> {
    pub fn parse(value: &'a str) -> Result<Self, DataUriError> {
        let rest = value.strip_prefix("data:").ok_or(DataUriError::MissingScheme)?;
        let (mime, payload) = rest.split_once(";base64,").ok_or(DataUriError::NotBase64)?;
        if payload.is_empty() {
            return Err(DataUriError::EmptyPayload);
        }
        Ok(Self { mime, payload })
    }

    pub fn decode_payload(&self) -> Result<Vec<u8>, DataUriError> {
        STANDARD
            .decode(self.payload.trim())
            .map_err(|e| DataUriError::Decode(e.to_string()))
    }
}
