use std::io::Read;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use extractous::TesseractOcrConfig;

use crate::constants::IMAGE_MIME;
use crate::extractor::{ExtractionOutput, Extractor};

/// Document extractor backed by the extractous crate
///
/// Extractous sniffs the real format from the payload itself; the MIME type
/// only decides whether OCR should be configured.
pub struct ExtractousExtractor {
    ocr_language: String,
}

impl ExtractousExtractor {
    pub fn new(ocr_language: impl Into<String>) -> Self {
        ExtractousExtractor {
            ocr_language: ocr_language.into(),
        }
    }

    fn build(&self, mime_type: &str) -> extractous::Extractor {
        let extractor = extractous::Extractor::new();
        if mime_type == IMAGE_MIME {
            extractor.set_ocr_config(TesseractOcrConfig::new().set_language(&self.ocr_language))
        } else {
            extractor
        }
    }
}

#[async_trait]
impl Extractor for ExtractousExtractor {
    fn extractor_type(&self) -> &'static str {
        "ExtractousExtractor"
    }

    async fn extract(&self, bytes: Bytes, mime_type: &str) -> Result<ExtractionOutput> {
        let extractor = self.build(mime_type);

        // The parser call blocks on the embedded Tika runtime
        let content = tokio::task::spawn_blocking(move || -> Result<String> {
            let (mut reader, _metadata) = extractor
                .extract_bytes(&bytes)
                .context("Failed to extract text from document")?;

            let mut text = String::new();
            reader
                .read_to_string(&mut text)
                .context("Failed to read extracted text")?;

            Ok(text)
        })
        .await
        .context("Extraction task panicked")??;

        Ok(ExtractionOutput { content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_extract_text_from_plain_text() {
        let extractor = ExtractousExtractor::new("eng");
        let bytes = Bytes::from_static(b"Quarterly report\nRevenue grew in every region.\n");

        let result = extractor.extract(bytes, "text/plain").await;
        assert!(result.is_ok(), "Failed to extract text: {:?}", result.err());

        let text = result.unwrap().content;
        assert!(text.contains("Quarterly report"), "Should contain the title. Got: {}", text);
        assert!(text.contains("Revenue grew"), "Should contain the body. Got: {}", text);
    }
}
