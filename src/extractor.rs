use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

use crate::config::Config;
use crate::extractors::extractous_extractor::ExtractousExtractor;

/// Text produced by an [`Extractor`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionOutput {
    pub content: String,
}

/// Capability that turns raw document bytes into plain text
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extracts text content from an in-memory document
    ///
    /// # Arguments
    /// * `bytes` - Raw file payload as uploaded
    /// * `mime_type` - MIME type resolved from the upload's filename
    ///
    /// # Returns
    /// * `Ok(ExtractionOutput)` - Extracted text
    /// * `Err` - Error if the document cannot be parsed
    async fn extract(&self, bytes: Bytes, mime_type: &str) -> Result<ExtractionOutput>;

    /// Returns the name of this extractor (e.g., "ExtractousExtractor")
    fn extractor_type(&self) -> &'static str;
}

/// Creates the production extractor for the given configuration
pub fn create_extractor(config: &Config) -> Arc<dyn Extractor> {
    Arc::new(ExtractousExtractor::new(config.ocr_language.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_extractor_uses_extractous() {
        let extractor = create_extractor(&Config::default());
        assert_eq!(
            extractor.extractor_type(),
            "ExtractousExtractor",
            "Factory should return ExtractousExtractor"
        );
    }

    #[test]
    fn test_extraction_output_serializes_content() {
        let output = ExtractionOutput {
            content: "hello".to_string(),
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json, serde_json::json!({ "content": "hello" }));
    }
}
