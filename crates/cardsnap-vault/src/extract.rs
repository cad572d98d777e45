//! Card extraction collaborator
//!
//! The OCR/extraction service is external to the core: the vault hands it
//! image bytes and gets structured [`CardFields`] back, or a retryable
//! error. A failed extraction never creates an Item and never touches
//! session state.

use async_trait::async_trait;
use thiserror::Error;

use cardsnap_core::CardFields;

/// Why an extraction attempt produced no usable fields
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The service could not be reached
    #[error("Extraction service unreachable: {0}")]
    Unreachable(String),

    /// Missing or invalid service configuration (e.g. no API key)
    #[error("Extraction service misconfigured: {0}")]
    Misconfigured(String),

    /// The service answered, but not with parseable card fields
    #[error("Unparseable extraction output: {0}")]
    Unparseable(String),
}

/// Trait for card-image extraction backends
#[async_trait]
pub trait CardExtractor: Send + Sync {
    /// Extract structured fields from a scanned card image
    async fn extract(&self, image: &[u8]) -> Result<CardFields, ExtractionError>;
}

/// Extractor returning a fixed response, for demos and tests
pub struct StaticExtractor {
    fields: Option<CardFields>,
}

impl StaticExtractor {
    /// Always yield the given fields
    pub fn with_fields(fields: CardFields) -> Self {
        Self {
            fields: Some(fields),
        }
    }

    /// Always fail as unreachable
    pub fn failing() -> Self {
        Self { fields: None }
    }
}

#[async_trait]
impl CardExtractor for StaticExtractor {
    async fn extract(&self, image: &[u8]) -> Result<CardFields, ExtractionError> {
        if image.is_empty() {
            return Err(ExtractionError::Unparseable("empty image".to_string()));
        }
        self.fields
            .clone()
            .ok_or_else(|| ExtractionError::Unreachable("no backend configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardsnap_core::CardCategory;

    fn sample_fields() -> CardFields {
        CardFields {
            issuer: "Visa".to_string(),
            category: CardCategory::Banking,
            number: "4242 4242 4242 4242".to_string(),
            holder_name: "Alex Johnson".to_string(),
            expiry_date: Some("12/28".to_string()),
            cvv: None,
            job_title: None,
            email: None,
            phone: None,
            dob: None,
            nationality: None,
        }
    }

    #[tokio::test]
    async fn test_static_extractor_returns_fields() {
        let extractor = StaticExtractor::with_fields(sample_fields());
        let fields = extractor.extract(b"jpeg bytes").await.unwrap();
        assert_eq!(fields.issuer, "Visa");
    }

    #[tokio::test]
    async fn test_failing_extractor() {
        let extractor = StaticExtractor::failing();
        let err = extractor.extract(b"jpeg bytes").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_empty_image_is_unparseable() {
        let extractor = StaticExtractor::with_fields(sample_fields());
        let err = extractor.extract(b"").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Unparseable(_)));
    }

    #[test]
    fn test_fields_parse_from_service_json() {
        // Wire shape used by the extraction service
        let json = r#"{
            "issuer": "California DMV",
            "type": "Driver License",
            "number": "D98765432",
            "holderName": "Alex Johnson",
            "expiryDate": "10/25",
            "dob": "15/05/1990"
        }"#;
        let fields: CardFields = serde_json::from_str(json).unwrap();
        assert_eq!(fields.category, CardCategory::DriverLicense);
        assert_eq!(fields.dob.as_deref(), Some("15/05/1990"));
    }
}
