//! Contract for the external chart-image detection service
//!
//! The chart engine never calls this. It is used by the image detection flow,
//! which must always end up with a displayable result: any failure of the
//! service degrades to [`DetectionResult::fallback`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Largest image payload forwarded to a detector
pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// Answer of a detection service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub chart_type: String,
    /// 0 to 100
    pub confidence: u8,
    pub explanation: String,
    pub r_code: String,
    pub python_code: String,
}

impl DetectionResult {
    /// Static payload shown when the service cannot answer
    pub fn fallback() -> Self {
        Self {
            chart_type: "Unknown".to_string(),
            confidence: 0,
            explanation: "Chart detection is unavailable right now. Upload the underlying CSV to explore it with the chart gallery instead.".to_string(),
            r_code: "# Detection unavailable\nlibrary(ggplot2)\n".to_string(),
            python_code: "# Detection unavailable\nimport matplotlib.pyplot as plt\n".to_string(),
        }
    }
}

/// A service able to classify a chart image
#[async_trait]
pub trait ChartDetector: Send + Sync {
    /// Classify the image bytes
    async fn detect(&self, image: &[u8]) -> anyhow::Result<DetectionResult>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Run a detector, never failing
pub async fn detect_or_fallback(detector: &dyn ChartDetector, image: &[u8]) -> DetectionResult {
    if image.len() > MAX_IMAGE_BYTES {
        tracing::warn!(
            "Image of {} bytes exceeds the {} byte limit, skipping {}",
            image.len(),
            MAX_IMAGE_BYTES,
            detector.name()
        );
        return DetectionResult::fallback();
    }

    match detector.detect(image).await {
        Ok(mut result) => {
            result.confidence = result.confidence.min(100);
            tracing::info!(
                "{} detected '{}' with confidence {}",
                detector.name(),
                result.chart_type,
                result.confidence
            );
            result
        }
        Err(e) => {
            tracing::warn!("{} failed, using fallback: {:#}", detector.name(), e);
            DetectionResult::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDetector(u8);

    #[async_trait]
    impl ChartDetector for FixedDetector {
        async fn detect(&self, _image: &[u8]) -> anyhow::Result<DetectionResult> {
            Ok(DetectionResult {
                chart_type: "Histogram".to_string(),
                confidence: self.0,
                explanation: "Adjacent bars over a numeric axis".to_string(),
                r_code: String::new(),
                python_code: String::new(),
            })
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct BrokenDetector;

    #[async_trait]
    impl ChartDetector for BrokenDetector {
        async fn detect(&self, _image: &[u8]) -> anyhow::Result<DetectionResult> {
            anyhow::bail!("connection refused")
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let result = detect_or_fallback(&FixedDetector(87), b"png").await;
        assert_eq!(result.chart_type, "Histogram");
        assert_eq!(result.confidence, 87);
    }

    #[tokio::test]
    async fn test_confidence_is_clamped() {
        let result = detect_or_fallback(&FixedDetector(250), b"png").await;
        assert_eq!(result.confidence, 100);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_fallback() {
        let result = detect_or_fallback(&BrokenDetector, b"png").await;
        assert_eq!(result, DetectionResult::fallback());
    }

    #[tokio::test]
    async fn test_oversized_payload_is_not_sent() {
        let image = vec![0u8; MAX_IMAGE_BYTES + 1];
        let result = detect_or_fallback(&FixedDetector(90), &image).await;
        assert_eq!(result, DetectionResult::fallback());
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(DetectionResult::fallback()).unwrap();
        assert!(json.get("chartType").is_some());
        assert!(json.get("pythonCode").is_some());
    }
}
