use async_trait::async_trait;
use cv_core::{ChartDetector, DetectionResult};

/// Stand-in used when no detection service is configured.
///
/// Every request fails, so the detection flow always shows the fallback.
pub struct OfflineDetector;

#[async_trait]
impl ChartDetector for OfflineDetector {
    async fn detect(&self, _image: &[u8]) -> anyhow::Result<DetectionResult> {
        anyhow::bail!("no chart detection service is configured")
    }

    fn name(&self) -> &str {
        "offline"
    }
}
