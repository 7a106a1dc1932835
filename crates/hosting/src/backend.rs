use crate::HostError;
use std::path::Path;

/// Image hosting abstraction used by the upload orchestrator
#[async_trait::async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload the file at `image_path`, returns its hosted URL
    async fn upload(&self, image_path: &Path) -> Result<String, HostError>;

    /// Short label for logs
    fn name(&self) -> &str;
}
