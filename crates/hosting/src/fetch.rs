use crate::HostError;
use bytes::Bytes;
use mdimg_config::DownloadSettings;
use std::time::Duration;

/// Responses smaller than this must carry an image content type
const MIN_UNTYPED_IMAGE_SIZE: usize = 1000;

/// A downloaded remote image
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub data: Bytes,
    pub content_type: Option<String>,
}

impl FetchedImage {
    /// File extension implied by the content type, `jpg` when unknown
    pub fn extension(&self) -> String {
        let mime = self
            .content_type
            .as_deref()
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase());

        match mime.as_deref() {
            Some("image/jpeg") | Some("image/jpg") | None => "jpg".to_string(),
            Some("image/png") => "png".to_string(),
            Some("image/gif") => "gif".to_string(),
            Some("image/webp") => "webp".to_string(),
            Some("image/svg+xml") => "svg".to_string(),
            Some("image/bmp") => "bmp".to_string(),
            Some(other) => mime_guess::get_mime_extensions_str(other)
                .and_then(|extensions| extensions.first())
                .map(|ext| ext.to_string())
                .unwrap_or_else(|| "jpg".to_string()),
        }
    }

    fn is_image_type(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|value| value.trim().to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false)
    }
}

/// HTTP client for pulling remote images back to local storage
#[derive(Debug, Clone)]
pub struct RemoteFetcher {
    client: reqwest::Client,
}

impl RemoteFetcher {
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, HostError> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent.to_string());
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        Ok(Self { client: builder.build()? })
    }

    pub fn from_settings(settings: &DownloadSettings) -> Result<Self, HostError> {
        Self::new(settings.timeout_secs, &settings.user_agent)
    }

    /// GETs `url`. Non-2xx statuses and small non-image bodies are errors.
    pub async fn fetch(&self, url: &str) -> Result<FetchedImage, HostError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HostError::HttpError(format!("HTTP {} for {}", status, url)));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let data = response.bytes().await?;
        let image = FetchedImage { data, content_type };

        if !image.is_image_type() && image.data.len() <= MIN_UNTYPED_IMAGE_SIZE {
            return Err(HostError::InvalidContent(format!(
                "{} ({} bytes, content type {})",
                url,
                image.data.len(),
                image.content_type.as_deref().unwrap_or("none")
            )));
        }

        tracing::debug!("Fetched {} ({} bytes)", url, image.data.len());
        Ok(image)
    }

    /// Sends a HEAD request, following redirects, and returns the final
    /// status. Only transport failures are errors.
    pub async fn check(&self, url: &str) -> Result<u16, HostError> {
        let response = self.client.head(url).send().await?;
        Ok(response.status().as_u16())
    }
}

/// File name carried by the last path segment of `url`, if it has an
/// extension and is a plain name once decoded.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let name = urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    if name.contains('/') || name.contains('\\') || name.starts_with('.') {
        return None;
    }

    let (stem, extension) = name.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }

    Some(name)
}
