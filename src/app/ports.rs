use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

// Fetch-side port. Transport failures surface as `Err`, statuses are left to the caller.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;

    /// GETs `url` as text, treating any status other than 200 as fatal.
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let resp = self.get(url).await?;
        if !resp.is_success() {
            debug!("url {} returned non-200 status {}", url, resp.status);
            return Err(ScraperError::Status {
                url: url.to_string(),
                status: resp.status,
            });
        }
        Ok(resp.text())
    }

    /// GETs `url` as text, mapping a non-200 status to `None`.
    async fn fetch_optional_text(&self, url: &str) -> Result<Option<String>> {
        let resp = self.get(url).await?;
        if !resp.is_success() {
            debug!("url {} returned non-200 status {}, skipping", url, resp.status);
            return Ok(None);
        }
        Ok(Some(resp.text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedStatus(u16);

    #[async_trait]
    impl HttpClientPort for FixedStatus {
        async fn get(&self, _url: &str) -> Result<HttpGetResult> {
            Ok(HttpGetResult {
                status: self.0,
                bytes: b"<html></html>".to_vec(),
            })
        }
    }

    #[tokio::test]
    async fn test_fetch_text_rejects_non_200() {
        let err = FixedStatus(404).fetch_text("http://example.org/a").await.unwrap_err();
        assert!(matches!(err, ScraperError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_optional_text_skips_non_200() {
        assert_eq!(FixedStatus(500).fetch_optional_text("http://x").await.unwrap(), None);
        assert_eq!(
            FixedStatus(200).fetch_optional_text("http://x").await.unwrap().as_deref(),
            Some("<html></html>")
        );
    }
}
