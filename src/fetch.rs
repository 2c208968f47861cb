use std::time::Duration;

use crate::config::Config;
use crate::error::PipelineError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Status plus body from one fetch. Both the JSON API and the listing
/// pages return UTF-8 text.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Opaque pagination position. Each fetcher maps it onto its own
/// addressing scheme: item offset for the API, 1-based page for HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub index: usize,
}

impl PageCursor {
    pub fn start() -> Self {
        Self { index: 0 }
    }

    pub fn advance(self) -> Self {
        Self { index: self.index + 1 }
    }
}

/// One HTTP request per page. Non-success status counts as a transport
/// failure.
pub trait PageFetch {
    async fn fetch(&self, cursor: &PageCursor) -> Result<RawResponse, PipelineError>;
}

/// Fetcher for the search JSON API (`category`/`from`/`limit` query).
pub struct ApiFetcher {
    client: reqwest::Client,
    endpoint: String,
    category: u32,
    page_size: usize,
}

impl ApiFetcher {
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        Ok(Self {
            client: build_client()?,
            endpoint: config.api_endpoint.clone(),
            category: config.category,
            page_size: config.page_size,
        })
    }
}

impl PageFetch for ApiFetcher {
    async fn fetch(&self, cursor: &PageCursor) -> Result<RawResponse, PipelineError> {
        let offset = cursor.index * self.page_size;
        let res = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("category", self.category.to_string()),
                ("from", offset.to_string()),
                ("include", "extra_images,body".to_string()),
                ("limit", self.page_size.to_string()),
                ("type", "sell".to_string()),
            ])
            .send()
            .await?;
        into_raw(res).await
    }
}

/// Fetcher for the rendered listing pages (`?o=<page>`).
pub struct HtmlFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HtmlFetcher {
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        Ok(Self {
            client: build_client()?,
            base_url: config.html_base_url.clone(),
        })
    }
}

impl PageFetch for HtmlFetcher {
    async fn fetch(&self, cursor: &PageCursor) -> Result<RawResponse, PipelineError> {
        let url = format!("{}?o={}", self.base_url, cursor.index + 1);
        let res = self.client.get(&url).send().await?;
        into_raw(res).await
    }
}

fn build_client() -> Result<reqwest::Client, PipelineError> {
    Ok(reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

async fn into_raw(res: reqwest::Response) -> Result<RawResponse, PipelineError> {
    let status = res.status();
    if !status.is_success() {
        return Err(PipelineError::Transport(format!(
            "GET {} returned {}",
            res.url(),
            status
        )));
    }
    let body = res.text().await?;
    Ok(RawResponse {
        status: status.as_u16(),
        body,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_advances_by_one() {
        let c = PageCursor::start();
        assert_eq!(c.index, 0);
        assert_eq!(c.advance().index, 1);
        assert_eq!(c.advance().advance().index, 2);
    }
}
