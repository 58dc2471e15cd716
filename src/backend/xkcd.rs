use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

use crate::config::Config;
use crate::error::PagerError;

pub const XKCD_SITE: &str = "https://xkcd.com";

/// One comic as returned by the comic service. Other fields in the payload
/// (`year`, `transcript`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComicRecord {
    pub num: u32,
    pub title: String,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub alt: String,
}

/// Where comic metadata and image bytes come from.
pub trait ComicSource {
    fn fetch_comic(&self, num: i64) -> impl Future<Output = Result<ComicRecord, PagerError>> + Send;

    fn fetch_image(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, PagerError>> + Send;
}

pub struct XkcdClient {
    client: reqwest::Client,
    api_base: String,
}

impl XkcdClient {
    pub fn new(config: &Config) -> Result<Self, PagerError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn comic_url(&self, num: i64) -> String {
        format!("{}/?comic={}", self.api_base, num)
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, PagerError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PagerError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl ComicSource for XkcdClient {
    async fn fetch_comic(&self, num: i64) -> Result<ComicRecord, PagerError> {
        let url = self.comic_url(num);
        let record = self.get(&url).await?.json::<ComicRecord>().await?;
        Ok(record)
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, PagerError> {
        let bytes = self.get(url).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Link to the comic's own page on xkcd.com.
pub fn comic_page_url(num: i64) -> String {
    format!("{}/{}/", XKCD_SITE, num)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_ignores_extra_fields() {
        let payload = r#"{
            "month": "1", "num": 614, "link": "", "year": "2009", "news": "",
            "safe_title": "Woodpecker", "transcript": "...",
            "alt": "If you don't have an extension cord I can get that too.",
            "img": "https://imgs.xkcd.com/comics/woodpecker.png",
            "title": "Woodpecker", "day": "24"
        }"#;

        let record: ComicRecord = serde_json::from_str(payload).unwrap();
        assert_eq!(record.num, 614);
        assert_eq!(record.title, "Woodpecker");
        assert_eq!(record.img, "https://imgs.xkcd.com/comics/woodpecker.png");
        assert!(record.alt.starts_with("If you don't"));
    }

    #[test]
    fn test_record_without_image_still_parses() {
        let record: ComicRecord =
            serde_json::from_str(r#"{"num": 1608, "title": "Hoverboard"}"#).unwrap();
        assert!(record.img.is_empty());
        assert!(record.alt.is_empty());
    }

    #[test]
    fn test_record_missing_title_is_rejected() {
        assert!(serde_json::from_str::<ComicRecord>(r#"{"num": 1}"#).is_err());
    }

    #[test]
    fn test_comic_url_strips_trailing_slash() {
        let config = Config {
            api_base: "https://example.test/".to_string(),
            ..Config::default()
        };
        let client = XkcdClient::new(&config).unwrap();
        assert_eq!(client.comic_url(42), "https://example.test/?comic=42");
    }

    #[test]
    fn test_comic_page_url() {
        assert_eq!(comic_page_url(2475), "https://xkcd.com/2475/");
    }
}
