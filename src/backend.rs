use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::venue::VenueResponse;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditRequest {
    pub image: String,
    pub trend: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditResponse {
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRequest {
    pub venueid: String,
    pub tags: Vec<String>,
    pub trend: String,
    pub budget: u64,
}

/// The remote services this client talks to. Implementations are shared
/// across fan-out threads.
pub trait Backend: Send + Sync {
    fn fetch_venue(&self, id: &str) -> Result<VenueResponse>;
    fn fetch_photo(&self, url: &str) -> Result<Vec<u8>>;
    fn edit_image(&self, req: &EditRequest) -> Result<EditResponse>;
    fn generate_campaign(&self, req: &CampaignRequest) -> Result<()>;
}

pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(cfg: &AppConfig) -> Result<Self> {
        let base = Url::parse(&cfg.backend_url)
            .map_err(|e| Error::validation(format!("bad backend_url {}: {e}", cfg.backend_url)))?;
        if base.cannot_be_a_base() {
            return Err(Error::validation(format!(
                "backend_url {} cannot be used as a base",
                cfg.backend_url
            )));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl Backend for HttpBackend {
    fn fetch_venue(&self, id: &str) -> Result<VenueResponse> {
        let url = self.endpoint(&["venue", id]);
        debug!(%url, "GET venue");
        let resp = self.client.get(url).send()?;
        read_json(resp)
    }

    fn fetch_photo(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "GET photo");
        let resp = check_status(self.client.get(url).send()?)?;
        Ok(resp.bytes()?.to_vec())
    }

    fn edit_image(&self, req: &EditRequest) -> Result<EditResponse> {
        let url = self.endpoint(&["edit"]);
        debug!(%url, trend = %req.trend, bytes = req.image.len(), "POST edit");
        let resp = self.client.post(url).json(req).send()?;
        read_json(resp)
    }

    fn generate_campaign(&self, req: &CampaignRequest) -> Result<()> {
        let url = self.endpoint(&["gen-campaign"]);
        debug!(%url, venue = %req.venueid, budget = req.budget, "POST gen-campaign");
        check_status(self.client.post(url).json(req).send()?)?;
        Ok(())
    }
}

fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(Error::Server {
        status: status.as_u16(),
        body,
    })
}

fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let body = check_status(resp)?.text()?;
    serde_json::from_str(&body).map_err(|e| Error::malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> HttpBackend {
        let cfg = AppConfig {
            backend_url: base.to_string(),
            ..AppConfig::default()
        };
        HttpBackend::new(&cfg).unwrap()
    }

    #[test]
    fn venue_id_is_a_single_encoded_segment() {
        let b = backend("http://127.0.0.1:8080");
        let url = b.endpoint(&["venue", "a/b?c"]);
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/venue/a%2Fb%3Fc");
    }

    #[test]
    fn base_path_is_kept() {
        let b = backend("http://localhost:9000/api/");
        assert_eq!(
            b.endpoint(&["gen-campaign"]).as_str(),
            "http://localhost:9000/api/gen-campaign"
        );
    }

    #[test]
    fn rejects_unusable_base() {
        let cfg = AppConfig {
            backend_url: "mailto:someone@example.com".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(HttpBackend::new(&cfg), Err(Error::Validation(_))));
    }

    #[test]
    fn edit_body_uses_wire_names() {
        let req = EditRequest {
            image: "AAAA".into(),
            trend: "pizza party".into(),
            tags: vec!["loft".into()],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"image": "AAAA", "trend": "pizza party", "tags": ["loft"]})
        );
    }

    #[test]
    fn campaign_body_uses_wire_names() {
        let req = CampaignRequest {
            venueid: "v1".into(),
            tags: vec![],
            trend: "halloween".into(),
            budget: 500,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"venueid": "v1", "tags": [], "trend": "halloween", "budget": 500})
        );
    }
}
