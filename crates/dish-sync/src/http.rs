//! REST client for the dish service

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use dish_core::{DashboardConfig, Dish, DishApi, DishId, Error, Result};

/// `DishApi` over HTTP
pub struct HttpDishApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDishApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        Self::new(&config.service_url, config.http_timeout)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base}/dishes/{id}/toggle-status`, with the id escaped as one segment
    fn toggle_url(&self, id: &DishId) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("Invalid service URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("Service URL {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(["dishes", &id.to_string(), "toggle-status"]);
        Ok(url)
    }
}

#[async_trait]
impl DishApi for HttpDishApi {
    async fn fetch_all(&self) -> Result<Vec<Dish>> {
        let url = self.url("/dishes/getAll");
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Status {
                status: response.status().as_u16(),
            });
        }

        response
            .json::<Vec<Dish>>()
            .await
            .map_err(|e| Error::malformed(format!("Failed to parse dish list: {}", e)))
    }

    async fn toggle_status(&self, id: &DishId) -> Result<Value> {
        let url = self.toggle_url(id)?;
        debug!("PUT {}", url);

        let response = self
            .client
            .put(url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;

        // The body is only logged; keep non-JSON answers as plain strings.
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let api = HttpDishApi::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.url("/dishes/getAll"), "http://localhost:8080/dishes/getAll");
    }

    #[test]
    fn test_from_config_uses_service_url() {
        let api = HttpDishApi::from_config(&DashboardConfig::default()).unwrap();
        assert_eq!(
            api.toggle_url(&DishId::from(1)).unwrap().as_str(),
            "https://dish-manager-service.onrender.com/dishes/1/toggle-status"
        );
    }

    #[test]
    fn test_toggle_url_escapes_text_id() {
        let api = HttpDishApi::new("http://localhost:8080/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            api.toggle_url(&DishId::from("a/b c?d#e")).unwrap().as_str(),
            "http://localhost:8080/api/dishes/a%2Fb%20c%3Fd%23e/toggle-status"
        );
    }
}
