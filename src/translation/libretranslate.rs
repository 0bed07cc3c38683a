

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::base::{TranslationError, Translator};
use crate::taxonomy::Language;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}


/// Client for a LibreTranslate-compatible `POST /translate` endpoint.
pub struct LibreTranslateProvider {
    endpoint: Url,
    api_key: Option<String>,
    client: Client,
}

impl LibreTranslateProvider {

    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, TranslationError> {
        let endpoint = Url::parse(base_url)?.join("translate")?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;

        info!("LibreTranslate provider initialized (endpoint={})", endpoint);
        Ok(Self {
            endpoint,
            api_key,
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for LibreTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError> {
        let request = TranslateRequest {
            q: text,
            source: source.code(),
            target: target.code(),
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(TranslationError::Http)?
            .json::<TranslateResponse>()
            .await?;

        debug!("Translated '{}' -> '{}'", text, response.translated_text);
        Ok(response.translated_text)
    }

    fn provider_name(&self) -> &str {
        "libretranslate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_is_joined() {
        let provider = LibreTranslateProvider::new("http://localhost:5000", None, 5).unwrap();
        assert_eq!(provider.endpoint().as_str(), "http://localhost:5000/translate");

        let provider = LibreTranslateProvider::new("https://example.org/api/", None, 5).unwrap();
        assert_eq!(provider.endpoint().as_str(), "https://example.org/api/translate");
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            LibreTranslateProvider::new("not a url", None, 5),
            Err(TranslationError::Url(_))
        ));
    }

    #[test]
    fn test_request_shape() {
        let request = TranslateRequest {
            q: "Information systems",
            source: Language::English.code(),
            target: Language::Portuguese.code(),
            format: "text",
            api_key: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["source"], "en");
        assert_eq!(json["target"], "pt");
        assert!(json.get("api_key").is_none());
    }
}
