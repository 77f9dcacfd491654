use std::future::Future;
use std::sync::LazyLock;

use reqwest::{Client, Url};
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{LookupConfig, LookupMode, RetryConfig};
use crate::errors::{ConfigError, LookupError};
use crate::models::{AuthoritativeData, EwgScore};
use crate::safety::transport::send_with_retry;
use crate::safety::SafetySource;

static LISTING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".product-listing").expect("Invalid listing selector"));

static SCORE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".product-hazard-score").expect("Invalid hazard score selector")
});

static HAZARD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".product-hazards li").expect("Invalid hazard list selector"));

/// JSON envelope returned by the search proxy.
#[derive(Debug, Deserialize)]
struct ProxyResponse {
    html: Option<String>,
    error: Option<String>,
}

/// Client for the hazard-score search service, either through the JSON proxy
/// or against the search page itself.
pub struct EwgClient {
    client: Client,
    mode: LookupMode,
    endpoint: String,
    api_key: Option<String>,
    retry: RetryConfig,
}

impl EwgClient {
    /// Build a client with its own connection pool from `lookup` settings.
    pub fn from_config(lookup: &LookupConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(lookup.timeout())
            .user_agent(lookup.user_agent.as_str())
            .build()?;
        Self::new(client, lookup)
    }

    /// Wrap an existing `reqwest` client, sharing its connection pool.
    pub fn new(client: Client, lookup: &LookupConfig) -> Result<Self, ConfigError> {
        let endpoint = lookup.effective_endpoint().ok_or_else(|| {
            ConfigError::Invalid("lookup.endpoint is required in proxy mode".to_string())
        })?;

        Ok(EwgClient {
            client,
            mode: lookup.mode(),
            endpoint: endpoint.to_string(),
            api_key: lookup.api_key.clone(),
            retry: lookup.retry.clone(),
        })
    }

    fn lookup_url(&self, name: &str) -> Result<Url, LookupError> {
        let param = match self.mode {
            LookupMode::Proxy => "ingredient",
            LookupMode::Direct => "search",
        };
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{}{}={}",
            self.endpoint,
            separator,
            param,
            urlencoding::encode(name)
        );
        Url::parse(&url).map_err(|e| LookupError::InvalidUrl(e.to_string()))
    }

    /// One logical lookup. `Ok(None)` means the service answered but listed
    /// no matching ingredient.
    async fn lookup(&self, name: &str) -> Result<Option<AuthoritativeData>, LookupError> {
        let url = self.lookup_url(name)?;
        debug!(ingredient = name, url = %url, "Looking up safety data");

        let mut request = self.client.get(url);
        if self.mode == LookupMode::Proxy {
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }
        }

        let response = send_with_retry(request, &self.retry).await?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }

        let html = match self.mode {
            LookupMode::Proxy => {
                let body: ProxyResponse = response.json().await?;
                if let Some(error) = body.error {
                    return Err(LookupError::Service(error));
                }
                body.html.unwrap_or_default()
            }
            LookupMode::Direct => response.text().await?,
        };

        if html.trim().is_empty() {
            return Err(LookupError::EmptyBody);
        }

        Ok(parse_first_listing(&html))
    }
}

impl SafetySource for EwgClient {
    fn resolve<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Future<Output = Option<AuthoritativeData>> + Send + 'a {
        async move {
            match self.lookup(name).await {
                Ok(Some(data)) => {
                    debug!(
                        ingredient = name,
                        score = data.score.value(),
                        "Safety data found"
                    );
                    Some(data)
                }
                Ok(None) => {
                    warn!(ingredient = name, "No safety data found");
                    None
                }
                Err(err) => {
                    warn!(ingredient = name, error = %err, "Safety lookup failed");
                    None
                }
            }
        }
    }
}

/// Extract the score and hazard list from the first search result.
///
/// Returns `None` when the page has no result listing. A score that does not
/// start with digits counts as 5.
pub fn parse_first_listing(html: &str) -> Option<AuthoritativeData> {
    let document = Html::parse_document(html);
    let listing = document.select(&LISTING_SELECTOR).next()?;

    let score = listing
        .select(&SCORE_SELECTOR)
        .next()
        .and_then(|el| parse_score(&el.text().collect::<String>()))
        .unwrap_or(EwgScore::UNKNOWN);

    let concerns = listing
        .select(&HAZARD_SELECTOR)
        .map(|li| li.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    Some(AuthoritativeData { score, concerns })
}

/// Leading integer of `text`, e.g. `"3"` or `"7 (verified)"`.
fn parse_score(text: &str) -> Option<EwgScore> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<i64>().ok().map(EwgScore::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LISTING_HTML: &str = r#"
<html><body>
  <div class="product-listing">
    <div class="product-hazard-score"> 7 </div>
    <ul class="product-hazards">
      <li>Endocrine disruption</li>
      <li>  </li>
      <li>Allergies/immunotoxicity </li>
    </ul>
  </div>
  <div class="product-listing">
    <div class="product-hazard-score">1</div>
  </div>
</body></html>"#;

    fn proxy_config(endpoint: String) -> LookupConfig {
        LookupConfig {
            mode: Some(LookupMode::Proxy),
            endpoint: Some(endpoint),
            api_key: Some("anon-key".to_string()),
            retry: RetryConfig {
                max_retries: 0,
                delay_ms: 0,
            },
            ..LookupConfig::default()
        }
    }

    fn proxy_client(server: &MockServer) -> EwgClient {
        let cfg = proxy_config(format!("{}/functions/v1/ewg-search", server.uri()));
        EwgClient::new(Client::new(), &cfg).unwrap()
    }

    #[test]
    fn test_parse_first_listing() {
        let data = parse_first_listing(LISTING_HTML).unwrap();
        assert_eq!(data.score, EwgScore::new(7));
        assert_eq!(
            data.concerns,
            "Endocrine disruption, Allergies/immunotoxicity"
        );
    }

    #[test]
    fn test_parse_without_listing() {
        assert!(parse_first_listing("<html><body><p>No results</p></body></html>").is_none());
    }

    #[test]
    fn test_unparsable_score_defaults_to_five() {
        let html = r#"<div class="product-listing"><div class="product-hazard-score">n/a</div></div>"#;
        let data = parse_first_listing(html).unwrap();
        assert_eq!(data.score, EwgScore::UNKNOWN);
        assert_eq!(data.concerns, "");
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("0"), Some(EwgScore::new(0)));
        assert_eq!(parse_score(" 3 "), Some(EwgScore::new(3)));
        assert_eq!(parse_score("7 (verified)"), Some(EwgScore::new(7)));
        assert_eq!(parse_score("12"), Some(EwgScore::new(10)));
        assert_eq!(parse_score(""), None);
        assert_eq!(parse_score("high"), None);
    }

    #[test]
    fn test_lookup_url_encodes_name() {
        let cfg = proxy_config("https://example.test/functions/v1/ewg-search".to_string());
        let client = EwgClient::new(Client::new(), &cfg).unwrap();
        let url = client.lookup_url("sodium laureth sulfate & co").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.test/functions/v1/ewg-search?ingredient=sodium%20laureth%20sulfate%20%26%20co"
        );
    }

    #[tokio::test]
    async fn test_proxy_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/functions/v1/ewg-search"))
            .and(query_param("ingredient", "methylparaben"))
            .and(header("authorization", "Bearer anon-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "html": LISTING_HTML })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = proxy_client(&server);
        let data = client.resolve("methylparaben").await.unwrap();
        assert_eq!(data.score.value(), 7);

        server.verify().await;
    }

    #[tokio::test]
    async fn test_proxy_error_field_is_no_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "Failed to fetch EWG data",
                "details": "timeout"
            })))
            .mount(&server)
            .await;

        assert!(proxy_client(&server).resolve("water").await.is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_no_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(proxy_client(&server).resolve("water").await.is_none());
    }

    #[tokio::test]
    async fn test_empty_html_is_no_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "html": "" })))
            .mount(&server)
            .await;

        let err = proxy_client(&server).lookup("water").await.unwrap_err();
        assert!(matches!(err, LookupError::EmptyBody));
    }

    #[tokio::test]
    async fn test_malformed_json_is_no_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        assert!(proxy_client(&server).resolve("water").await.is_none());
    }

    #[tokio::test]
    async fn test_connection_refused_is_no_data() {
        let cfg = proxy_config("http://127.0.0.1:1/ewg-search".to_string());
        let client = EwgClient::new(Client::new(), &cfg).unwrap();
        assert!(client.resolve("water").await.is_none());
    }

    #[tokio::test]
    async fn test_direct_mode_reads_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/skindeep/search/"))
            .and(query_param("search", "retinol"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
            .expect(1)
            .mount(&server)
            .await;

        let cfg = LookupConfig {
            mode: Some(LookupMode::Direct),
            endpoint: Some(format!("{}/skindeep/search/", server.uri())),
            ..LookupConfig::default()
        };
        let client = EwgClient::new(Client::new(), &cfg).unwrap();
        let data = client.resolve("retinol").await.unwrap();
        assert_eq!(data.score.value(), 7);

        server.verify().await;
    }

    #[tokio::test]
    async fn test_endpoint_only_config_talks_to_proxy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/functions/v1/ewg-search"))
            .and(query_param("ingredient", "retinol"))
            .and(header("authorization", "Bearer anon-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "html": LISTING_HTML })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let toml = format!(
            "[lookup]\nendpoint = \"{}/functions/v1/ewg-search\"\napi_key = \"anon-key\"\n\n[lookup.retry]\nmax_retries = 0\n",
            server.uri()
        );
        let cfg: crate::config::Config = toml::from_str(&toml).unwrap();
        let client = EwgClient::new(Client::new(), &cfg.lookup).unwrap();
        let data = client.resolve("retinol").await.unwrap();
        assert_eq!(data.score.value(), 7);

        server.verify().await;
    }

    #[test]
    fn test_proxy_requires_endpoint() {
        let cfg = LookupConfig {
            mode: Some(LookupMode::Proxy),
            ..LookupConfig::default()
        };
        assert!(EwgClient::new(Client::new(), &cfg).is_err());
    }
}
