use async_trait::async_trait;
use contracts::enums::SyncTarget;
use contracts::usecases::u601_sync_ozon::{OzonPrice, OzonStock};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::OzonShape;
use crate::shared::config::{HttpConfig, MarketplaceConfig, OzonCredentials};
use crate::shared::error::SyncError;
use crate::shared::marketplaces::{BatchLimits, MarketplaceClient, PushResponse};
use crate::shared::request_log::{preview, RequestLog};

/// HTTP-клиент для работы с OZON Seller API
pub struct OzonApiClient {
    client: reqwest::Client,
    base_url: String,
    credentials: OzonCredentials,
    limits: BatchLimits,
    list_page_size: u32,
    request_log: RequestLog,
}

impl OzonApiClient {
    pub fn new(
        config: &MarketplaceConfig,
        http: &HttpConfig,
        credentials: OzonCredentials,
        request_log: RequestLog,
    ) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(http.timeout_secs))
            .build()
            .map_err(|e| SyncError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            limits: BatchLimits::from(config),
            list_page_size: config.list_page_size,
            request_log,
        })
    }

    /// POST-запрос к Seller API с JSON-телом
    async fn post<B, R>(&self, path: &str, request_body: &B) -> Result<R, SyncError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let body = serde_json::to_string(request_body)?;
        self.request_log.write(&format!(
            "=== REQUEST ===\nPOST {}\nClient-Id: {}\nApi-Key: ****\nBody: {}",
            url,
            self.credentials.client_id,
            preview(&body, 2000)
        ));

        let response = self
            .client
            .post(&url)
            .header("Client-Id", &self.credentials.client_id)
            .header("Api-Key", &self.credentials.seller_token)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        self.request_log.write(&format!("Response status: {}", status));

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            self.request_log.write(&format!("ERROR Response body:\n{}", body));
            tracing::error!("OZON API request failed: {}", body);
            return Err(SyncError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        self.request_log
            .write(&format!("=== RESPONSE BODY ===\n{}\n", body));

        serde_json::from_str::<R>(&body).map_err(|e| {
            tracing::error!("Failed to parse OZON API response. Error: {}", e);
            SyncError::data(format!(
                "Failed to parse OZON API JSON: {}. Response: {}",
                e,
                preview(&body, 500)
            ))
        })
    }

    /// Получить страницу списка товаров через POST /v2/product/list
    pub async fn fetch_product_list(&self, last_id: &str) -> Result<OzonProductListResult, SyncError> {
        let request = OzonProductListRequest {
            filter: OzonProductListFilter {
                visibility: "ALL".to_string(),
            },
            last_id: last_id.to_string(),
            limit: self.list_page_size,
        };
        let response: OzonProductListResponse = self.post("/v2/product/list", &request).await?;
        Ok(response.result)
    }
}

#[async_trait]
impl MarketplaceClient for OzonApiClient {
    type Shape = OzonShape;

    fn target(&self) -> SyncTarget {
        SyncTarget::Ozon
    }

    fn shape(&self) -> &OzonShape {
        &OzonShape
    }

    fn limits(&self) -> BatchLimits {
        self.limits
    }

    /// Страницы запрашиваются по last_id, пока не собрано total товаров
    async fn list_offer_ids(&self) -> Result<Vec<String>, SyncError> {
        let mut last_id = String::new();
        let mut offer_ids = Vec::new();

        loop {
            let page = self.fetch_product_list(&last_id).await?;
            let received = page.items.len();
            offer_ids.extend(page.items.into_iter().map(|item| item.offer_id));

            tracing::debug!(
                "OZON product list page: {} items, collected {}/{}",
                received,
                offer_ids.len(),
                page.total
            );

            if offer_ids.len() >= page.total {
                break;
            }
            if received == 0 || page.last_id.is_empty() {
                tracing::warn!(
                    "OZON product list ended early: collected {} of {}",
                    offer_ids.len(),
                    page.total
                );
                break;
            }
            last_id = page.last_id;
        }

        Ok(offer_ids)
    }

    /// POST /v1/product/import/stocks
    async fn push_stocks(&self, batch: &[OzonStock]) -> Result<PushResponse, SyncError> {
        let body: serde_json::Value = self
            .post("/v1/product/import/stocks", &OzonStocksRequest { stocks: batch })
            .await?;
        Ok(PushResponse::new(body))
    }

    /// POST /v1/product/import/prices
    async fn push_prices(&self, batch: &[OzonPrice]) -> Result<PushResponse, SyncError> {
        let body: serde_json::Value = self
            .post("/v1/product/import/prices", &OzonPricesRequest { prices: batch })
            .await?;
        Ok(PushResponse::new(body))
    }
}

// ============================================================================
// Request/Response structures
// ============================================================================

#[derive(Debug, Serialize)]
pub struct OzonProductListRequest {
    pub filter: OzonProductListFilter,
    pub last_id: String,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct OzonProductListFilter {
    pub visibility: String,
}

#[derive(Debug, Deserialize)]
pub struct OzonProductListResponse {
    pub result: OzonProductListResult,
}

#[derive(Debug, Deserialize)]
pub struct OzonProductListResult {
    #[serde(default)]
    pub items: Vec<OzonProductListItem>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub last_id: String,
}

#[derive(Debug, Deserialize)]
pub struct OzonProductListItem {
    pub product_id: Option<i64>,
    pub offer_id: String,
}

#[derive(Debug, Serialize)]
struct OzonStocksRequest<'a> {
    stocks: &'a [OzonStock],
}

#[derive(Debug, Serialize)]
struct OzonPricesRequest<'a> {
    prices: &'a [OzonPrice],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::Config;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(base_url: &str) -> OzonApiClient {
        let config = Config::embedded_default().unwrap();
        let ozon = MarketplaceConfig {
            base_url: base_url.to_string(),
            ..config.ozon
        };
        OzonApiClient::new(
            &ozon,
            &config.http,
            OzonCredentials {
                client_id: "123".into(),
                seller_token: "secret".into(),
            },
            RequestLog::disabled(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_offer_ids_pages_until_total() {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v2/product/list")
                    .body_contains("\"last_id\":\"\"")
                    .body_contains("\"visibility\":\"ALL\"");
                then.status(200).json_body(json!({
                    "result": {
                        "items": [
                            {"product_id": 1, "offer_id": "136748"},
                            {"product_id": 2, "offer_id": "136749"}
                        ],
                        "total": 3,
                        "last_id": "bnVsbA=="
                    }
                }));
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v2/product/list")
                    .body_contains("\"last_id\":\"bnVsbA==\"");
                then.status(200).json_body(json!({
                    "result": {
                        "items": [{"product_id": 3, "offer_id": "69785"}],
                        "total": 3,
                        "last_id": "next"
                    }
                }));
            })
            .await;

        let offer_ids = client(&server.base_url()).list_offer_ids().await.unwrap();

        assert_eq!(offer_ids, vec!["136748", "136749", "69785"]);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_offer_ids_stops_on_empty_page() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v2/product/list");
                then.status(200).json_body(json!({
                    "result": {"items": [], "total": 5, "last_id": "x"}
                }));
            })
            .await;

        let offer_ids = client(&server.base_url()).list_offer_ids().await.unwrap();

        assert!(offer_ids.is_empty());
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_push_stocks_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/product/import/stocks")
                    .json_body(json!({
                        "stocks": [
                            {"offer_id": "69785", "stock": 100},
                            {"offer_id": "99999", "stock": 0}
                        ]
                    }));
                then.status(200).json_body(json!({
                    "result": [
                        {"offer_id": "69785", "updated": true, "errors": []},
                        {"offer_id": "99999", "updated": false, "errors": [{"code": "NOT_FOUND"}]}
                    ]
                }));
            })
            .await;

        let batch = vec![
            OzonStock {
                offer_id: "69785".into(),
                stock: 100,
            },
            OzonStock {
                offer_id: "99999".into(),
                stock: 0,
            },
        ];
        let response = client(&server.base_url()).push_stocks(&batch).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.item_errors(), 1);
    }

    #[tokio::test]
    async fn test_http_error_is_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/product/import/prices");
                then.status(403).body("{\"code\":7,\"message\":\"Invalid Api-Key\"}");
            })
            .await;

        let err = client(&server.base_url())
            .push_prices(&[OzonPrice::new("69785", "5990")])
            .await
            .unwrap_err();

        match err {
            SyncError::ApiError { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("Invalid Api-Key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_data_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v2/product/list");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let err = client(&server.base_url()).list_offer_ids().await.unwrap_err();
        assert!(matches!(err, SyncError::DataError(_)));
    }
}
