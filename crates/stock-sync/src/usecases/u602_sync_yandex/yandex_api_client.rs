use async_trait::async_trait;
use contracts::enums::SyncTarget;
use contracts::usecases::u602_sync_yandex::{YandexOfferPrice, YandexSkuStock};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::YandexShape;
use crate::shared::config::{HttpConfig, MarketplaceConfig, YandexCampaign};
use crate::shared::error::SyncError;
use crate::shared::marketplaces::{BatchLimits, MarketplaceClient, PushResponse};
use crate::shared::request_log::{preview, RequestLog};

/// HTTP-клиент для работы с Yandex Market Partner API.
///
/// Один клиент обслуживает одну кампанию (FBS или DBS).
pub struct YandexApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    campaign_id: String,
    target: SyncTarget,
    shape: YandexShape,
    limits: BatchLimits,
    list_page_size: u32,
    request_log: RequestLog,
}

impl YandexApiClient {
    pub fn new(
        config: &MarketplaceConfig,
        http: &HttpConfig,
        token: String,
        campaign: YandexCampaign,
        target: SyncTarget,
        request_log: RequestLog,
    ) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(http.timeout_secs))
            .build()
            .map_err(|e| SyncError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
            campaign_id: campaign.campaign_id,
            target,
            shape: YandexShape {
                warehouse_id: campaign.warehouse_id,
            },
            limits: BatchLimits::from(config),
            list_page_size: config.list_page_size,
            request_log,
        })
    }

    async fn request<B, R>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        request_body: Option<&B>,
    ) -> Result<R, SyncError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let body = request_body.map(serde_json::to_string).transpose()?;

        self.request_log.write(&format!(
            "=== REQUEST ===\n{} {}\nAuthorization: Bearer ****\nQuery: {:?}\nBody: {}",
            method,
            url,
            query,
            body.as_deref().map(|b| preview(b, 2000)).unwrap_or_default()
        ));

        let mut builder = self
            .client
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .query(query);
        if let Some(body) = body {
            builder = builder.header("Content-Type", "application/json").body(body);
        }

        let response = builder.send().await?;

        let status = response.status();
        self.request_log.write(&format!("Response status: {}", status));

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            self.request_log.write(&format!("ERROR Response body:\n{}", body));
            tracing::error!("Yandex Market API request failed: {}", body);
            return Err(SyncError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        self.request_log
            .write(&format!("=== RESPONSE BODY ===\n{}\n", body));

        serde_json::from_str::<R>(&body).map_err(|e| {
            tracing::error!("Failed to parse Yandex Market API response. Error: {}", e);
            SyncError::data(format!(
                "Failed to parse Yandex Market API JSON: {}. Response: {}",
                e,
                preview(&body, 500)
            ))
        })
    }

    /// Получить страницу товаров кампании
    /// Endpoint: GET /campaigns/{campaignId}/offer-mapping-entries
    pub async fn fetch_offer_mapping_entries(
        &self,
        page_token: Option<&str>,
    ) -> Result<YandexOfferMappingResult, SyncError> {
        let mut query = vec![("limit", self.list_page_size.to_string())];
        if let Some(token) = page_token {
            query.push(("page_token", token.to_string()));
        }

        let path = format!("/campaigns/{}/offer-mapping-entries", self.campaign_id);
        let response: YandexOfferMappingResponse = self
            .request::<(), _>(Method::GET, &path, &query, None)
            .await?;

        response
            .result
            .ok_or_else(|| SyncError::data("Yandex Market response has no result"))
    }
}

#[async_trait]
impl MarketplaceClient for YandexApiClient {
    type Shape = YandexShape;

    fn target(&self) -> SyncTarget {
        self.target
    }

    fn shape(&self) -> &YandexShape {
        &self.shape
    }

    fn limits(&self) -> BatchLimits {
        self.limits
    }

    /// Страницы запрашиваются по nextPageToken, пока он не пуст
    async fn list_offer_ids(&self) -> Result<Vec<String>, SyncError> {
        let mut page_token: Option<String> = None;
        let mut offer_ids = Vec::new();

        loop {
            let page = self
                .fetch_offer_mapping_entries(page_token.as_deref())
                .await?;
            let received = page.offer_mapping_entries.len();
            offer_ids.extend(
                page.offer_mapping_entries
                    .into_iter()
                    .map(|entry| entry.offer.shop_sku),
            );

            tracing::debug!(
                "Yandex Market {} page: {} items, collected {}",
                self.target,
                received,
                offer_ids.len()
            );

            match page.paging.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) if received > 0 => page_token = Some(next),
                _ => break,
            }
        }

        Ok(offer_ids)
    }

    /// PUT /campaigns/{campaignId}/offers/stocks
    async fn push_stocks(&self, batch: &[YandexSkuStock]) -> Result<PushResponse, SyncError> {
        let path = format!("/campaigns/{}/offers/stocks", self.campaign_id);
        let body: serde_json::Value = self
            .request(Method::PUT, &path, &[], Some(&YandexStocksRequest { skus: batch }))
            .await?;
        Ok(PushResponse::new(body))
    }

    /// POST /campaigns/{campaignId}/offer-prices/updates
    async fn push_prices(&self, batch: &[YandexOfferPrice]) -> Result<PushResponse, SyncError> {
        let path = format!("/campaigns/{}/offer-prices/updates", self.campaign_id);
        let body: serde_json::Value = self
            .request(Method::POST, &path, &[], Some(&YandexPricesRequest { offers: batch }))
            .await?;
        Ok(PushResponse::new(body))
    }
}

// ============================================================================
// Request/Response structures
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct YandexOfferMappingResponse {
    pub result: Option<YandexOfferMappingResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YandexOfferMappingResult {
    #[serde(default)]
    pub paging: YandexPaging,
    #[serde(default)]
    pub offer_mapping_entries: Vec<YandexOfferMappingEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YandexPaging {
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct YandexOfferMappingEntry {
    pub offer: YandexOffer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YandexOffer {
    pub shop_sku: String,
}

#[derive(Debug, Serialize)]
struct YandexStocksRequest<'a> {
    skus: &'a [YandexSkuStock],
}

#[derive(Debug, Serialize)]
struct YandexPricesRequest<'a> {
    offers: &'a [YandexOfferPrice],
}
