//! Implements the `Backend` trait with plain JSON over HTTP using `reqwest`.

use crate::api::{Backend, ReceiptRequest, ReceiptResponse, ResponseData};
use crate::model::{ReceiptRecord, YearMonth};
use crate::{Config, Result};
use anyhow::{bail, Context};
use reqwest::{Method, RequestBuilder};
use tracing::{trace, warn};
use url::Url;

const API_KEY_HEADER: &str = "apikey";
const RECEIPTS: &str = "receipts";

/// Talks to the receipt backend at the configured URL. The optional API key is passed through as
/// a header and otherwise left alone.
pub struct HttpBackend {
    receipts_url: Url,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self> {
        let receipts_url = receipts_url(config.backend_url())?;
        Ok(Self {
            receipts_url,
            api_key: config.api_key().map(str::to_string),
            client: reqwest::Client::new(),
        })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key),
            None => builder,
        }
    }

    async fn send_receipt(
        &self,
        method: Method,
        request: &ReceiptRequest,
    ) -> Result<ReceiptResponse> {
        trace!("{method} {} for {}", self.receipts_url, request.purchase_date);
        let response = self
            .request(method.clone(), self.receipts_url.clone())
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to send {method} request to {}", self.receipts_url))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            warn!("{method} {} answered {status}", self.receipts_url);
            return Ok(ReceiptResponse::status_only(status));
        }

        let body = response.text().await.with_context(|| {
            format!("Unable to read the {method} response from {}", self.receipts_url)
        })?;
        let data = parse_data(&body).with_context(|| {
            format!(
                "{method} {} answered {status} with an unreadable body, the receipt may or may not \
                 have been stored",
                self.receipts_url
            )
        })?;
        Ok(ReceiptResponse { status, data })
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn post(&mut self, request: &ReceiptRequest) -> Result<ReceiptResponse> {
        self.send_receipt(Method::POST, request).await
    }

    async fn update(&mut self, request: &ReceiptRequest) -> Result<ReceiptResponse> {
        self.send_receipt(Method::PUT, request).await
    }

    async fn month(&mut self, month: YearMonth) -> Result<Vec<ReceiptRecord>> {
        let mut url = self.receipts_url.clone();
        url.query_pairs_mut()
            .append_pair("month", &month.to_string());
        trace!("GET {url}");

        let response = self
            .request(Method::GET, url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch receipts for {month}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            bail!("Fetching receipts for {month} failed with status {status}: {body}");
        }

        response
            .json::<Vec<ReceiptRecord>>()
            .await
            .with_context(|| format!("Failed to parse the receipts for {month} from {url}"))
    }
}

/// Reads the body of a successful `post` or `update`. A body that is not the expected JSON is an
/// error rather than an empty list of purchases.
fn parse_data(body: &str) -> Result<ResponseData> {
    serde_json::from_str(body).context("Unable to parse the response body")
}

/// `{backend_url}/receipts`, keeping any path the backend URL already has.
fn receipts_url(backend_url: &Url) -> Result<Url> {
    let mut base = backend_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(RECEIPTS)
        .with_context(|| format!("Unable to build the receipts URL from {backend_url}"))
}
