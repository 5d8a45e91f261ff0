//! Binance USDT-M futures REST client.
//!
//! Public market-data endpoints are plain GETs and retry on connect or
//! timeout errors. Order endpoints are HMAC-SHA256 signed and sent exactly
//! once: a timed-out submission may still have reached the matching
//! engine, so it is reported as failed rather than resent.
//!
//! Prices and quantities are conformed to the symbol's tick and lot step
//! (from `exchangeInfo`, fetched once per client) before they are signed.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use parking_lot::Mutex;
use reqwest::{Client as HttpClient, Method, Response};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use sha2::Sha256;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::credentials::{Credentials, API_KEY_VAR};
use super::dto::{
    decode_error, BalanceEntry, ExchangeInfo, OrderResponse, QueriedOrder, ServerTime, TickerPrice,
};
use super::settings::BinanceConfig;
use crate::domain::error::DomainError;
use crate::domain::{
    AssetBalance, ClientOrderId, ImmediateFill, OrderAck, OrderId, OrderSide, OrderState, Symbol,
    SymbolFilters, TimeInForce,
};
use crate::error::{ConfigError, Error, ExecutionError, Result};
use crate::port::ExchangeGateway;

type HmacSha256 = Hmac<Sha256>;

const ORDER_PATH: &str = "/fapi/v1/order";
const BALANCE_PATH: &str = "/fapi/v2/balance";
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// HTTP client for the Binance futures REST API.
pub struct BinanceClient {
    http: HttpClient,
    base_url: String,
    credentials: Option<Credentials>,
    recv_window_ms: u64,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
    filters: Mutex<HashMap<String, SymbolFilters>>,
}

impl BinanceClient {
    /// Create an unauthenticated client against `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into(),
            credentials: None,
            recv_window_ms: 5000,
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
            filters: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn from_config(config: &BinanceConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.http.timeout_ms))
            .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.base_url().to_string(),
            credentials: None,
            recv_window_ms: config.recv_window_ms,
            retry_max_attempts: config.http.retry_max_attempts,
            retry_backoff_ms: config.http.retry_backoff_ms,
            filters: Mutex::new(HashMap::new()),
        }
    }

    /// Attach credentials for signed endpoints.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /fapi/v1/ping`.
    pub async fn ping(&self) -> Result<()> {
        let url = format!("{}/fapi/v1/ping", self.base_url);
        let _: serde_json::Value = self.get_with_retry(&url).await?;
        Ok(())
    }

    /// `GET /fapi/v1/time`.
    pub async fn server_time(&self) -> Result<DateTime<Utc>> {
        let url = format!("{}/fapi/v1/time", self.base_url);
        let time: ServerTime = self.get_with_retry(&url).await?;
        DateTime::from_timestamp_millis(time.server_time).ok_or_else(|| {
            Error::Execution(ExecutionError::Decode(format!(
                "server time {} out of range",
                time.server_time
            )))
        })
    }

    /// Tick and lot rules for `symbol`.
    ///
    /// The first call loads `GET /fapi/v1/exchangeInfo` and caches the rules
    /// of every listed symbol.
    pub async fn symbol_filters(&self, symbol: &Symbol) -> Result<SymbolFilters> {
        let cached = self.filters.lock().get(symbol.as_str()).copied();
        if let Some(filters) = cached {
            return Ok(filters);
        }

        let url = format!("{}/fapi/v1/exchangeInfo", self.base_url);
        let info: ExchangeInfo = self.get_with_retry(&url).await?;
        let mut cache = self.filters.lock();
        cache.extend(info.symbols.iter().filter_map(|entry| {
            entry
                .trading_filters()
                .map(|filters| (entry.symbol.clone(), filters))
        }));
        debug!(symbols = cache.len(), "Loaded exchange trading rules");

        cache.get(symbol.as_str()).copied().ok_or_else(|| {
            Error::Execution(ExecutionError::UnknownSymbol {
                symbol: symbol.to_string(),
            })
        })
    }

    async fn get_with_retry<T>(&self, url: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            match self.http.get(url).send().await {
                Ok(response) => return decode(response).await,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "HTTP request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }

    fn credentials(&self) -> Result<&Credentials> {
        self.credentials
            .as_ref()
            .ok_or(Error::Config(ConfigError::MissingField { field: API_KEY_VAR }))
    }

    /// Sign `params` and send them once.
    async fn send_signed<T>(
        &self,
        method: Method,
        path: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let credentials = self.credentials()?;
        params.push(("recvWindow", self.recv_window_ms.to_string()));
        params.push(("timestamp", Utc::now().timestamp_millis().to_string()));

        let query = encode_query(&params);
        let signature = sign(credentials.api_secret(), &query)?;
        let url = format!("{}{path}?{query}&signature={signature}", self.base_url);

        debug!(method = %method, path, "Sending signed request");
        let response = self
            .http
            .request(method, &url)
            .header(API_KEY_HEADER, credentials.api_key())
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(decode_error(status.as_u16(), &body).into());
    }
    serde_json::from_str(&body).map_err(|e| ExecutionError::Decode(e.to_string()).into())
}

/// Hex-encoded HMAC-SHA256 of `payload` keyed by `secret`.
pub fn sign(secret: &str, payload: &str) -> std::result::Result<String, ExecutionError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| ExecutionError::SigningFailed(err.to_string()))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Join parameters as `k=v&k=v`. Values are symbols, enum names, decimals
/// and hex ids, none of which need escaping.
#[must_use]
pub fn encode_query(params: &[(&'static str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Plain decimal text without trailing zeros or exponent.
#[must_use]
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

fn new_order(
    symbol: &Symbol,
    side: OrderSide,
    order_type: &'static str,
    quantity: Decimal,
) -> Vec<(&'static str, String)> {
    vec![
        ("symbol", symbol.to_string()),
        ("side", side.as_str().to_string()),
        ("type", order_type.to_string()),
        ("quantity", format_decimal(quantity)),
        ("newClientOrderId", ClientOrderId::new().to_string()),
    ]
}

/// `MARKET` order parameters with the quantity on the lot step.
fn market_order(
    filters: &SymbolFilters,
    symbol: &Symbol,
    side: OrderSide,
    quantity: Decimal,
) -> std::result::Result<Vec<(&'static str, String)>, DomainError> {
    let mut params = new_order(symbol, side, "MARKET", filters.conform_quantity(quantity)?);
    params.push(("newOrderRespType", "RESULT".to_string()));
    Ok(params)
}

/// `LIMIT` order parameters conformed to tick and lot step.
fn limit_order(
    filters: &SymbolFilters,
    symbol: &Symbol,
    side: OrderSide,
    quantity: Decimal,
    price: Decimal,
    time_in_force: TimeInForce,
) -> std::result::Result<Vec<(&'static str, String)>, DomainError> {
    let mut params = new_order(symbol, side, "LIMIT", filters.conform_quantity(quantity)?);
    params.push(("price", format_decimal(filters.conform_price(price))));
    params.push(("timeInForce", time_in_force.as_str().to_string()));
    Ok(params)
}

/// `STOP` order parameters conformed to tick and lot step.
fn stop_order(
    filters: &SymbolFilters,
    symbol: &Symbol,
    side: OrderSide,
    quantity: Decimal,
    trigger_price: Decimal,
    limit_price: Decimal,
    time_in_force: TimeInForce,
) -> std::result::Result<Vec<(&'static str, String)>, DomainError> {
    let mut params = new_order(symbol, side, "STOP", filters.conform_quantity(quantity)?);
    params.push(("stopPrice", format_decimal(filters.conform_price(trigger_price))));
    params.push(("price", format_decimal(filters.conform_price(limit_price))));
    params.push(("timeInForce", time_in_force.as_str().to_string()));
    Ok(params)
}

#[async_trait]
impl ExchangeGateway for BinanceClient {
    async fn current_price(&self, symbol: &Symbol) -> Result<Decimal> {
        let url = format!("{}/fapi/v1/ticker/price?symbol={symbol}", self.base_url);
        let ticker: TickerPrice = self.get_with_retry(&url).await?;
        debug!(symbol = %ticker.symbol, price = %ticker.price, "Fetched ticker price");
        Ok(ticker.price)
    }

    async fn submit_immediate(
        &self,
        symbol: &Symbol,
        side: OrderSide,
        quantity: Decimal,
    ) -> Result<ImmediateFill> {
        self.credentials()?;
        let filters = self.symbol_filters(symbol).await?;
        let params = market_order(&filters, symbol, side, quantity)?;

        let response: OrderResponse = self.send_signed(Method::POST, ORDER_PATH, params).await?;
        info!(
            symbol = %symbol,
            side = %side,
            order_id = response.order_id,
            status = %response.status,
            "Market order placed"
        );
        Ok(response.into_fill())
    }

    async fn submit_resting(
        &self,
        symbol: &Symbol,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        time_in_force: TimeInForce,
    ) -> Result<OrderAck> {
        self.credentials()?;
        let filters = self.symbol_filters(symbol).await?;
        let params = limit_order(&filters, symbol, side, quantity, price, time_in_force)?;

        let response: OrderResponse = self.send_signed(Method::POST, ORDER_PATH, params).await?;
        info!(
            symbol = %symbol,
            side = %side,
            price = %price,
            order_id = response.order_id,
            "Limit order placed"
        );
        Ok(response.into_ack())
    }

    async fn submit_stop_triggered(
        &self,
        symbol: &Symbol,
        side: OrderSide,
        quantity: Decimal,
        trigger_price: Decimal,
        limit_price: Decimal,
        time_in_force: TimeInForce,
    ) -> Result<OrderAck> {
        self.credentials()?;
        let filters = self.symbol_filters(symbol).await?;
        let params = stop_order(
            &filters,
            symbol,
            side,
            quantity,
            trigger_price,
            limit_price,
            time_in_force,
        )?;

        let response: OrderResponse = self.send_signed(Method::POST, ORDER_PATH, params).await?;
        info!(
            symbol = %symbol,
            side = %side,
            stop = %trigger_price,
            limit = %limit_price,
            order_id = response.order_id,
            "Stop-limit order placed"
        );
        Ok(response.into_ack())
    }

    async fn cancel(&self, symbol: &Symbol, order_id: &OrderId) -> Result<OrderAck> {
        let params = vec![
            ("symbol", symbol.to_string()),
            ("orderId", order_id.to_string()),
        ];
        let response: OrderResponse = self.send_signed(Method::DELETE, ORDER_PATH, params).await?;
        info!(symbol = %symbol, order_id = %order_id, "Order cancelled");
        Ok(response.into_ack())
    }

    async fn order_status(&self, symbol: &Symbol, order_id: &OrderId) -> Result<OrderState> {
        let params = vec![
            ("symbol", symbol.to_string()),
            ("orderId", order_id.to_string()),
        ];
        let order: QueriedOrder = self.send_signed(Method::GET, ORDER_PATH, params).await?;
        debug!(symbol = %symbol, order_id = %order_id, status = %order.status, "Fetched order");
        Ok(order.into())
    }

    async fn balances(&self) -> Result<Vec<AssetBalance>> {
        let entries: Vec<BalanceEntry> = self.send_signed(Method::GET, BALANCE_PATH, Vec::new()).await?;
        debug!(assets = entries.len(), "Fetched account balances");
        Ok(entries.into_iter().map(AssetBalance::from).collect())
    }

    fn exchange_name(&self) -> &'static str {
        "Binance Futures"
    }
}
