//! Binance REST response types.
//!
//! Binance encodes decimals as JSON strings; `rust_decimal` accepts both
//! strings and numbers when deserializing.

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{
    AssetBalance, ImmediateFill, OrderAck, OrderId, OrderSide, OrderState, Symbol, SymbolFilters,
};
use crate::error::ExecutionError;

/// `GET /fapi/v1/ticker/price`.
#[derive(Debug, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: Decimal,
}

/// `GET /fapi/v1/time`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTime {
    pub server_time: i64,
}

/// Order placement and cancellation response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: u64,
    pub symbol: String,
    pub status: String,
    #[serde(default)]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub executed_qty: Decimal,
    /// `"0"` or `"0.00000"` until something fills.
    #[serde(default)]
    pub avg_price: Option<Decimal>,
}

impl OrderResponse {
    fn average_price(&self) -> Option<Decimal> {
        self.avg_price.filter(|price| !price.is_zero())
    }

    #[must_use]
    pub fn into_fill(self) -> ImmediateFill {
        let average_price = self.average_price();
        ImmediateFill {
            order_id: OrderId::from(self.order_id),
            executed_quantity: self.executed_qty,
            average_price,
        }
    }

    #[must_use]
    pub fn into_ack(self) -> OrderAck {
        let average_price = self.average_price();
        OrderAck {
            order_id: OrderId::from(self.order_id),
            status: self.status,
            executed_quantity: self.executed_qty,
            average_price,
        }
    }
}

/// `GET /fapi/v1/exchangeInfo`, reduced to the per-symbol filters.
#[derive(Debug, Deserialize)]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(default)]
    pub filters: Vec<SymbolFilter>,
}

/// One entry of a symbol's `filters` array.
#[derive(Debug, Deserialize)]
#[serde(tag = "filterType")]
pub enum SymbolFilter {
    #[serde(rename = "PRICE_FILTER", rename_all = "camelCase")]
    Price { tick_size: Decimal },
    #[serde(rename = "LOT_SIZE", rename_all = "camelCase")]
    LotSize { step_size: Decimal, min_qty: Decimal },
    #[serde(other)]
    Other,
}

impl SymbolInfo {
    /// Tick and lot rules, when both filters are listed.
    #[must_use]
    pub fn trading_filters(&self) -> Option<SymbolFilters> {
        let tick_size = self.filters.iter().find_map(|filter| match filter {
            SymbolFilter::Price { tick_size } => Some(*tick_size),
            _ => None,
        })?;
        let (step_size, min_qty) = self.filters.iter().find_map(|filter| match filter {
            SymbolFilter::LotSize { step_size, min_qty } => Some((*step_size, *min_qty)),
            _ => None,
        })?;
        Some(SymbolFilters::new(tick_size, step_size, min_qty))
    }
}

/// One element of `GET /fapi/v2/balance`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceEntry {
    pub asset: String,
    pub balance: Decimal,
    pub available_balance: Decimal,
    #[serde(default)]
    pub cross_un_pnl: Decimal,
}

impl From<BalanceEntry> for AssetBalance {
    fn from(entry: BalanceEntry) -> Self {
        Self {
            asset: entry.asset,
            balance: entry.balance,
            available: entry.available_balance,
            unrealized_pnl: entry.cross_un_pnl,
        }
    }
}

/// `GET /fapi/v1/order`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueriedOrder {
    pub order_id: u64,
    pub symbol: String,
    pub status: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub stop_price: Decimal,
    pub orig_qty: Decimal,
    #[serde(default)]
    pub executed_qty: Decimal,
    #[serde(default)]
    pub avg_price: Option<Decimal>,
    #[serde(default)]
    pub update_time: Option<i64>,
}

impl From<QueriedOrder> for OrderState {
    fn from(order: QueriedOrder) -> Self {
        let nonzero = |value: Decimal| (!value.is_zero()).then_some(value);
        Self {
            order_id: OrderId::from(order.order_id),
            symbol: Symbol::new(order.symbol),
            side: order.side,
            order_type: order.order_type,
            status: order.status,
            price: nonzero(order.price),
            stop_price: nonzero(order.stop_price),
            quantity: order.orig_qty,
            executed_quantity: order.executed_qty,
            average_price: order.avg_price.and_then(nonzero),
            updated_at: order.update_time.and_then(DateTime::from_timestamp_millis),
        }
    }
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}

/// Decode a non-2xx response body into an [`ExecutionError`].
#[must_use]
pub fn decode_error(status: u16, body: &str) -> ExecutionError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => ExecutionError::Rejected {
            code: err.code,
            message: err.msg,
        },
        Err(_) => ExecutionError::Transport(format!("HTTP {status}: {}", body.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn market_order_result_decodes_fill() {
        let body = r#"{
            "orderId": 4112391512,
            "symbol": "BTCUSDT",
            "status": "FILLED",
            "clientOrderId": "9f4c2d1e0b7a4c3d8e6f5a4b3c2d1e0f",
            "price": "0.00",
            "avgPrice": "43210.50000",
            "origQty": "0.010",
            "executedQty": "0.010",
            "cumQuote": "432.10500",
            "timeInForce": "GTC",
            "type": "MARKET",
            "side": "BUY",
            "updateTime": 1704067200123
        }"#;

        let fill = serde_json::from_str::<OrderResponse>(body).unwrap().into_fill();
        assert_eq!(fill.order_id, OrderId::from("4112391512"));
        assert_eq!(fill.executed_quantity, dec!(0.010));
        assert_eq!(fill.average_price, Some(dec!(43210.5)));
    }

    #[test]
    fn zero_average_price_means_unfilled() {
        let body = r#"{"orderId": 7, "symbol": "ETHUSDT", "status": "NEW",
                       "avgPrice": "0.00000", "executedQty": "0"}"#;
        let ack = serde_json::from_str::<OrderResponse>(body).unwrap().into_ack();
        assert_eq!(ack.status, "NEW");
        assert_eq!(ack.average_price, None);
        assert!(ack.executed_quantity.is_zero());
    }

    #[test]
    fn error_body_becomes_rejection() {
        let err = decode_error(400, r#"{"code":-2019,"msg":"Margin is insufficient."}"#);
        assert!(matches!(
            err,
            ExecutionError::Rejected { code: -2019, ref message } if message == "Margin is insufficient."
        ));
    }

    #[test]
    fn unparseable_error_body_is_transport_failure() {
        let err = decode_error(502, "<html>Bad Gateway</html>");
        assert!(matches!(err, ExecutionError::Transport(ref m) if m.starts_with("HTTP 502")));
    }

    #[test]
    fn ticker_price_decodes_string_decimal() {
        let ticker: TickerPrice =
            serde_json::from_str(r#"{"symbol":"BTCUSDT","price":"43000.10","time":1}"#).unwrap();
        assert_eq!(ticker.price, dec!(43000.10));
    }

    #[test]
    fn exchange_info_yields_tick_and_lot_rules() {
        let body = r#"{
            "timezone": "UTC",
            "symbols": [{
                "symbol": "BTCUSDT",
                "pricePrecision": 2,
                "quantityPrecision": 3,
                "filters": [
                    {"filterType": "PRICE_FILTER", "minPrice": "261.10", "maxPrice": "809484", "tickSize": "0.10"},
                    {"filterType": "LOT_SIZE", "minQty": "0.001", "maxQty": "1000", "stepSize": "0.001"},
                    {"filterType": "MARKET_LOT_SIZE", "minQty": "0.001", "maxQty": "120", "stepSize": "0.001"},
                    {"filterType": "MIN_NOTIONAL", "notional": "100"}
                ]
            }, {
                "symbol": "NOFILTERS",
                "filters": []
            }]
        }"#;

        let info: ExchangeInfo = serde_json::from_str(body).unwrap();
        let filters = info.symbols[0].trading_filters().unwrap();
        assert_eq!(filters.tick_size(), dec!(0.10));
        assert_eq!(filters.step_size(), dec!(0.001));
        assert_eq!(filters.min_quantity(), dec!(0.001));
        assert!(info.symbols[1].trading_filters().is_none());
    }

    #[test]
    fn balance_entries_decode() {
        let body = r#"[{
            "accountAlias": "SgsR",
            "asset": "USDT",
            "balance": "15000.12345678",
            "crossWalletBalance": "15000.12345678",
            "crossUnPnl": "-12.50000000",
            "availableBalance": "14210.00000000",
            "maxWithdrawAmount": "14210.00000000",
            "marginAvailable": true,
            "updateTime": 1704067200123
        }]"#;

        let entries: Vec<BalanceEntry> = serde_json::from_str(body).unwrap();
        let balance = AssetBalance::from(entries.into_iter().next().unwrap());
        assert_eq!(balance.asset, "USDT");
        assert_eq!(balance.balance, dec!(15000.12345678));
        assert_eq!(balance.available, dec!(14210));
        assert_eq!(balance.unrealized_pnl, dec!(-12.5));
    }

    #[test]
    fn queried_stop_order_decodes_state() {
        let body = r#"{
            "avgPrice": "0.00000",
            "clientOrderId": "9f4c2d1e0b7a4c3d8e6f5a4b3c2d1e0f",
            "cumQuote": "0",
            "executedQty": "0",
            "orderId": 1917641,
            "origQty": "0.010",
            "origType": "STOP",
            "price": "38900.00",
            "reduceOnly": false,
            "side": "SELL",
            "positionSide": "BOTH",
            "status": "NEW",
            "stopPrice": "39000.00",
            "symbol": "BTCUSDT",
            "time": 1704067200000,
            "timeInForce": "GTC",
            "type": "STOP",
            "updateTime": 1704067200123,
            "workingType": "CONTRACT_PRICE"
        }"#;

        let state = OrderState::from(serde_json::from_str::<QueriedOrder>(body).unwrap());
        assert_eq!(state.order_id, OrderId::from("1917641"));
        assert_eq!(state.side, OrderSide::Sell);
        assert_eq!(state.order_type, "STOP");
        assert_eq!(state.price, Some(dec!(38900)));
        assert_eq!(state.stop_price, Some(dec!(39000)));
        assert_eq!(state.average_price, None);
        assert_eq!(state.updated_at.unwrap().timestamp_millis(), 1704067200123);
        assert!(!state.is_final());
    }

    #[test]
    fn queried_market_order_has_no_limit_price() {
        let body = r#"{"orderId": 9, "symbol": "ETHUSDT", "status": "FILLED", "side": "BUY",
                       "type": "MARKET", "price": "0", "stopPrice": "0", "origQty": "1",
                       "executedQty": "1", "avgPrice": "3000.5"}"#;
        let state = OrderState::from(serde_json::from_str::<QueriedOrder>(body).unwrap());
        assert_eq!(state.price, None);
        assert_eq!(state.stop_price, None);
        assert_eq!(state.average_price, Some(dec!(3000.5)));
        assert_eq!(state.updated_at, None);
        assert!(state.is_final());
    }
}
