// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Protocol-level validation for inbound order and cancel requests. This is
//! the only place order submissions are rejected — once accepted, the
//! engine never has to validate anything again.

use clob_engine::SymbolCatalog;
use clob_types::{CoreError, OrderKind, Price, Side};
use serde::Deserialize;

const MIN_AMOUNT: i64 = 1;
const MAX_AMOUNT: i64 = 999;

#[derive(Debug, Deserialize)]
pub struct TradeRequestBody {
	pub symbol: String,
	#[serde(rename = "type")]
	pub order_type: String,
	pub amount: i64,
	pub price: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequestBody {
	pub symbol: String,
	pub order_id: u64,
}

/// The validated, admitted shape of a trade request: enough to call
/// straight into `OrderStore::create`.
pub struct AdmittedOrder {
	pub symbol: String,
	pub side: Side,
	pub kind: OrderKind,
	pub amount: u64,
}

fn parse_order_type(order_type: &str) -> Result<Side, CoreError> {
	match order_type {
		"buy" | "market_buy" => Ok(Side::Buy),
		"sell" | "market_sell" => Ok(Side::Sell),
		other => Err(CoreError::InvalidRequest(format!(
			"expected type in buy, sell, market_buy, market_sell, got: {other}"
		))),
	}
}

fn is_market(order_type: &str) -> bool {
	matches!(order_type, "market_buy" | "market_sell")
}

/// Validates a `/trade.do` body against §4.6's per-field constraints and
/// resolves it into an `AdmittedOrder` ready to persist.
pub fn validate_trade_request(body: &TradeRequestBody, catalog: &SymbolCatalog) -> Result<AdmittedOrder, CoreError> {
	if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&body.amount) {
		return Err(CoreError::InvalidRequest(format!(
			"expected amount between {MIN_AMOUNT} and {MAX_AMOUNT}, got: {}",
			body.amount
		)));
	}

	if !catalog.contains(&body.symbol) {
		return Err(CoreError::InvalidRequest(format!(
			"unknown symbol, got: {}",
			body.symbol
		)));
	}

	let side = parse_order_type(&body.order_type)?;

	let kind = if is_market(&body.order_type) {
		OrderKind::Market
	} else {
		let raw_price = body.price.ok_or_else(|| {
			CoreError::InvalidRequest(format!("limit order requires a price, got: {}", body.order_type))
		})?;
		let price = Price::from_f64(raw_price).ok_or_else(|| {
			CoreError::InvalidRequest(format!(
				"expected price with at most two decimal digits, got: {raw_price:.3}"
			))
		})?;
		let (min_band, max_band) = catalog.price_range(&body.symbol).map_err(|_| {
			CoreError::InvalidRequest(format!("unknown symbol, got: {}", body.symbol))
		})?;
		if price < min_band || price > max_band {
			return Err(CoreError::InvalidRequest(format!(
				"expected price between {:.1} and {:.1}, got: {raw_price:.2}",
				min_band.as_f64(),
				max_band.as_f64(),
			)));
		}
		OrderKind::Limit { price }
	};

	Ok(AdmittedOrder {
		symbol: body.symbol.clone(),
		side,
		kind,
		amount: body.amount as u64,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn wscn_catalog() -> SymbolCatalog {
		let mut m = HashMap::new();
		m.insert("WSCN".to_string(), 100.0);
		SymbolCatalog::from_reference_prices(m)
	}

	#[test]
	fn rejects_amount_above_maximum() {
		let body = TradeRequestBody {
			symbol: "WSCN".to_string(),
			order_type: "buy".to_string(),
			amount: 1001,
			price: Some(95.0),
		};
		let err = validate_trade_request(&body, &wscn_catalog()).unwrap_err();
		assert!(err.to_string().contains("1001"));
	}

	#[test]
	fn rejects_amount_of_zero() {
		let body = TradeRequestBody {
			symbol: "WSCN".to_string(),
			order_type: "buy".to_string(),
			amount: 0,
			price: Some(95.0),
		};
		let err = validate_trade_request(&body, &wscn_catalog()).unwrap_err();
		assert!(err.to_string().contains('0'));
	}

	#[test]
	fn rejects_price_above_band_with_exact_message_shape() {
		let body = TradeRequestBody {
			symbol: "WSCN".to_string(),
			order_type: "buy".to_string(),
			amount: 10,
			price: Some(110.01),
		};
		let err = validate_trade_request(&body, &wscn_catalog()).unwrap_err();
		assert_eq!(
			err.to_string(),
			"expected price between 90.0 and 110.0, got: 110.01"
		);
	}

	#[test]
	fn rejects_price_with_more_than_two_decimals() {
		let body = TradeRequestBody {
			symbol: "WSCN".to_string(),
			order_type: "buy".to_string(),
			amount: 10,
			price: Some(100.001),
		};
		let err = validate_trade_request(&body, &wscn_catalog()).unwrap_err();
		assert!(err.to_string().contains("100.001"));
	}

	#[test]
	fn rejects_unknown_symbol() {
		let body = TradeRequestBody {
			symbol: "WSCNn".to_string(),
			order_type: "buy".to_string(),
			amount: 10,
			price: Some(95.0),
		};
		let err = validate_trade_request(&body, &wscn_catalog()).unwrap_err();
		assert!(err.to_string().contains("WSCNn"));
	}

	#[test]
	fn market_order_does_not_require_price() {
		let body = TradeRequestBody {
			symbol: "WSCN".to_string(),
			order_type: "market_sell".to_string(),
			amount: 10,
			price: None,
		};
		let admitted = validate_trade_request(&body, &wscn_catalog()).unwrap();
		assert_eq!(admitted.side, Side::Sell);
		assert!(admitted.kind.is_market());
	}
}
