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

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
	Buy,
	Sell,
}

impl fmt::Display for Side {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Side::Buy => write!(f, "buy"),
			Side::Sell => write!(f, "sell"),
		}
	}
}

/// A price expressed as a fixed-point integer of cents. Never a float: the
/// two-decimal-digit submission rule is enforced exactly by round-tripping
/// through this representation rather than comparing floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(pub i64);

impl Price {
	/// Converts a decimal price (e.g. from a JSON body) to cents, returning
	/// `None` if the value carries more than two fractional digits.
	pub fn from_f64(value: f64) -> Option<Self> {
		if !value.is_finite() {
			return None;
		}
		let cents = value * 100.0;
		let rounded = cents.round();
		if (cents - rounded).abs() > 1e-6 {
			return None;
		}
		Some(Price(rounded as i64))
	}

	pub fn as_f64(&self) -> f64 {
		self.0 as f64 / 100.0
	}
}

impl fmt::Display for Price {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:.2}", self.as_f64())
	}
}

/// Whether an order carries an explicit price or executes at whatever
/// opposite-side price is available. Modeled as a tagged variant rather than
/// a sentinel price field — see `Order::effective_price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderKind {
	Limit { price: Price },
	Market,
}

impl OrderKind {
	pub fn price(&self) -> Option<Price> {
		match self {
			OrderKind::Limit { price } => Some(*price),
			OrderKind::Market => None,
		}
	}

	pub fn is_market(&self) -> bool {
		matches!(self, OrderKind::Market)
	}
}

/// A total-ordered effective price for priority-queue comparison. Market
/// orders are never stored with sentinel integers in `Order` itself; this
/// value is computed on demand from `(side, kind)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EffectivePrice {
	NegInf,
	Cents(i64),
	PosInf,
}

/// A trading intent. Uniquely identified by `id` across its entire lifetime;
/// the order store retains the original, unmutated record, while the
/// engine's unfinished-order map holds the current (possibly reduced) copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
	pub id: u64,
	pub symbol: String,
	pub side: Side,
	pub kind: OrderKind,
	pub amount: u64,
	pub remaining: u64,
	pub timestamp: DateTime<Utc>,
}

impl Order {
	pub fn new(
		id: u64,
		symbol: impl Into<String>,
		side: Side,
		kind: OrderKind,
		amount: u64,
		timestamp: DateTime<Utc>,
	) -> Self {
		Self {
			id,
			symbol: symbol.into(),
			side,
			kind,
			amount,
			remaining: amount,
			timestamp,
		}
	}

	/// The ordering key used by the priority queues: `+∞` for a market buy,
	/// `−∞` for a market sell, the limit price otherwise.
	pub fn effective_price(&self) -> EffectivePrice {
		match (self.side, self.kind) {
			(Side::Buy, OrderKind::Market) => EffectivePrice::PosInf,
			(Side::Sell, OrderKind::Market) => EffectivePrice::NegInf,
			(_, OrderKind::Limit { price }) => EffectivePrice::Cents(price.0),
		}
	}

	/// Reduces the resting amount by a fill, returning `true` if the order is
	/// now fully consumed. Panics if `amount` exceeds the remaining amount —
	/// that would indicate a matching-loop bug, not a recoverable condition.
	pub fn apply_fill(&mut self, amount: u64) -> bool {
		assert!(
			amount <= self.remaining,
			"fill of {amount} exceeds remaining {}",
			self.remaining
		);
		self.remaining -= amount;
		self.remaining == 0
	}
}

/// The outcome of a fill or a cancel against a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeStatus {
	/// A remaining amount > 0 is still open after this fill.
	PartialDone,
	/// The originating order was fully consumed by this fill.
	AllDone,
	/// The order had partially filled before cancel; this record closes the
	/// residual.
	LeftCancel,
	/// The order's remaining amount equals its original amount — it had
	/// never partially filled before cancel.
	AllCancel,
}

impl fmt::Display for TradeStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			TradeStatus::PartialDone => "partial_done",
			TradeStatus::AllDone => "all_done",
			TradeStatus::LeftCancel => "left_cancel",
			TradeStatus::AllCancel => "all_cancel",
		};
		write!(f, "{s}")
	}
}

/// An execution (or cancellation) record. Two are emitted per match: one for
/// the buyer's order, one for the seller's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
	pub id: u64,
	pub order_id: u64,
	pub order_side: Side,
	/// `None` only for the cancellation of a market order that never traded.
	pub price: Option<Price>,
	pub amount: u64,
	pub status: TradeStatus,
	pub timestamp: DateTime<Utc>,
}

impl Trade {
	/// Builds the fill-side trade record for one leg of a match.
	///
	/// `pre_fill_remaining` is that order's remaining amount immediately
	/// before this fill; the status is `all_done` when the fill consumes it
	/// exactly, `partial_done` otherwise.
	pub fn fill(
		id: u64,
		order_id: u64,
		order_side: Side,
		price: Price,
		amount: u64,
		pre_fill_remaining: u64,
		timestamp: DateTime<Utc>,
	) -> Self {
		let status = if pre_fill_remaining == amount {
			TradeStatus::AllDone
		} else {
			TradeStatus::PartialDone
		};
		Self {
			id,
			order_id,
			order_side,
			price: Some(price),
			amount,
			status,
			timestamp,
		}
	}

	/// Builds the cancellation trade record. `residual_remaining` is the
	/// order's remaining amount at the moment of cancel; `original_amount` is
	/// the order's amount as persisted in the order store.
	pub fn cancel(
		id: u64,
		order_id: u64,
		order_side: Side,
		price: Option<Price>,
		residual_remaining: u64,
		original_amount: u64,
		timestamp: DateTime<Utc>,
	) -> Self {
		let status = if residual_remaining == original_amount {
			TradeStatus::AllCancel
		} else {
			TradeStatus::LeftCancel
		};
		Self {
			id,
			order_id,
			order_side,
			price,
			amount: residual_remaining,
			status,
			timestamp,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn price_rejects_more_than_two_decimals() {
		assert!(Price::from_f64(100.001).is_none());
		assert_eq!(Price::from_f64(110.01), Some(Price(11001)));
	}

	#[test]
	fn effective_price_dominates_at_extremes() {
		let ts = Utc::now();
		let buy_market = Order::new(1, "WSCN", Side::Buy, OrderKind::Market, 10, ts);
		let sell_market = Order::new(2, "WSCN", Side::Sell, OrderKind::Market, 10, ts);
		let buy_limit = Order::new(
			3,
			"WSCN",
			Side::Buy,
			OrderKind::Limit {
				price: Price(10000),
			},
			10,
			ts,
		);
		assert!(buy_market.effective_price() > buy_limit.effective_price());
		assert!(sell_market.effective_price() < EffectivePrice::Cents(0));
	}

	#[test]
	fn fill_status_depends_on_pre_fill_remaining() {
		let ts = Utc::now();
		let t = Trade::fill(1, 10, Side::Buy, Price(10000), 5, 5, ts);
		assert_eq!(t.status, TradeStatus::AllDone);
		let t2 = Trade::fill(2, 10, Side::Buy, Price(10000), 5, 8, ts);
		assert_eq!(t2.status, TradeStatus::PartialDone);
	}

	#[test]
	fn cancel_status_depends_on_prior_fills() {
		let ts = Utc::now();
		let untouched = Trade::cancel(1, 10, Side::Buy, Some(Price(10000)), 10, 10, ts);
		assert_eq!(untouched.status, TradeStatus::AllCancel);
		let partially_filled = Trade::cancel(2, 10, Side::Buy, Some(Price(10000)), 4, 10, ts);
		assert_eq!(partially_filled.status, TradeStatus::LeftCancel);
	}
}
