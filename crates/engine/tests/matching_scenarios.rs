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

//! Black-box scenarios driven through the public event queue, exercising the
//! matching loop exactly the way a front-end process would: submit orders to
//! the store, enqueue the event, poll the trade store for the outcome.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clob_engine::logsink::MemoryLogSink;
use clob_engine::store::{MemoryOrderStore, MemoryTradeStore, OrderStore, TradeStore};
use clob_engine::{EngineDeps, EventQueue, MatchingEngine, OrderEvent, SymbolCatalog};
use clob_types::{OrderKind, Price, Side, TradeStatus};

struct Harness {
	order_store: Arc<MemoryOrderStore>,
	trade_store: Arc<MemoryTradeStore>,
	sender: clob_engine::EventSender,
	_engine: MatchingEngine,
}

impl Harness {
	fn new() -> Self {
		let order_store = Arc::new(MemoryOrderStore::new());
		let trade_store = Arc::new(MemoryTradeStore::new());
		let sink = Arc::new(MemoryLogSink::new());
		let mut symbols = HashMap::new();
		symbols.insert("WSCN".to_string(), 100.0);
		let deps = EngineDeps {
			order_store: order_store.clone(),
			trade_store: trade_store.clone(),
			symbols: SymbolCatalog::from_reference_prices(symbols),
			trade_log: sink.clone(),
			order_log: sink.clone(),
			depth_log: sink,
		};
		let (sender, receiver) = EventQueue::new();
		let engine = MatchingEngine::start(receiver, Duration::from_millis(50), deps);
		Self {
			order_store,
			trade_store,
			sender,
			_engine: engine,
		}
	}

	fn submit(&self, side: Side, kind: OrderKind, amount: u64) -> u64 {
		let order = self.order_store.create("WSCN", side, kind, amount).unwrap();
		self.sender.put(OrderEvent::New(order.id)).unwrap();
		order.id
	}

	fn cancel(&self, id: u64) {
		self.sender.put(OrderEvent::Cancel(id)).unwrap();
	}

	fn wait_for_trades(&self, order_id: u64, count: usize) -> Vec<clob_types::Trade> {
		let deadline = Instant::now() + Duration::from_secs(2);
		loop {
			let trades = self.trade_store.get(order_id).unwrap();
			if trades.len() >= count || Instant::now() > deadline {
				return trades;
			}
			std::thread::sleep(Duration::from_millis(10));
		}
	}
}

fn limit(price_cents: i64) -> OrderKind {
	OrderKind::Limit { price: Price(price_cents) }
}

#[test]
fn scenario_a_price_time_priority() {
	let h = Harness::new();
	let o1 = h.submit(Side::Sell, limit(10000), 10);
	let o2 = h.submit(Side::Buy, limit(9000), 10);
	let o3 = h.submit(Side::Sell, limit(9500), 20);
	let o4 = h.submit(Side::Buy, limit(9600), 10);
	let _o5 = h.submit(Side::Buy, limit(10000), 10);

	let o3_trades = h.wait_for_trades(o3, 2);
	assert_eq!(o3_trades.len(), 2);
	assert_eq!(o3_trades[0].status, TradeStatus::PartialDone);
	assert_eq!(o3_trades[0].amount, 10);
	assert_eq!(o3_trades[1].status, TradeStatus::AllDone);
	assert_eq!(o3_trades[1].amount, 10);
	assert!(o3_trades.iter().all(|t| t.price == Some(Price(9500))));

	let o4_trades = h.wait_for_trades(o4, 1);
	assert_eq!(o4_trades.len(), 1);
	assert_eq!(o4_trades[0].status, TradeStatus::AllDone);
	assert_eq!(o4_trades[0].price, Some(Price(9500)));

	assert!(h.trade_store.get(o1).unwrap().is_empty());
	assert!(h.trade_store.get(o2).unwrap().is_empty());
}

#[test]
fn scenario_b_cancel_after_partial_fill() {
	let h = Harness::new();
	let o1 = h.submit(Side::Sell, limit(10000), 10);
	let o2 = h.submit(Side::Buy, limit(9000), 10);
	let _o3 = h.submit(Side::Sell, limit(9500), 20);
	let _o4 = h.submit(Side::Buy, limit(9600), 10);

	h.cancel(o1);
	let o1_trades = h.wait_for_trades(o1, 1);
	assert_eq!(o1_trades.len(), 1);
	assert_eq!(o1_trades[0].status, TradeStatus::AllCancel);

	// o2 (buy @90) never crosses the book above — give it a crossing seller.
	let crossing_sell = h.submit(Side::Sell, limit(9000), 4);
	h.wait_for_trades(crossing_sell, 1);

	let o2_trades_before_cancel = h.trade_store.get(o2).unwrap();
	assert_eq!(o2_trades_before_cancel.len(), 1);
	assert_eq!(o2_trades_before_cancel[0].status, TradeStatus::PartialDone);

	h.cancel(o2);
	let o2_trades = h.wait_for_trades(o2, 2);
	assert_eq!(o2_trades.len(), 2);
	assert_eq!(o2_trades[0].status, TradeStatus::PartialDone);
	assert_eq!(o2_trades[1].status, TradeStatus::LeftCancel);
	assert_eq!(o2_trades[1].amount, 6);
}

#[test]
fn scenario_c_market_sell_dominance() {
	let h = Harness::new();
	let low = h.submit(Side::Buy, limit(10000), 10);
	let high = h.submit(Side::Buy, limit(10100), 10);
	let market_sell = h.submit(Side::Sell, OrderKind::Market, 15);

	h.wait_for_trades(market_sell, 2);
	let high_trades = h.trade_store.get(high).unwrap();
	assert_eq!(high_trades.len(), 1);
	assert_eq!(high_trades[0].price, Some(Price(10100)));

	let low_trades = h.wait_for_trades(low, 1);
	assert_eq!(low_trades[0].amount, 5);
	assert_eq!(low_trades[0].status, TradeStatus::PartialDone);
}

#[test]
fn scenario_d_double_market_falls_back_to_reference_price() {
	let h = Harness::new();
	let buy = h.submit(Side::Buy, OrderKind::Market, 10);
	let _sell = h.submit(Side::Sell, OrderKind::Market, 10);

	let buy_trades = h.wait_for_trades(buy, 1);
	assert_eq!(buy_trades.len(), 1);
	assert_eq!(buy_trades[0].price, Some(Price(10000)));
}

#[test]
fn invariant_no_crossable_pair_survives_quiescence() {
	let h = Harness::new();
	h.submit(Side::Buy, limit(9500), 10);
	h.submit(Side::Sell, limit(9600), 10);
	// Both rest — band-valid, non-crossing. Give the loop time to settle,
	// then confirm neither produced a trade (no stray cross).
	std::thread::sleep(Duration::from_millis(200));
	let a = h.trade_store.get(1).unwrap();
	let b = h.trade_store.get(2).unwrap();
	assert!(a.is_empty() && b.is_empty());
}
