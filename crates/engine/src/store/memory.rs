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

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use clob_types::{Order, OrderKind, Side, Trade};
use dashmap::DashMap;

use super::{OrderStore, StoreError, TradeStore};

/// In-memory order store, keyed by id. Grounded on the teacher's `DashMap`
/// usage for concurrently-shared state (`orderbook.rs`, `admission.rs`).
#[derive(Default)]
pub struct MemoryOrderStore {
	orders: DashMap<u64, Order>,
	next_id: AtomicU64,
}

impl MemoryOrderStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl OrderStore for MemoryOrderStore {
	fn create(
		&self,
		symbol: &str,
		side: Side,
		kind: OrderKind,
		amount: u64,
	) -> Result<Order, StoreError> {
		let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
		let order = Order::new(id, symbol, side, kind, amount, Utc::now());
		self.orders.insert(id, order.clone());
		Ok(order)
	}

	fn get(&self, id: u64) -> Result<Order, StoreError> {
		self
			.orders
			.get(&id)
			.map(|r| r.clone())
			.ok_or(StoreError::OrderNotFound(id))
	}

	fn save(&self, order: &Order) -> Result<(), StoreError> {
		self.orders.insert(order.id, order.clone());
		Ok(())
	}
}

/// In-memory trade store: append-only buckets keyed by originating order id.
#[derive(Default)]
pub struct MemoryTradeStore {
	trades: DashMap<u64, Vec<Trade>>,
	next_id: AtomicU64,
}

impl MemoryTradeStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl TradeStore for MemoryTradeStore {
	fn next_id(&self) -> u64 {
		self.next_id.fetch_add(1, Ordering::SeqCst) + 1
	}

	fn save(&self, trade: &Trade) -> Result<(), StoreError> {
		self
			.trades
			.entry(trade.order_id)
			.or_default()
			.push(trade.clone());
		Ok(())
	}

	fn get(&self, order_id: u64) -> Result<Vec<Trade>, StoreError> {
		Ok(self
			.trades
			.get(&order_id)
			.map(|r| r.clone())
			.unwrap_or_default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn create_assigns_monotonic_ids() {
		let store = MemoryOrderStore::new();
		let a = store
			.create("WSCN", Side::Buy, OrderKind::Market, 10)
			.unwrap();
		let b = store
			.create("WSCN", Side::Buy, OrderKind::Market, 10)
			.unwrap();
		assert!(b.id > a.id);
	}

	#[test]
	fn get_missing_order_errors() {
		let store = MemoryOrderStore::new();
		assert!(matches!(store.get(999), Err(StoreError::OrderNotFound(999))));
	}

	#[test]
	fn trade_store_appends_in_insertion_order() {
		let orders = MemoryOrderStore::new();
		let order = orders
			.create("WSCN", Side::Buy, OrderKind::Market, 10)
			.unwrap();
		let trades = MemoryTradeStore::new();
		let t1 = Trade::cancel(trades.next_id(), order.id, Side::Buy, None, 10, 10, Utc::now());
		let t2 = Trade::cancel(trades.next_id(), order.id, Side::Buy, None, 5, 10, Utc::now());
		trades.save(&t1).unwrap();
		trades.save(&t2).unwrap();

		let got = trades.get(order.id).unwrap();
		assert_eq!(got.len(), 2);
		assert_eq!(got[0].id, t1.id);
		assert_eq!(got[1].id, t2.id);
	}
}
