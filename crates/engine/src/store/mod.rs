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

pub mod memory;
pub mod sqlite;

use clob_types::{Order, OrderKind, Side, Trade};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("order not found: {0}")]
	OrderNotFound(u64),
	#[error("store io error: {0}")]
	Io(String),
}

/// Append-or-overwrite by id, lookup by id. `create` must return the
/// persisted, id-bearing order before any event referencing that id is
/// enqueued.
pub trait OrderStore: Send + Sync {
	fn create(
		&self,
		symbol: &str,
		side: Side,
		kind: OrderKind,
		amount: u64,
	) -> Result<Order, StoreError>;

	fn get(&self, id: u64) -> Result<Order, StoreError>;

	/// Upsert; used by tests, not on the hot path.
	fn save(&self, order: &Order) -> Result<(), StoreError>;
}

/// Append-only, keyed by originating order id.
pub trait TradeStore: Send + Sync {
	/// The durable variant assigns trade ids from its own monotonic counter;
	/// the in-memory variant does the same, independently.
	fn next_id(&self) -> u64;

	fn save(&self, trade: &Trade) -> Result<(), StoreError>;

	/// Ordered sequence of trades for that order, in insertion order,
	/// possibly empty.
	fn get(&self, order_id: u64) -> Result<Vec<Trade>, StoreError>;
}

pub use memory::{MemoryOrderStore, MemoryTradeStore};
pub use sqlite::{SqliteOrderStore, SqliteTradeStore};
