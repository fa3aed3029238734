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

//! Continuous-auction limit order matching engine.
//!
//! A dedicated worker thread owns the per-symbol order books and the
//! unfinished-order map; everything else reaches it only through the event
//! queue and the shared order/trade stores. This crate is a library — the
//! gateway binary constructs the queue and stores, spawns the matching
//! loop, and drives its own HTTP surface on top.

pub mod config;
pub mod engine;
pub mod logsink;
pub mod orderbook;
pub mod queue;
pub mod store;
pub mod symbol;

pub use config::{EngineConfig, StoreBackend};
pub use engine::{EngineDeps, EngineError, MatchingEngine, MatchingEngineState};
pub use logsink::{
	DepthLogSink, DepthRow, FileDepthLogSink, FileOrderLogSink, FileTradeLogSink, OrderLogSink,
	TradeLogSink,
};
pub use orderbook::OrderBook;
pub use queue::{EventQueue, EventReceiver, EventSender, OrderEvent, Polled, QueueError};
pub use store::{MemoryOrderStore, MemoryTradeStore, OrderStore, SqliteOrderStore, SqliteTradeStore, StoreError, TradeStore};
pub use symbol::{SymbolCatalog, SymbolError};
