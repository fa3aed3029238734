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

//! Order submission front-end and matching engine host.
//!
//! This is the one OS process the system runs as: it owns the event
//! queue, the order/trade stores, and the matching loop's worker thread,
//! and drives the HTTP surface on top of the same stores.

mod admission;
mod config;
mod error;
mod handlers;
mod logging;
mod routes;
mod server;

use std::path::Path;
use std::sync::Arc;

use clob_engine::{
	EngineConfig, EngineDeps, EventQueue, FileDepthLogSink, FileOrderLogSink, FileTradeLogSink,
	MatchingEngine, MemoryOrderStore, MemoryTradeStore, OrderStore, SqliteOrderStore,
	SqliteTradeStore, StoreBackend, TradeStore,
};
use config::GatewayConfig;
use server::{GatewayServer, GatewayState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	logging::init_logging()?;

	let engine_config = EngineConfig::from_env().unwrap_or_default();
	let gateway_config = GatewayConfig::from_env().unwrap_or_default();

	std::fs::create_dir_all(&engine_config.log_dir)?;
	let log_dir = Path::new(&engine_config.log_dir);

	let (order_store, trade_store): (Arc<dyn OrderStore>, Arc<dyn TradeStore>) = match engine_config.store_backend {
		StoreBackend::Memory => (Arc::new(MemoryOrderStore::new()), Arc::new(MemoryTradeStore::new())),
		StoreBackend::Sqlite => {
			let path = engine_config
				.sqlite_path
				.clone()
				.unwrap_or_else(|| "clob.sqlite3".to_string());
			(
				Arc::new(SqliteOrderStore::open(&path)?),
				Arc::new(SqliteTradeStore::open(&path)?),
			)
		}
	};

	let symbols = engine_config.symbol_catalog();
	let deps = EngineDeps {
		order_store: order_store.clone(),
		trade_store: trade_store.clone(),
		symbols: symbols.clone(),
		trade_log: Arc::new(FileTradeLogSink::new(log_dir.join("trade.log"))),
		order_log: Arc::new(FileOrderLogSink::new(log_dir.join("order.log"))),
		depth_log: Arc::new(FileDepthLogSink::new(log_dir.join("depth.log"))),
	};

	let (event_sender, event_receiver) = EventQueue::new();
	let engine = MatchingEngine::start(event_receiver, engine_config.event_timeout(), deps);

	let state = GatewayState {
		order_store,
		trade_store,
		symbols: Arc::new(symbols),
		event_sender,
	};

	let server = GatewayServer::new(state, gateway_config.bind_addr.clone());
	server.serve().await?;

	drop(engine);
	Ok(())
}
