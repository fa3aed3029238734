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

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::symbol::SymbolCatalog;

/// Backing store selection for the order/trade stores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
	Memory,
	Sqlite,
}

/// Matching engine configuration. Everything the spec calls injectable —
/// the symbol catalog, the event-queue timeout, and the log file paths —
/// lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
	/// Static symbol -> reference price catalog.
	pub symbols: HashMap<String, f64>,
	/// `event_queue.get` timeout in milliseconds; drives depth-snapshot cadence.
	pub event_timeout_ms: u64,
	/// Directory the three log sinks append to.
	pub log_dir: String,
	/// In-memory or SQLite-backed order/trade stores.
	pub store_backend: StoreBackend,
	/// Path to the SQLite database file, when `store_backend` is `sqlite`.
	pub sqlite_path: Option<String>,
}

impl Default for EngineConfig {
	fn default() -> Self {
		let mut symbols = HashMap::new();
		symbols.insert("WSCN".to_string(), 100.0);
		Self {
			symbols,
			event_timeout_ms: 1_000,
			log_dir: "logs/engine".to_string(),
			store_backend: StoreBackend::Memory,
			sqlite_path: None,
		}
	}
}

impl EngineConfig {
	pub fn event_timeout(&self) -> Duration {
		Duration::from_millis(self.event_timeout_ms)
	}

	pub fn symbol_catalog(&self) -> SymbolCatalog {
		SymbolCatalog::from_reference_prices(self.symbols.clone())
	}

	/// Load configuration from environment variables (prefix `ENGINE_`).
	pub fn from_env() -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::Config::try_from(&Self::default())?)
			.add_source(config::Environment::with_prefix("ENGINE").separator("__"))
			.build()?;

		cfg.try_deserialize()
	}

	/// Load configuration from a file, overlaid with environment variables.
	pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::Config::try_from(&Self::default())?)
			.add_source(config::File::with_name(path))
			.add_source(config::Environment::with_prefix("ENGINE").separator("__"))
			.build()?;

		cfg.try_deserialize()
	}
}
