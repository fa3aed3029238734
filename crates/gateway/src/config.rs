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

use serde::{Deserialize, Serialize};

/// Default log level (can be overridden by `RUST_LOG`).
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Log subdirectory component name.
pub const LOG_COMPONENT_NAME: &str = "gateway";
pub const DEFAULT_LOG_TO_CONSOLE: bool = false;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Gateway service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
	/// HTTP server bind address.
	pub bind_addr: String,
	/// Root directory the gateway's own logs are written under, distinct
	/// from the engine's trade/order/depth log directory.
	pub log_dir: Option<String>,
}

impl Default for GatewayConfig {
	fn default() -> Self {
		Self {
			bind_addr: DEFAULT_BIND_ADDR.to_string(),
			log_dir: None,
		}
	}
}

impl GatewayConfig {
	/// Load configuration from environment variables (prefix `GATEWAY_`).
	pub fn from_env() -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::Config::try_from(&Self::default())?)
			.add_source(config::Environment::with_prefix("GATEWAY"))
			.build()?;

		cfg.try_deserialize()
	}

	/// Load configuration from a file, overlaid with environment variables.
	pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::Config::try_from(&Self::default())?)
			.add_source(config::File::with_name(path))
			.add_source(config::Environment::with_prefix("GATEWAY"))
			.build()?;

		cfg.try_deserialize()
	}
}
