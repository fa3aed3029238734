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

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clob_engine::{EventSender, OrderStore, SymbolCatalog, TradeStore};

use crate::error::json_error_handler;
use crate::routes::configure_routes;

/// Everything a request handler needs: the shared stores, the symbol
/// catalog, and the producer half of the event queue. Cloned cheaply
/// (everything inside is already an `Arc` or a crossbeam `Sender` clone).
#[derive(Clone)]
pub struct GatewayState {
	pub order_store: Arc<dyn OrderStore>,
	pub trade_store: Arc<dyn TradeStore>,
	pub symbols: Arc<SymbolCatalog>,
	pub event_sender: EventSender,
}

pub struct GatewayServer {
	state: GatewayState,
	bind_addr: String,
}

impl GatewayServer {
	pub fn new(state: GatewayState, bind_addr: String) -> Self {
		Self { state, bind_addr }
	}

	pub async fn serve(self) -> std::io::Result<()> {
		let state = self.state;
		tracing::info!(bind_addr = %self.bind_addr, "gateway listening");
		HttpServer::new(move || {
			App::new()
				.app_data(web::Data::new(state.clone()))
				.app_data(web::JsonConfig::default().error_handler(json_error_handler))
				.configure(configure_routes)
		})
		.bind(&self.bind_addr)?
		.run()
		.await
	}
}
