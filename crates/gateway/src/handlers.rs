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

use std::time::Duration;

use actix_web::{HttpResponse, web};
use clob_engine::OrderEvent;
use clob_types::TradeStatus;

use crate::admission::{self, CancelRequestBody, TradeRequestBody};
use crate::error::GatewayError;
use crate::server::GatewayState;

const CANCEL_POLL_ATTEMPTS: u32 = 10;
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// `POST /trade.do` — validate, persist, enqueue, and acknowledge. The
/// matching loop processes the order asynchronously; submission never
/// waits on it.
pub async fn trade_do(
	state: web::Data<GatewayState>,
	body: web::Json<TradeRequestBody>,
) -> Result<HttpResponse, GatewayError> {
	let admitted = admission::validate_trade_request(&body, &state.symbols)?;
	let order = state
		.order_store
		.create(&admitted.symbol, admitted.side, admitted.kind, admitted.amount)?;
	state.event_sender.put(OrderEvent::New(order.id))?;

	Ok(HttpResponse::Ok().json(serde_json::json!({
		"order_id": order.id,
		"result": true,
	})))
}

/// `POST /cancel_order.do` — enqueue the cancel, then busy-wait up to ~1s
/// (10 polls at 100ms, per §4.6) for a cancellation trade to land.
pub async fn cancel_order_do(
	state: web::Data<GatewayState>,
	body: web::Json<CancelRequestBody>,
) -> Result<HttpResponse, GatewayError> {
	let body = body.into_inner();
	state.order_store.get(body.order_id)?;

	let before = state.trade_store.get(body.order_id)?.len();
	state.event_sender.put(OrderEvent::Cancel(body.order_id))?;

	let observed = wait_for_cancel_ack(state.as_ref(), body.order_id, before).await;

	Ok(HttpResponse::Ok().json(serde_json::json!({
		"order_id": body.order_id,
		"result": observed,
	})))
}

async fn wait_for_cancel_ack(state: &GatewayState, order_id: u64, before_count: usize) -> bool {
	for _ in 0..CANCEL_POLL_ATTEMPTS {
		tokio::time::sleep(CANCEL_POLL_INTERVAL).await;
		if let Ok(trades) = state.trade_store.get(order_id) {
			if trades.len() > before_count {
				if let Some(last) = trades.last() {
					if matches!(last.status, TradeStatus::AllCancel | TradeStatus::LeftCancel) {
						return true;
					}
				}
			}
		}
	}
	false
}

pub async fn health() -> impl actix_web::Responder {
	HttpResponse::Ok().json(serde_json::json!({ "status": "ok", "service": "clob-gateway" }))
}
