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

//! The matching core: a dedicated worker thread owns every symbol's dual
//! priority queues, the unfinished-order map and the last-traded-price map.
//! No mutex guards this state — only this thread ever touches it. The
//! outside world reaches it exclusively through the event queue and the
//! shared order/trade stores.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Utc;
use clob_types::{Order, OrderKind, Price, Side, Trade};
use thiserror::Error;

use crate::logsink::{DepthLogSink, DepthRow, OrderLogSink, TradeLogSink};
use crate::orderbook::OrderBook;
use crate::queue::{EventReceiver, OrderEvent, Polled, QueueError};
use crate::store::{OrderStore, StoreError, TradeStore};
use crate::symbol::{SymbolCatalog, SymbolError};

const DEPTH_SNAPSHOT_ROWS: usize = 20;

#[derive(Debug, Error)]
pub enum EngineError {
	#[error(transparent)]
	Store(#[from] StoreError),
	#[error(transparent)]
	Symbol(#[from] SymbolError),
}

/// All matching state for every symbol. Not `Sync` by design — it is owned
/// entirely by the matching-loop thread.
#[derive(Default)]
pub struct MatchingEngineState {
	books: HashMap<String, OrderBook>,
	unfinished: HashMap<u64, Order>,
	last_traded: HashMap<String, Price>,
}

impl MatchingEngineState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn unfinished_order(&self, id: u64) -> Option<&Order> {
		self.unfinished.get(&id)
	}

	pub fn last_traded_price(&self, symbol: &str) -> Option<Price> {
		self.last_traded.get(symbol).copied()
	}
}

/// Dependencies the matching loop needs from the outside world, gathered so
/// `MatchingEngine::start` doesn't take eight separate arguments.
pub struct EngineDeps {
	pub order_store: Arc<dyn OrderStore>,
	pub trade_store: Arc<dyn TradeStore>,
	pub symbols: SymbolCatalog,
	pub trade_log: Arc<dyn TradeLogSink>,
	pub order_log: Arc<dyn OrderLogSink>,
	pub depth_log: Arc<dyn DepthLogSink>,
}

/// Handle to the running matching-loop thread. Dropping it signals shutdown
/// and joins the worker — mirrors the teacher's
/// `Arc<AtomicBool>` + `Drop`-impl graceful-shutdown pattern.
pub struct MatchingEngine {
	shutdown: Arc<AtomicBool>,
	handle: Option<JoinHandle<()>>,
}

impl MatchingEngine {
	pub fn start(receiver: EventReceiver, timeout: Duration, deps: EngineDeps) -> Self {
		let shutdown = Arc::new(AtomicBool::new(false));
		let worker_shutdown = shutdown.clone();
		let handle = thread::Builder::new()
			.name("matching-loop".to_string())
			.spawn(move || run_loop(receiver, timeout, deps, worker_shutdown))
			.expect("failed to spawn matching-loop thread");

		Self {
			shutdown,
			handle: Some(handle),
		}
	}
}

impl Drop for MatchingEngine {
	fn drop(&mut self) {
		self.shutdown.store(true, Ordering::SeqCst);
		if let Some(handle) = self.handle.take() {
			let _ = handle.join();
		}
	}
}

fn run_loop(receiver: EventReceiver, timeout: Duration, deps: EngineDeps, shutdown: Arc<AtomicBool>) {
	let mut state = MatchingEngineState::new();

	while !shutdown.load(Ordering::SeqCst) {
		match receiver.get(timeout) {
			Ok(Polled::Event(OrderEvent::New(id))) => {
				if let Err(e) = handle_new(&mut state, id, &deps) {
					tracing::warn!(order_id = id, error = %e, "failed to process new order event");
				}
			}
			Ok(Polled::Event(OrderEvent::Cancel(id))) => {
				if let Err(e) = handle_cancel(&mut state, id, &deps) {
					tracing::warn!(order_id = id, error = %e, "failed to process cancel event");
				}
			}
			Ok(Polled::Timeout) => {}
			Err(QueueError::Disconnected) => break,
		}
		write_depth_snapshot(&state, deps.depth_log.as_ref());
	}
}

/// §4.5.1 — fetch the persisted order, add it to the unfinished-order map
/// and its book, then drive the match loop for that symbol.
fn handle_new(state: &mut MatchingEngineState, id: u64, deps: &EngineDeps) -> Result<(), EngineError> {
	let order = match deps.order_store.get(id) {
		Ok(order) => order,
		Err(StoreError::OrderNotFound(_)) => {
			tracing::warn!(order_id = id, "new order event for unknown order id");
			return Ok(());
		}
		Err(e) => return Err(e.into()),
	};

	state.unfinished.insert(id, order.clone());
	let book = state.books.entry(order.symbol.clone()).or_default();
	match order.side {
		Side::Buy => book.push_buy(&order),
		Side::Sell => book.push_sell(&order),
	}

	run_match_loop(state, &order.symbol, deps)
}

/// §4.5.2 — repeatedly pop the best live buy/sell pair and cross them until
/// no further match is possible.
fn run_match_loop(state: &mut MatchingEngineState, symbol: &str, deps: &EngineDeps) -> Result<(), EngineError> {
	let (min_band, max_band) = deps.symbols.price_range(symbol)?;
	let reference = deps.symbols.reference_price(symbol)?;

	loop {
		let book = state.books.entry(symbol.to_string()).or_default();
		let buy_id = match book.pop_buy_live(&state.unfinished) {
			Some(id) => id,
			None => break,
		};
		let sell_id = match book.pop_sell_live(&state.unfinished) {
			Some(id) => id,
			None => {
				let buy_order = state.unfinished.get(&buy_id).expect("popped id must be live");
				book.push_buy(buy_order);
				break;
			}
		};

		let buy = state.unfinished.get(&buy_id).expect("popped id must be live").clone();
		let sell = state.unfinished.get(&sell_id).expect("popped id must be live").clone();

		if buy.effective_price() < sell.effective_price() {
			let book = state.books.entry(symbol.to_string()).or_default();
			book.push_buy(&buy);
			book.push_sell(&sell);
			break;
		}

		let fill_amount = buy.remaining.min(sell.remaining);
		let last_traded = state.last_traded.get(symbol).copied();
		let trade_price = select_trade_price(&buy, &sell, min_band, max_band, reference, last_traded);
		state.last_traded.insert(symbol.to_string(), trade_price);

		let now = Utc::now();
		deps.trade_log.log_fill(now, trade_price, fill_amount);

		apply_fill_to_side(state, deps, &buy, Side::Buy, trade_price, fill_amount, now)?;
		apply_fill_to_side(state, deps, &sell, Side::Sell, trade_price, fill_amount, now)?;
	}

	Ok(())
}

#[allow(clippy::too_many_arguments)]
fn apply_fill_to_side(
	state: &mut MatchingEngineState,
	deps: &EngineDeps,
	order: &Order,
	side: Side,
	trade_price: Price,
	fill_amount: u64,
	now: chrono::DateTime<Utc>,
) -> Result<(), EngineError> {
	let pre_fill_remaining = order.remaining;
	let trade_id = deps.trade_store.next_id();
	let trade = Trade::fill(trade_id, order.id, side, trade_price, fill_amount, pre_fill_remaining, now);
	deps.trade_store.save(&trade)?;
	deps
		.order_log
		.log_order_event(now, order.id, side, Some(trade_price), fill_amount, trade.status);

	let mut updated = order.clone();
	let fully_filled = updated.apply_fill(fill_amount);
	if fully_filled {
		state.unfinished.remove(&order.id);
	} else {
		state.unfinished.insert(order.id, updated.clone());
		let book = state.books.entry(order.symbol.clone()).or_default();
		match side {
			Side::Buy => book.push_buy(&updated),
			Side::Sell => book.push_sell(&updated),
		}
	}
	Ok(())
}

/// §4.5.4 — seller's limit price if within band, else buyer's limit price if
/// within band, else the last-traded price, falling back to the symbol's
/// reference price.
fn select_trade_price(
	buy: &Order,
	sell: &Order,
	min_band: Price,
	max_band: Price,
	reference: Price,
	last_traded: Option<Price>,
) -> Price {
	if let OrderKind::Limit { price } = sell.kind {
		if price >= min_band {
			return price;
		}
	}
	if let OrderKind::Limit { price } = buy.kind {
		if price <= max_band {
			return price;
		}
	}
	last_traded.unwrap_or(reference)
}

/// §4.5.3 — remove from the unfinished-order map (the book entry is left to
/// be lazily discarded) and emit a cancel trade. A cancel for an
/// already-finished order is a silent no-op.
fn handle_cancel(state: &mut MatchingEngineState, id: u64, deps: &EngineDeps) -> Result<(), EngineError> {
	let order = match state.unfinished.remove(&id) {
		Some(order) => order,
		None => {
			tracing::info!(order_id = id, "cancel for already-finished order");
			return Ok(());
		}
	};

	let original = deps.order_store.get(id)?;
	let now = Utc::now();
	let trade_id = deps.trade_store.next_id();
	let trade = Trade::cancel(
		trade_id,
		id,
		order.side,
		order.kind.price(),
		order.remaining,
		original.amount,
		now,
	);
	deps.trade_store.save(&trade)?;
	deps
		.order_log
		.log_order_event(now, id, order.side, order.kind.price(), trade.amount, trade.status);
	Ok(())
}

/// §4.5.5 — best-effort, non-blocking depth snapshot over a copy of the
/// live queues; failures are swallowed by the sink itself.
fn write_depth_snapshot(state: &MatchingEngineState, depth_log: &dyn DepthLogSink) {
	for (symbol, book) in state.books.iter() {
		if book.is_empty(&state.unfinished) {
			continue;
		}
		let buys = book
			.top_buy_ids(&state.unfinished, DEPTH_SNAPSHOT_ROWS)
			.into_iter()
			.filter_map(|id| state.unfinished.get(&id))
			.map(|o| depth_row(o))
			.collect::<Vec<_>>();
		let sells = book
			.top_sell_ids(&state.unfinished, DEPTH_SNAPSHOT_ROWS)
			.into_iter()
			.filter_map(|id| state.unfinished.get(&id))
			.map(|o| depth_row(o))
			.collect::<Vec<_>>();
		depth_log.log_depth(symbol, &buys, &sells);
	}
}

fn depth_row(order: &Order) -> DepthRow {
	DepthRow {
		id: order.id,
		timestamp: order.timestamp,
		symbol: order.symbol.clone(),
		side: order.side,
		price: order.kind.price(),
		amount: order.remaining,
	}
}
