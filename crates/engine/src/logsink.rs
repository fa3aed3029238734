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

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use clob_types::{Price, Side, TradeStatus};

/// One resting order as it appears in a depth-snapshot row.
#[derive(Debug, Clone)]
pub struct DepthRow {
	pub id: u64,
	pub timestamp: DateTime<Utc>,
	pub symbol: String,
	pub side: Side,
	pub price: Option<Price>,
	pub amount: u64,
}

fn format_price(price: Option<Price>) -> String {
	match price {
		Some(p) => p.to_string(),
		None => "market".to_string(),
	}
}

/// `trade.log`: one line per fill, `<ISO timestamp> <price> <amount>`.
pub trait TradeLogSink: Send + Sync {
	fn log_fill(&self, timestamp: DateTime<Utc>, price: Price, amount: u64);
}

/// `order.log`: one line per side per fill, and one line per cancel,
/// `<ISO timestamp> <order_id> <side> <price> <amount> <status>`.
pub trait OrderLogSink: Send + Sync {
	#[allow(clippy::too_many_arguments)]
	fn log_order_event(
		&self,
		timestamp: DateTime<Utc>,
		order_id: u64,
		side: Side,
		price: Option<Price>,
		amount: u64,
		status: TradeStatus,
	);
}

/// `depth.log`: per loop iteration, a banner plus up to 20 rows per side per
/// symbol with any resting orders, followed by a blank line. Best-effort —
/// failures are logged but never propagate.
pub trait DepthLogSink: Send + Sync {
	fn log_depth(&self, symbol: &str, buys: &[DepthRow], sells: &[DepthRow]);
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
	let mut file = OpenOptions::new().create(true).append(true).open(path)?;
	writeln!(file, "{line}")
}

/// Open-append-close per write file sink for the trade log.
pub struct FileTradeLogSink {
	path: PathBuf,
}

impl FileTradeLogSink {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl TradeLogSink for FileTradeLogSink {
	fn log_fill(&self, timestamp: DateTime<Utc>, price: Price, amount: u64) {
		let line = format!("{} {} {}", timestamp.to_rfc3339(), price, amount);
		if let Err(e) = append_line(&self.path, &line) {
			tracing::warn!(error = %e, path = %self.path.display(), "failed to append trade log");
		}
	}
}

/// Open-append-close per write file sink for the per-order log.
pub struct FileOrderLogSink {
	path: PathBuf,
}

impl FileOrderLogSink {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl OrderLogSink for FileOrderLogSink {
	fn log_order_event(
		&self,
		timestamp: DateTime<Utc>,
		order_id: u64,
		side: Side,
		price: Option<Price>,
		amount: u64,
		status: TradeStatus,
	) {
		let line = format!(
			"{} {} {} {} {} {}",
			timestamp.to_rfc3339(),
			order_id,
			side,
			format_price(price),
			amount,
			status
		);
		if let Err(e) = append_line(&self.path, &line) {
			tracing::warn!(error = %e, path = %self.path.display(), "failed to append order log");
		}
	}
}

/// Open-append-close per write file sink for the depth snapshot.
pub struct FileDepthLogSink {
	path: PathBuf,
}

impl FileDepthLogSink {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	fn format_rows(rows: &[DepthRow]) -> String {
		let mut out = String::new();
		for row in rows {
			out.push_str(&format!(
				"{} {} {} {} {} {}\n",
				row.id,
				row.timestamp.to_rfc3339(),
				row.symbol,
				row.side,
				format_price(row.price),
				row.amount
			));
		}
		out
	}
}

impl DepthLogSink for FileDepthLogSink {
	fn log_depth(&self, symbol: &str, buys: &[DepthRow], sells: &[DepthRow]) {
		let mut block = String::new();
		block.push_str(&format!("*** symbol: {symbol},  buy order\n"));
		block.push_str(&Self::format_rows(buys));
		block.push_str(&format!("*** symbol: {symbol},  sell order\n"));
		block.push_str(&Self::format_rows(sells));
		block.push('\n');

		let mut file = match OpenOptions::new().create(true).append(true).open(&self.path) {
			Ok(f) => f,
			Err(e) => {
				tracing::warn!(error = %e, path = %self.path.display(), "failed to open depth log");
				return;
			}
		};
		if let Err(e) = file.write_all(block.as_bytes()) {
			tracing::warn!(error = %e, path = %self.path.display(), "failed to append depth log");
		}
	}
}

/// In-memory sinks for tests: capture every write instead of touching disk.
pub struct MemoryLogSink {
	pub trade_lines: Mutex<Vec<String>>,
	pub order_lines: Mutex<Vec<String>>,
	pub depth_blocks: Mutex<Vec<String>>,
}

impl Default for MemoryLogSink {
	fn default() -> Self {
		Self {
			trade_lines: Mutex::new(Vec::new()),
			order_lines: Mutex::new(Vec::new()),
			depth_blocks: Mutex::new(Vec::new()),
		}
	}
}

impl MemoryLogSink {
	pub fn new() -> Self {
		Self::default()
	}
}

impl TradeLogSink for MemoryLogSink {
	fn log_fill(&self, timestamp: DateTime<Utc>, price: Price, amount: u64) {
		self
			.trade_lines
			.lock()
			.unwrap()
			.push(format!("{} {} {}", timestamp.to_rfc3339(), price, amount));
	}
}

impl OrderLogSink for MemoryLogSink {
	fn log_order_event(
		&self,
		timestamp: DateTime<Utc>,
		order_id: u64,
		side: Side,
		price: Option<Price>,
		amount: u64,
		status: TradeStatus,
	) {
		self.order_lines.lock().unwrap().push(format!(
			"{} {} {} {} {} {}",
			timestamp.to_rfc3339(),
			order_id,
			side,
			format_price(price),
			amount,
			status
		));
	}
}

impl DepthLogSink for MemoryLogSink {
	fn log_depth(&self, symbol: &str, buys: &[DepthRow], sells: &[DepthRow]) {
		self.depth_blocks.lock().unwrap().push(format!(
			"*** symbol: {symbol},  buy order\n{}*** symbol: {symbol},  sell order\n{}\n",
			FileDepthLogSink::format_rows(buys),
			FileDepthLogSink::format_rows(sells),
		));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn memory_sink_formats_cancel_status_with_no_price() {
		let sink = MemoryLogSink::new();
		sink.log_order_event(Utc::now(), 7, Side::Buy, None, 3, TradeStatus::AllCancel);
		let lines = sink.order_lines.lock().unwrap();
		assert!(lines[0].contains(" 7 buy market 3 all_cancel"));
	}
}
