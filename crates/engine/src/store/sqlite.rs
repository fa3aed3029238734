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

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use clob_types::{Order, OrderKind, Price, Side, Trade, TradeStatus};
use rusqlite::{Connection, OptionalExtension, params};

use super::{OrderStore, StoreError, TradeStore};

fn io_err(e: impl std::fmt::Display) -> StoreError {
	StoreError::Io(e.to_string())
}

/// Encodes `(side, kind)` into the single dispatch tag the durable schema's
/// `type` column stores — unifying the two parallel type registries the
/// original implementation kept (see design notes).
fn encode_order_type(side: Side, kind: OrderKind) -> &'static str {
	match (side, kind) {
		(Side::Buy, OrderKind::Limit { .. }) => "buy",
		(Side::Sell, OrderKind::Limit { .. }) => "sell",
		(Side::Buy, OrderKind::Market) => "market_buy",
		(Side::Sell, OrderKind::Market) => "market_sell",
	}
}

fn decode_order_type(tag: &str, price: Option<i64>) -> Option<(Side, OrderKind)> {
	match tag {
		"buy" => Some((Side::Buy, OrderKind::Limit { price: Price(price?) })),
		"sell" => Some((Side::Sell, OrderKind::Limit { price: Price(price?) })),
		"market_buy" => Some((Side::Buy, OrderKind::Market)),
		"market_sell" => Some((Side::Sell, OrderKind::Market)),
		_ => None,
	}
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
	DateTime::parse_from_rfc3339(raw)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(io_err)
}

/// Durable order store, schema `orders(id PK, symbol, amount, type, price
/// nullable, timestamp)`, backed by `rusqlite` (bundled SQLite).
pub struct SqliteOrderStore {
	conn: Mutex<Connection>,
	next_id: AtomicU64,
}

impl SqliteOrderStore {
	pub fn open(path: &str) -> Result<Self, StoreError> {
		let conn = Connection::open(path).map_err(io_err)?;
		conn
			.execute(
				"CREATE TABLE IF NOT EXISTS orders (
					id INTEGER PRIMARY KEY,
					symbol TEXT NOT NULL,
					amount INTEGER NOT NULL,
					type TEXT NOT NULL,
					price INTEGER,
					timestamp TEXT NOT NULL
				)",
				[],
			)
			.map_err(io_err)?;
		let max_id: Option<i64> = conn
			.query_row("SELECT MAX(id) FROM orders", [], |row| row.get(0))
			.map_err(io_err)?;
		Ok(Self {
			conn: Mutex::new(conn),
			next_id: AtomicU64::new(max_id.unwrap_or(0) as u64),
		})
	}

	fn row_to_order(id: i64, symbol: String, amount: i64, tag: String, price: Option<i64>, timestamp: String) -> Result<Order, StoreError> {
		let (side, kind) = decode_order_type(&tag, price)
			.ok_or_else(|| io_err(format!("unrecognized stored order type: {tag}")))?;
		let ts = parse_timestamp(&timestamp)?;
		let mut order = Order::new(id as u64, symbol, side, kind, amount as u64, ts);
		order.remaining = amount as u64;
		Ok(order)
	}
}

impl OrderStore for SqliteOrderStore {
	fn create(
		&self,
		symbol: &str,
		side: Side,
		kind: OrderKind,
		amount: u64,
	) -> Result<Order, StoreError> {
		let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
		let order = Order::new(id, symbol, side, kind, amount, Utc::now());
		let conn = self.conn.lock().unwrap();
		conn
			.execute(
				"INSERT INTO orders (id, symbol, amount, type, price, timestamp) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
				params![
					order.id as i64,
					order.symbol,
					order.amount as i64,
					encode_order_type(side, kind),
					kind.price().map(|p| p.0),
					order.timestamp.to_rfc3339(),
				],
			)
			.map_err(io_err)?;
		Ok(order)
	}

	fn get(&self, id: u64) -> Result<Order, StoreError> {
		let conn = self.conn.lock().unwrap();
		let row = conn
			.query_row(
				"SELECT id, symbol, amount, type, price, timestamp FROM orders WHERE id = ?1",
				params![id as i64],
				|row| {
					Ok((
						row.get::<_, i64>(0)?,
						row.get::<_, String>(1)?,
						row.get::<_, i64>(2)?,
						row.get::<_, String>(3)?,
						row.get::<_, Option<i64>>(4)?,
						row.get::<_, String>(5)?,
					))
				},
			)
			.optional()
			.map_err(io_err)?
			.ok_or(StoreError::OrderNotFound(id))?;
		Self::row_to_order(row.0, row.1, row.2, row.3, row.4, row.5)
	}

	fn save(&self, order: &Order) -> Result<(), StoreError> {
		let conn = self.conn.lock().unwrap();
		conn
			.execute(
				"INSERT OR REPLACE INTO orders (id, symbol, amount, type, price, timestamp) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
				params![
					order.id as i64,
					order.symbol,
					order.amount as i64,
					encode_order_type(order.side, order.kind),
					order.kind.price().map(|p| p.0),
					order.timestamp.to_rfc3339(),
				],
			)
			.map_err(io_err)?;
		Ok(())
	}
}

/// Durable trade store, schema `trades(id PK, order_id, order_type, price,
/// amount, status, timestamp)`.
pub struct SqliteTradeStore {
	conn: Mutex<Connection>,
	next_id: AtomicU64,
}

impl SqliteTradeStore {
	pub fn open(path: &str) -> Result<Self, StoreError> {
		let conn = Connection::open(path).map_err(io_err)?;
		conn
			.execute(
				"CREATE TABLE IF NOT EXISTS trades (
					id INTEGER PRIMARY KEY,
					order_id INTEGER NOT NULL,
					order_type TEXT NOT NULL,
					price INTEGER,
					amount INTEGER NOT NULL,
					status TEXT NOT NULL,
					timestamp TEXT NOT NULL
				)",
				[],
			)
			.map_err(io_err)?;
		let max_id: Option<i64> = conn
			.query_row("SELECT MAX(id) FROM trades", [], |row| row.get(0))
			.map_err(io_err)?;
		Ok(Self {
			conn: Mutex::new(conn),
			next_id: AtomicU64::new(max_id.unwrap_or(0) as u64),
		})
	}
}

fn encode_status(status: TradeStatus) -> &'static str {
	match status {
		TradeStatus::PartialDone => "partial_done",
		TradeStatus::AllDone => "all_done",
		TradeStatus::LeftCancel => "left_cancel",
		TradeStatus::AllCancel => "all_cancel",
	}
}

fn decode_status(raw: &str) -> Result<TradeStatus, StoreError> {
	match raw {
		"partial_done" => Ok(TradeStatus::PartialDone),
		"all_done" => Ok(TradeStatus::AllDone),
		"left_cancel" => Ok(TradeStatus::LeftCancel),
		"all_cancel" => Ok(TradeStatus::AllCancel),
		other => Err(io_err(format!("unrecognized stored trade status: {other}"))),
	}
}

impl TradeStore for SqliteTradeStore {
	fn next_id(&self) -> u64 {
		self.next_id.fetch_add(1, Ordering::SeqCst) + 1
	}

	fn save(&self, trade: &Trade) -> Result<(), StoreError> {
		let conn = self.conn.lock().unwrap();
		conn
			.execute(
				"INSERT INTO trades (id, order_id, order_type, price, amount, status, timestamp) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
				params![
					trade.id as i64,
					trade.order_id as i64,
					trade.order_side.to_string(),
					trade.price.map(|p| p.0),
					trade.amount as i64,
					encode_status(trade.status),
					trade.timestamp.to_rfc3339(),
				],
			)
			.map_err(io_err)?;
		Ok(())
	}

	fn get(&self, order_id: u64) -> Result<Vec<Trade>, StoreError> {
		let conn = self.conn.lock().unwrap();
		let mut stmt = conn
			.prepare(
				"SELECT id, order_id, order_type, price, amount, status, timestamp FROM trades WHERE order_id = ?1 ORDER BY id ASC",
			)
			.map_err(io_err)?;
		let rows = stmt
			.query_map(params![order_id as i64], |row| {
				Ok((
					row.get::<_, i64>(0)?,
					row.get::<_, i64>(1)?,
					row.get::<_, String>(2)?,
					row.get::<_, Option<i64>>(3)?,
					row.get::<_, i64>(4)?,
					row.get::<_, String>(5)?,
					row.get::<_, String>(6)?,
				))
			})
			.map_err(io_err)?;

		let mut trades = Vec::new();
		for row in rows {
			let (id, order_id, side_raw, price, amount, status_raw, timestamp) = row.map_err(io_err)?;
			let order_side = if side_raw == "buy" { Side::Buy } else { Side::Sell };
			trades.push(Trade {
				id: id as u64,
				order_id: order_id as u64,
				order_side,
				price: price.map(Price),
				amount: amount as u64,
				status: decode_status(&status_raw)?,
				timestamp: parse_timestamp(&timestamp)?,
			});
		}
		Ok(trades)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn id_monotonicity_survives_restart() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("orders.sqlite3");
		let path_str = path.to_str().unwrap().to_string();

		let first_id = {
			let store = SqliteOrderStore::open(&path_str).unwrap();
			store
				.create("WSCN", Side::Buy, OrderKind::Market, 10)
				.unwrap()
				.id
		};
		let second_id = {
			let store = SqliteOrderStore::open(&path_str).unwrap();
			store
				.create("WSCN", Side::Buy, OrderKind::Market, 10)
				.unwrap()
				.id
		};
		assert!(second_id > first_id);
	}

	#[test]
	fn round_trips_limit_order() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("orders.sqlite3");
		let store = SqliteOrderStore::open(path.to_str().unwrap()).unwrap();
		let created = store
			.create(
				"WSCN",
				Side::Sell,
				OrderKind::Limit { price: Price(9500) },
				20,
			)
			.unwrap();
		let fetched = store.get(created.id).unwrap();
		assert_eq!(fetched.symbol, "WSCN");
		assert_eq!(fetched.kind, OrderKind::Limit { price: Price(9500) });
		assert_eq!(fetched.amount, 20);
	}
}
