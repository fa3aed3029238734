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

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use chrono::{DateTime, Utc};
use clob_types::{EffectivePrice, Order};

/// A buy-book heap entry. `BinaryHeap` is a max-heap, so ordering these
/// lexicographically by `(effective_price, Reverse(timestamp), id)` pops the
/// highest price first and, within a price, the earliest-timestamped order
/// first — exactly the buy book's `(−price, timestamp asc)` priority.
///
/// The heap holds only the order id; the unfinished-order map is the
/// authoritative record of the order's current state (lazy deletion: an
/// entry here is live only if its id is still present in that map).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct BuyEntry(EffectivePrice, Reverse<DateTime<Utc>>, u64);

/// The sell-book counterpart: `Reverse(effective_price)` so the lowest price
/// pops first, same earliest-timestamp tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SellEntry(Reverse<EffectivePrice>, Reverse<DateTime<Utc>>, u64);

impl BuyEntry {
	fn for_order(order: &Order) -> Self {
		BuyEntry(order.effective_price(), Reverse(order.timestamp), order.id)
	}
}

impl SellEntry {
	fn for_order(order: &Order) -> Self {
		SellEntry(
			Reverse(order.effective_price()),
			Reverse(order.timestamp),
			order.id,
		)
	}
}

/// One symbol's dual priority queues. Only the matching loop's dedicated
/// worker thread ever mutates this — no internal synchronization.
#[derive(Debug, Default)]
pub struct OrderBook {
	buy: BinaryHeap<BuyEntry>,
	sell: BinaryHeap<SellEntry>,
}

impl OrderBook {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push_buy(&mut self, order: &Order) {
		self.buy.push(BuyEntry::for_order(order));
	}

	pub fn push_sell(&mut self, order: &Order) {
		self.sell.push(SellEntry::for_order(order));
	}

	/// Pops the top of the buy book, skipping stale entries (ids no longer
	/// present in the unfinished-order map) until a live id is found or the
	/// heap is exhausted.
	pub fn pop_buy_live(&mut self, unfinished: &HashMap<u64, Order>) -> Option<u64> {
		while let Some(entry) = self.buy.pop() {
			if unfinished.contains_key(&entry.2) {
				return Some(entry.2);
			}
		}
		None
	}

	pub fn pop_sell_live(&mut self, unfinished: &HashMap<u64, Order>) -> Option<u64> {
		while let Some(entry) = self.sell.pop() {
			if unfinished.contains_key(&entry.2) {
				return Some(entry.2);
			}
		}
		None
	}

	/// Non-destructive: returns up to `n` live order ids in priority order
	/// for the depth snapshot, without mutating the live heap (operates on a
	/// clone).
	pub fn top_buy_ids(&self, unfinished: &HashMap<u64, Order>, n: usize) -> Vec<u64> {
		let mut copy = self.buy.clone();
		let mut out = Vec::with_capacity(n);
		while out.len() < n {
			match copy.pop() {
				Some(entry) if unfinished.contains_key(&entry.2) => out.push(entry.2),
				Some(_) => continue,
				None => break,
			}
		}
		out
	}

	pub fn top_sell_ids(&self, unfinished: &HashMap<u64, Order>, n: usize) -> Vec<u64> {
		let mut copy = self.sell.clone();
		let mut out = Vec::with_capacity(n);
		while out.len() < n {
			match copy.pop() {
				Some(entry) if unfinished.contains_key(&entry.2) => out.push(entry.2),
				Some(_) => continue,
				None => break,
			}
		}
		out
	}

	pub fn is_empty(&self, unfinished: &HashMap<u64, Order>) -> bool {
		self.top_buy_ids(unfinished, 1).is_empty() && self.top_sell_ids(unfinished, 1).is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use clob_types::{OrderKind, Price, Side};

	fn limit_order(id: u64, side: Side, price: i64, amount: u64, ts: DateTime<Utc>) -> Order {
		Order::new(
			id,
			"WSCN",
			side,
			OrderKind::Limit {
				price: Price(price),
			},
			amount,
			ts,
		)
	}

	#[test]
	fn buy_book_pops_highest_price_first() {
		let t0 = Utc::now();
		let mut book = OrderBook::new();
		let mut unfinished = HashMap::new();
		let low = limit_order(1, Side::Buy, 9000, 10, t0);
		let high = limit_order(2, Side::Buy, 9600, 10, t0);
		unfinished.insert(low.id, low.clone());
		unfinished.insert(high.id, high.clone());
		book.push_buy(&low);
		book.push_buy(&high);

		assert_eq!(book.pop_buy_live(&unfinished), Some(2));
		assert_eq!(book.pop_buy_live(&unfinished), Some(1));
	}

	#[test]
	fn sell_book_pops_lowest_price_first() {
		let t0 = Utc::now();
		let mut book = OrderBook::new();
		let mut unfinished = HashMap::new();
		let low = limit_order(1, Side::Sell, 9500, 10, t0);
		let high = limit_order(2, Side::Sell, 10000, 10, t0);
		unfinished.insert(low.id, low.clone());
		unfinished.insert(high.id, high.clone());
		book.push_sell(&low);
		book.push_sell(&high);

		assert_eq!(book.pop_sell_live(&unfinished), Some(1));
		assert_eq!(book.pop_sell_live(&unfinished), Some(2));
	}

	#[test]
	fn same_price_breaks_tie_by_earlier_timestamp() {
		let t0 = Utc::now();
		let t1 = t0 + chrono::Duration::milliseconds(5);
		let mut book = OrderBook::new();
		let mut unfinished = HashMap::new();
		let earlier = limit_order(1, Side::Buy, 9500, 10, t0);
		let later = limit_order(2, Side::Buy, 9500, 10, t1);
        unfinished.insert(earlier.id, earlier.clone());
        unfinished.insert(later.id, later.clone());
		book.push_buy(&later);
		book.push_buy(&earlier);

		assert_eq!(book.pop_buy_live(&unfinished), Some(1));
	}

	#[test]
	fn lazy_deletion_skips_stale_entries() {
		let t0 = Utc::now();
		let mut book = OrderBook::new();
		let mut unfinished = HashMap::new();
		let canceled = limit_order(1, Side::Buy, 9800, 10, t0);
		let live = limit_order(2, Side::Buy, 9500, 10, t0);
		unfinished.insert(live.id, live.clone());
		book.push_buy(&canceled);
		book.push_buy(&live);

		assert_eq!(book.pop_buy_live(&unfinished), Some(2));
		assert_eq!(book.pop_buy_live(&unfinished), None);
	}
}
