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

use clob_types::Price;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SymbolError {
	#[error("unknown symbol: {0}")]
	SymbolNotFound(String),
}

/// Static symbol -> reference-price catalog. Price bands are a fixed
/// `[0.9 * reference, 1.1 * reference]` bracket.
#[derive(Debug, Clone)]
pub struct SymbolCatalog {
	reference: HashMap<String, Price>,
}

impl SymbolCatalog {
	pub fn new(reference: HashMap<String, Price>) -> Self {
		Self { reference }
	}

	/// Builds a catalog from plain decimal reference prices (e.g. config
	/// loaded from env/file), converting each to cents.
	pub fn from_reference_prices(decimal: HashMap<String, f64>) -> Self {
		let reference = decimal
			.into_iter()
			.filter_map(|(symbol, price)| Price::from_f64(price).map(|p| (symbol, p)))
			.collect();
		Self { reference }
	}

	pub fn reference_price(&self, symbol: &str) -> Result<Price, SymbolError> {
		self
			.reference
			.get(symbol)
			.copied()
			.ok_or_else(|| SymbolError::SymbolNotFound(symbol.to_string()))
	}

	/// `(min, max)` band for the symbol: `0.9 * reference`, `1.1 * reference`.
	pub fn price_range(&self, symbol: &str) -> Result<(Price, Price), SymbolError> {
		let reference = self.reference_price(symbol)?;
		let min = Price((reference.0 as f64 * 0.9).round() as i64);
		let max = Price((reference.0 as f64 * 1.1).round() as i64);
		Ok((min, max))
	}

	pub fn contains(&self, symbol: &str) -> bool {
		self.reference.contains_key(symbol)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn wscn_catalog() -> SymbolCatalog {
		let mut m = HashMap::new();
		m.insert("WSCN".to_string(), 100.0);
		SymbolCatalog::from_reference_prices(m)
	}

	#[test]
	fn price_range_is_ninety_to_one_ten_percent() {
		let catalog = wscn_catalog();
		let (min, max) = catalog.price_range("WSCN").unwrap();
		assert_eq!(min, Price(9000));
		assert_eq!(max, Price(11000));
	}

	#[test]
	fn unknown_symbol_errors() {
		let catalog = wscn_catalog();
		assert!(matches!(
			catalog.reference_price("WSCNn"),
			Err(SymbolError::SymbolNotFound(_))
		));
	}
}
