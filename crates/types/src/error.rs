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

use thiserror::Error;

/// Error taxonomy shared between the matching core and the gateway.
///
/// `OrderNotFound` and `SymbolNotFound` are lookup misses raised deep in the
/// engine or its collaborators; the gateway always translates them into
/// `InvalidRequest` at the HTTP boundary rather than exposing them directly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
	#[error("malformed request body: {0}")]
	InvalidRequestBody(String),
	#[error("{0}")]
	InvalidRequest(String),
	#[error("order not found: {0}")]
	OrderNotFound(u64),
	#[error("unknown symbol: {0}")]
	SymbolNotFound(String),
}
