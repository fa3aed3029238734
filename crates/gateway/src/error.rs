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

use actix_web::{HttpResponse, http::StatusCode};
use clob_engine::{QueueError, StoreError};
use clob_types::CoreError;
use thiserror::Error;

/// Gateway-boundary error. `CoreError::OrderNotFound`/`SymbolNotFound` are
/// translated here into the same 400 shape as any other `InvalidRequest` —
/// per §7, lookup misses never surface as a distinct status at the API
/// boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
	#[error(transparent)]
	Core(#[from] CoreError),
	#[error("internal error: {0}")]
	Internal(String),
}

impl From<StoreError> for GatewayError {
	fn from(e: StoreError) -> Self {
		match e {
			StoreError::OrderNotFound(id) => GatewayError::Core(CoreError::OrderNotFound(id)),
			StoreError::Io(msg) => GatewayError::Internal(msg),
		}
	}
}

impl From<QueueError> for GatewayError {
	fn from(e: QueueError) -> Self {
		GatewayError::Internal(e.to_string())
	}
}

impl actix_web::ResponseError for GatewayError {
	fn status_code(&self) -> StatusCode {
		match self {
			GatewayError::Core(_) => StatusCode::BAD_REQUEST,
			GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn error_response(&self) -> HttpResponse {
		let status = self.status_code();
		HttpResponse::build(status).json(serde_json::json!({
			"status": status.as_u16(),
			"error": error_code(self),
			"message": self.to_string(),
		}))
	}
}

fn error_code(err: &GatewayError) -> &'static str {
	match err {
		GatewayError::Core(CoreError::InvalidRequestBody(_)) => "invalid_request_body",
		GatewayError::Core(CoreError::InvalidRequest(_)) => "invalid_request",
		GatewayError::Core(CoreError::OrderNotFound(_)) => "invalid_request",
		GatewayError::Core(CoreError::SymbolNotFound(_)) => "invalid_request",
		GatewayError::Internal(_) => "internal_error",
	}
}

/// Builds the JSON body error handler actix-web invokes when a
/// `web::Json<T>` extractor fails to deserialize — malformed or non-JSON
/// bodies never reach a handler.
pub fn json_error_handler(
	err: actix_web::error::JsonPayloadError,
	_req: &actix_web::HttpRequest,
) -> actix_web::Error {
	GatewayError::Core(CoreError::InvalidRequestBody(err.to_string())).into()
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::ResponseError;
	use actix_web::body::to_bytes;
	use serde_json::Value;

	#[actix_rt::test]
	async fn invalid_request_maps_to_bad_request_with_message() {
		let err = GatewayError::Core(CoreError::InvalidRequest(
			"expected price between 90.0 and 110.0, got: 110.01".to_string(),
		));
		let resp = err.error_response();
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
		let body = to_bytes(resp.into_body()).await.unwrap();
		let json: Value = serde_json::from_slice(&body).unwrap();
		assert_eq!(json["error"], "invalid_request");
		assert!(json["message"].as_str().unwrap().contains("110.01"));
	}

	#[actix_rt::test]
	async fn order_not_found_is_also_a_bad_request() {
		let err = GatewayError::from(StoreError::OrderNotFound(42));
		let resp = err.error_response();
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_rt::test]
	async fn json_error_handler_maps_malformed_body_to_bad_request() {
		let req = actix_web::test::TestRequest::default().to_http_request();
		let err = json_error_handler(actix_web::error::JsonPayloadError::ContentType, &req);
		let resp = err.error_response();
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
		let body = to_bytes(resp.into_body()).await.unwrap();
		let json: Value = serde_json::from_slice(&body).unwrap();
		assert_eq!(json["error"], "invalid_request_body");
		assert!(json["message"].as_str().unwrap().len() > 0);
	}
}
