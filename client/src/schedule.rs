//! Opaque schedule collaborators.
//!
//! The monthly generation engine (weekly pattern fill, hybrid merge with
//! manual edits) lives entirely on the backend; parameters and grids pass
//! through as JSON and the client never interprets them beyond display.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use shiftdesk_core::error::WorkflowError;

use crate::api::ApiClient;

/// Monthly schedule operations against the backend of record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleService: Send + Sync {
    /// Manual/merged grid for one store month.
    async fn month(&self, store_id: &str, year: i32, month: u32) -> Result<Value, WorkflowError>;

    /// Runs the server-side generator; parameters pass through verbatim.
    async fn generate(&self, params: Value) -> Result<Value, WorkflowError>;

    /// Persists manual grid edits.
    async fn save_manual(&self, payload: Value) -> Result<Value, WorkflowError>;

    /// Clears every schedule matching the payload's filters.
    async fn reset_all(&self, payload: Value) -> Result<Value, WorkflowError>;
}

#[async_trait]
impl ScheduleService for ApiClient {
    async fn month(&self, store_id: &str, year: i32, month: u32) -> Result<Value, WorkflowError> {
        let value: Value = ApiClient::send(self.request(Method::GET, "/schedules/manual").query(&[
            ("store_id", store_id.to_string()),
            ("year", year.to_string()),
            ("month", month.to_string()),
        ]))
        .await?;
        Ok(unwrap_data(value))
    }

    async fn generate(&self, params: Value) -> Result<Value, WorkflowError> {
        let value: Value = ApiClient::send(
            self.request(Method::POST, "/schedules/generate")
                .json(&params),
        )
        .await?;
        Ok(unwrap_data(value))
    }

    async fn save_manual(&self, payload: Value) -> Result<Value, WorkflowError> {
        let value: Value = ApiClient::send(
            self.request(Method::POST, "/schedules/manual-save")
                .json(&payload),
        )
        .await?;
        Ok(unwrap_data(value))
    }

    async fn reset_all(&self, payload: Value) -> Result<Value, WorkflowError> {
        let value: Value = ApiClient::send(
            self.request(Method::PUT, "/schedules/reset-all")
                .json(&payload),
        )
        .await?;
        Ok(unwrap_data(value))
    }
}

/// Grid payloads arrive either raw or wrapped in a `data` envelope.
fn unwrap_data(value: Value) -> Value {
    if let Value::Object(mut map) = value {
        if let Some(data) = map.remove("data") {
            return data;
        }
        return Value::Object(map);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwrap_data_peels_the_envelope_once() {
        let wrapped = json!({ "data": { "1": { "employee": "Budi" } } });
        assert_eq!(unwrap_data(wrapped), json!({ "1": { "employee": "Budi" } }));

        let raw = json!({ "1": { "employee": "Budi" } });
        assert_eq!(unwrap_data(raw.clone()), raw);

        let scalar = json!([1, 2, 3]);
        assert_eq!(unwrap_data(scalar.clone()), scalar);
    }
}
