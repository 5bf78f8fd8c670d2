//! HTTP adapter for the backend of record.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use shiftdesk_core::error::WorkflowError;
use shiftdesk_core::models::employee::Employee;
use shiftdesk_core::models::leave_request::{CreateLeaveRequest, LeaveRequest};
use shiftdesk_core::models::shift_swap::{CreateShiftSwapRequest, ShiftSwapRequest};
use shiftdesk_core::workflow::{DecideAction, PartnerAction};

use crate::api::types::{
    ApiErrorBody, DecideBody, EmployeeDto, LeaveRequestDto, ListPayload, PartnerBody,
    RequesterCancelBody, ShiftSwapDto, ShiftType, ShiftTypeDto, SwapPreview, SwapPreviewDto,
};
use crate::config::Config;
use crate::service::{LeaveRequestService, ShiftSwapService};

/// Typed client for the roster backend. One instance per authenticated
/// session; the backend resolves the acting user from the bearer token.
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl ApiClient {
    pub fn from_config(config: &Config) -> Result<Self, WorkflowError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|err| {
                WorkflowError::transport(format!("failed to build http client: {err}"))
            })?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn new_with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    pub(crate) async fn send<T: DeserializeOwned>(
        builder: RequestBuilder,
    ) -> Result<T, WorkflowError> {
        let response = builder
            .send()
            .await
            .map_err(|err| WorkflowError::transport(format!("request failed: {err}")))?;
        Self::handle(response).await
    }

    pub(crate) async fn send_no_content(builder: RequestBuilder) -> Result<(), WorkflowError> {
        let response = builder
            .send()
            .await
            .map_err(|err| WorkflowError::transport(format!("request failed: {err}")))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_for(status, response).await)
        }
    }

    async fn handle<T: DeserializeOwned>(response: Response) -> Result<T, WorkflowError> {
        let status = response.status();
        if status.is_success() {
            response.json::<T>().await.map_err(|err| {
                WorkflowError::transport(format!("failed to parse response: {err}"))
            })
        } else {
            Err(Self::error_for(status, response).await)
        }
    }

    async fn error_for(status: StatusCode, response: Response) -> WorkflowError {
        if status == StatusCode::UNAUTHORIZED {
            return WorkflowError::AuthExpired;
        }
        let body: ApiErrorBody = response.json().await.unwrap_or_default();
        let message = body
            .first_message()
            .unwrap_or_else(|| format!("request failed with status {status}"));
        if status == StatusCode::CONFLICT || body.is_already_processed() {
            return WorkflowError::conflict(message);
        }
        if status == StatusCode::FORBIDDEN || status == StatusCode::NOT_FOUND {
            return WorkflowError::invalid_transition(message);
        }
        if status.is_client_error() {
            return WorkflowError::validation(message);
        }
        tracing::error!(%status, %message, "backend request failed");
        WorkflowError::transport(message)
    }

    /// Roster directory for partner pickers and admin forms.
    pub async fn employees(&self) -> Result<Vec<Employee>, WorkflowError> {
        let payload: ListPayload<EmployeeDto> =
            Self::send(self.request(Method::GET, "/employees")).await?;
        payload
            .into_vec()
            .into_iter()
            .map(EmployeeDto::into_domain)
            .collect()
    }

    /// Shift definitions used by schedule views.
    pub async fn shift_types(&self) -> Result<Vec<ShiftType>, WorkflowError> {
        let payload: ListPayload<ShiftTypeDto> =
            Self::send(self.request(Method::GET, "/shift-types")).await?;
        payload
            .into_vec()
            .into_iter()
            .map(ShiftTypeDto::into_domain)
            .collect()
    }
}

#[async_trait]
impl LeaveRequestService for ApiClient {
    async fn list(&self) -> Result<Vec<LeaveRequest>, WorkflowError> {
        let payload: ListPayload<LeaveRequestDto> =
            Self::send(self.request(Method::GET, "/leave-requests")).await?;
        payload
            .into_vec()
            .into_iter()
            .map(LeaveRequestDto::into_domain)
            .collect()
    }

    async fn create(&self, payload: CreateLeaveRequest) -> Result<LeaveRequest, WorkflowError> {
        let dto: LeaveRequestDto =
            Self::send(self.request(Method::POST, "/leave-requests").json(&payload)).await?;
        dto.into_domain()
    }

    async fn decide<'a>(
        &self,
        id: &str,
        action: DecideAction,
        reason: Option<&'a str>,
    ) -> Result<LeaveRequest, WorkflowError> {
        let body = DecideBody {
            action,
            note: reason.map(str::to_string),
        };
        let dto: LeaveRequestDto = Self::send(
            self.request(Method::POST, &format!("/leave-requests/{id}/approve"))
                .json(&body),
        )
        .await?;
        dto.into_domain()
    }

    async fn cancel(&self, id: &str, reason: &str) -> Result<LeaveRequest, WorkflowError> {
        let dto: LeaveRequestDto = Self::send(
            self.request(Method::POST, &format!("/leave-requests/{id}/requester"))
                .json(&RequesterCancelBody::new(reason)),
        )
        .await?;
        dto.into_domain()
    }

    async fn delete(&self, id: &str) -> Result<(), WorkflowError> {
        Self::send_no_content(self.request(Method::DELETE, &format!("/leave-requests/{id}"))).await
    }

    async fn delete_all(&self) -> Result<(), WorkflowError> {
        Self::send_no_content(self.request(Method::DELETE, "/leave-requests")).await
    }
}

#[async_trait]
impl ShiftSwapService for ApiClient {
    async fn list(&self) -> Result<Vec<ShiftSwapRequest>, WorkflowError> {
        let payload: ListPayload<ShiftSwapDto> =
            Self::send(self.request(Method::GET, "/shift-swaps")).await?;
        payload
            .into_vec()
            .into_iter()
            .map(ShiftSwapDto::into_domain)
            .collect()
    }

    async fn create(
        &self,
        payload: CreateShiftSwapRequest,
    ) -> Result<ShiftSwapRequest, WorkflowError> {
        let dto: ShiftSwapDto =
            Self::send(self.request(Method::POST, "/shift-swaps").json(&payload)).await?;
        dto.into_domain()
    }

    async fn decide<'a>(
        &self,
        id: &str,
        action: DecideAction,
        reason: Option<&'a str>,
    ) -> Result<ShiftSwapRequest, WorkflowError> {
        let body = DecideBody {
            action,
            note: reason.map(str::to_string),
        };
        let dto: ShiftSwapDto = Self::send(
            self.request(Method::POST, &format!("/shift-swaps/{id}/approve"))
                .json(&body),
        )
        .await?;
        dto.into_domain()
    }

    async fn partner_respond<'a>(
        &self,
        id: &str,
        action: PartnerAction,
        reason: Option<&'a str>,
    ) -> Result<ShiftSwapRequest, WorkflowError> {
        let body = PartnerBody {
            action,
            note: reason.map(str::to_string),
        };
        let dto: ShiftSwapDto = Self::send(
            self.request(Method::POST, &format!("/shift-swaps/{id}/partner"))
                .query(&[("action", action.as_str())])
                .json(&body),
        )
        .await?;
        dto.into_domain()
    }

    async fn requester_cancel(
        &self,
        id: &str,
        reason: &str,
    ) -> Result<ShiftSwapRequest, WorkflowError> {
        let dto: ShiftSwapDto = Self::send(
            self.request(Method::POST, &format!("/shift-swaps/{id}/requester"))
                .json(&RequesterCancelBody::new(reason)),
        )
        .await?;
        dto.into_domain()
    }

    async fn delete(&self, id: &str) -> Result<(), WorkflowError> {
        Self::send_no_content(self.request(Method::DELETE, &format!("/shift-swaps/{id}"))).await
    }

    async fn delete_all(&self) -> Result<(), WorkflowError> {
        Self::send_no_content(self.request(Method::DELETE, "/shift-swaps")).await
    }

    async fn preview(
        &self,
        partner_id: &str,
        date: NaiveDate,
    ) -> Result<SwapPreview, WorkflowError> {
        let dto: SwapPreviewDto = Self::send(
            self.request(Method::GET, "/shift-swaps/preview").query(&[
                ("partner_id", partner_id.to_string()),
                ("date", date.to_string()),
            ]),
        )
        .await?;
        Ok(dto.into())
    }
}
