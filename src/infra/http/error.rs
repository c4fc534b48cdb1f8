use std::error::Error as StdError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::catalog::CatalogError;
use crate::application::error::ErrorReport;

pub mod messages {
    pub const CONTENT_NOT_FOUND: &str = "Content not found";
    pub const ROUTE_NOT_FOUND: &str = "Not found";
    pub const INTERNAL: &str = "Internal server error";
    pub const GENERIC_DETAIL: &str = "Something went wrong";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// JSON error response. Carries an [`ErrorReport`] for the logging middleware.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorBody,
    report: ErrorReport,
}

impl ApiError {
    pub fn not_found(source: &'static str, public: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ApiErrorBody {
                error: public,
                message: None,
            },
            report: ErrorReport::from_message(source, StatusCode::NOT_FOUND, detail),
        }
    }

    pub fn content_not_found(id: impl std::fmt::Display) -> Self {
        Self::not_found(
            "infra::http::content_detail",
            messages::CONTENT_NOT_FOUND,
            format!("content `{id}` not found"),
        )
    }

    /// 500 whose `message` is the internal detail only when `debug` is set.
    pub fn internal(source: &'static str, error: &dyn StdError, debug: bool) -> Self {
        let report = ErrorReport::from_error(source, StatusCode::INTERNAL_SERVER_ERROR, error);
        Self::internal_with_report(report, debug)
    }

    pub fn internal_message(source: &'static str, detail: impl Into<String>, debug: bool) -> Self {
        let report = ErrorReport::from_message(source, StatusCode::INTERNAL_SERVER_ERROR, detail);
        Self::internal_with_report(report, debug)
    }

    fn internal_with_report(report: ErrorReport, debug: bool) -> Self {
        let message = if debug {
            report.messages.first().cloned()
        } else {
            None
        }
        .unwrap_or_else(|| messages::GENERIC_DETAIL.to_string());

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ApiErrorBody {
                error: messages::INTERNAL,
                message: Some(message),
            },
            report,
        }
    }

    pub fn from_catalog(source: &'static str, err: CatalogError, debug: bool) -> Self {
        match err {
            CatalogError::NotFound { id } => Self::content_not_found(id),
            CatalogError::Repo(err) => Self::internal(source, &err, debug),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        self.report.attach(&mut response);
        response
    }
}
