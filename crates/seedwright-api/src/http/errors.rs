//! Problem documents (RFC 9457) returned by every handler on failure.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use seedwright_fsops::FsOpsError;
use seedwright_jobs::{JobError, JobField};
use seedwright_telemetry::RequestScope;
use tracing::error;

use crate::models::{ProblemDetails, ProblemInvalidParam};

const PROBLEM_BASE: &str = "https://seedwright.dev/problems/";

/// Problem families the API distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProblemKind {
    Internal,
    BadRequest,
    Validation,
    NotFound,
}

impl ProblemKind {
    const fn slug(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::BadRequest => "bad-request",
            Self::Validation => "validation",
            Self::NotFound => "not-found",
        }
    }

    const fn title(self) -> &'static str {
        match self {
            Self::Internal => "internal server error",
            Self::BadRequest => "bad request",
            Self::Validation => "validation failed",
            Self::NotFound => "resource not found",
        }
    }

    const fn status(self) -> StatusCode {
        match self {
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest | Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// Handler failure rendered as `application/json` problem details.
#[derive(Debug)]
pub(crate) struct ApiError {
    kind: ProblemKind,
    detail: String,
    invalid_params: Vec<ProblemInvalidParam>,
}

impl ApiError {
    fn of(kind: ProblemKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            invalid_params: Vec::new(),
        }
    }

    pub(crate) fn internal(detail: impl Into<String>) -> Self {
        Self::of(ProblemKind::Internal, detail)
    }

    pub(crate) fn bad_request(detail: impl Into<String>) -> Self {
        Self::of(ProblemKind::BadRequest, detail)
    }

    pub(crate) fn not_found(detail: impl Into<String>) -> Self {
        Self::of(ProblemKind::NotFound, detail)
    }

    /// 400 listing each offending field as a JSON pointer.
    fn invalid(detail: impl Into<String>, params: Vec<ProblemInvalidParam>) -> Self {
        Self {
            invalid_params: params,
            ..Self::of(ProblemKind::Validation, detail)
        }
    }

    /// Map a filesystem failure, using `missing` as the 404 detail.
    pub(crate) fn from_fsops(err: &FsOpsError, missing: &'static str) -> Self {
        match err {
            FsOpsError::NotFound { .. } => Self::not_found(missing),
            FsOpsError::InvalidInput { field, reason, .. } => Self::invalid(
                err.to_string(),
                vec![ProblemInvalidParam {
                    pointer: format!("/{field}"),
                    message: (*reason).to_owned(),
                }],
            ),
            FsOpsError::Io { .. } => {
                error!(error = %err, "filesystem operation failed");
                Self::internal(err.to_string())
            }
        }
    }

    pub(crate) fn from_job(err: &JobError) -> Self {
        let params = err
            .violations()
            .iter()
            .map(|violation| ProblemInvalidParam {
                pointer: field_pointer(violation.field).to_owned(),
                message: violation.reason.to_owned(),
            })
            .collect();
        Self::invalid(err.to_string(), params)
    }

    #[cfg(test)]
    pub(crate) const fn status(&self) -> StatusCode {
        self.kind.status()
    }

    #[cfg(test)]
    pub(crate) fn detail(&self) -> &str {
        &self.detail
    }
}

const fn field_pointer(field: JobField) -> &'static str {
    match field {
        JobField::SourcePath => "/sourcePath",
        JobField::AnnounceUrl => "/announceUrl",
        JobField::OutputName => "/outputName",
        JobField::PieceSize => "/pieceSize",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status();
        if status.is_server_error() {
            let scope = RequestScope::current();
            error!(
                status = status.as_u16(),
                route = scope.as_ref().map_or("", RequestScope::route),
                request_id = scope.as_ref().map_or("", RequestScope::request_id),
                detail = %self.detail,
                "request failed"
            );
        }
        let problem = ProblemDetails {
            kind: format!("{PROBLEM_BASE}{}", self.kind.slug()),
            title: self.kind.title().to_owned(),
            status: status.as_u16(),
            detail: Some(self.detail),
            invalid_params: (!self.invalid_params.is_empty()).then_some(self.invalid_params),
        };
        (status, Json(problem)).into_response()
    }
}
