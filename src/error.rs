use crate::maud_conveniences::alert;
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use snafu::Snafu;
use std::num::ParseIntError;
use uuid::Uuid;

pub type RollcallResult<T> = Result<T, RollcallError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RollcallError {
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse env var `{}` as a number", name))]
    ParseEnvVar {
        source: ParseIntError,
        name: &'static str,
    },
    #[snafu(display("Page size must be at least 1"))]
    ZeroPageSize,
    #[snafu(display("Unable to parse API base {:?}", original))]
    InvalidApiBase {
        source: url::ParseError,
        original: String,
    },
    #[snafu(display("API base {:?} cannot have path segments appended", original))]
    ApiBaseNotABase { original: String },
    #[snafu(display("Unable to build HTTP client"))]
    BuildClient { source: reqwest::Error },
    #[snafu(display("Please enter a prefix to look up"))]
    EmptyPrefix,
    #[snafu(display("No record found for {:?}", prefix))]
    NoRecord { prefix: String },
    #[snafu(display("Unable to reach the student service at {}", url))]
    Unreachable { source: reqwest::Error, url: String },
    #[snafu(display("Student index returned status {}", status))]
    IndexStatus { status: reqwest::StatusCode },
    #[snafu(display("Student index was not a list of prefixes"))]
    MalformedIndex { source: serde_json::Error },
    #[snafu(display("Directory view {} has expired, reload the page", id))]
    UnknownView { id: Uuid },
    #[snafu(display("Unknown display field {:?}", slug))]
    UnknownField { slug: String },
    #[snafu(display("Unrecognised directory options: {}", source))]
    BadQuery { source: QueryRejection },
}

/// How a failure is surfaced to the visitor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    NotFound,
    ServiceUnavailable,
    Internal,
}

impl RollcallError {
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::EmptyPrefix | Self::UnknownField { .. } | Self::BadQuery { .. } => {
                ErrorClass::Validation
            }
            Self::NoRecord { .. } | Self::UnknownView { .. } => ErrorClass::NotFound,
            Self::Unreachable { .. } | Self::IndexStatus { .. } | Self::MalformedIndex { .. } => {
                ErrorClass::ServiceUnavailable
            }
            Self::BadEnvVar { .. }
            | Self::ParseEnvVar { .. }
            | Self::ZeroPageSize
            | Self::InvalidApiBase { .. }
            | Self::ApiBaseNotABase { .. }
            | Self::BuildClient { .. } => ErrorClass::Internal,
        }
    }
}

impl IntoResponse for RollcallError {
    fn into_response(self) -> Response {
        let status_code = match self.class() {
            ErrorClass::Validation => StatusCode::BAD_REQUEST,
            ErrorClass::NotFound => StatusCode::NOT_FOUND,
            ErrorClass::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        error!(?self, "Error!");
        (status_code, Html(alert("Rollcall Error", self.to_string()))).into_response()
    }
}
