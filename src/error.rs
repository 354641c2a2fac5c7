//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, internal_server_error::InternalServerError};

/// The errors that may occur in the application.
///
/// Failures talking to the payments API are not in here: they are
/// [crate::GatewayError]s, kept in the store and shown on the dashboard's
/// error panel.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The base URL for the payments API could not be parsed.
    #[error("invalid API base URL \"{0}\"")]
    InvalidApiBaseUrl(String),

    /// The filter form contained a value that could not be parsed.
    ///
    /// The string describes the offending field and is shown to the user.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// The displayed transactions could not be written as CSV.
    #[error("could not export transactions as CSV: {0}")]
    CsvExportError(String),

    /// Could not acquire the lock on the dashboard view state.
    #[error("could not acquire the dashboard view lock")]
    ViewLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            error @ Error::CsvExportError(_) => {
                tracing::error!("{error}");
                InternalServerError {
                    description: "Export Failed",
                    fix: "The transactions could not be exported. Please try again.",
                }
                .into_response()
            }
            Error::ViewLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::InvalidFilter(details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Invalid filter".to_owned(),
                    details,
                },
            ),
            Error::ViewLockError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::ErrorSimple {
                    message: "The dashboard is busy, please try again.".to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
