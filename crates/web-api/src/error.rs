use application::{ApplicationError, NotificationError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{DomainError, RepositoryError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        let message = error.to_string();
        match error {
            DomainError::InvalidDateRange => {
                ApiError::new(StatusCode::BAD_REQUEST, "INVALID_DATE_RANGE", message)
            }
            DomainError::InvalidGuestInfo => {
                ApiError::new(StatusCode::BAD_REQUEST, "INVALID_GUEST_INFO", message)
            }
            DomainError::Validation { .. } => {
                ApiError::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", message)
            }
            DomainError::RoomNotFound => {
                ApiError::new(StatusCode::NOT_FOUND, "ROOM_NOT_FOUND", message)
            }
            DomainError::BookingNotFound => {
                ApiError::new(StatusCode::NOT_FOUND, "BOOKING_NOT_FOUND", message)
            }
            DomainError::SpecialDateNotFound => {
                ApiError::new(StatusCode::NOT_FOUND, "SPECIAL_DATE_NOT_FOUND", message)
            }
            DomainError::RoomNotAvailable => {
                ApiError::new(StatusCode::CONFLICT, "ROOM_NOT_AVAILABLE", message)
            }
            DomainError::InvalidStatusTransition { .. } => {
                ApiError::new(StatusCode::CONFLICT, "INVALID_STATUS_TRANSITION", message)
            }
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::Domain(err) => err.into(),
            ApplicationError::Repository(repo_err) => match repo_err {
                RepositoryError::NotFound => ApiError::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "requested resource not found",
                ),
                RepositoryError::Conflict => ApiError::new(
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    "resource conflicts with existing data",
                ),
                RepositoryError::Storage { message } => {
                    tracing::error!(error = %message, "存储层错误");
                    ApiError::new(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "DATABASE_ERROR",
                        format!("database error: {}", message),
                    )
                }
            },
            ApplicationError::Notification(err @ NotificationError::UnknownChannel(_)) => {
                ApiError::new(StatusCode::BAD_REQUEST, "UNKNOWN_CHANNEL", err.to_string())
            }
            ApplicationError::Notification(err) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "NOTIFICATION_ERROR",
                err.to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::BookingStatus;

    #[test]
    fn domain_errors_map_to_http_status() {
        let cases = [
            (DomainError::InvalidDateRange, StatusCode::BAD_REQUEST),
            (DomainError::validation("capacity", "must be positive"), StatusCode::BAD_REQUEST),
            (DomainError::RoomNotFound, StatusCode::NOT_FOUND),
            (DomainError::SpecialDateNotFound, StatusCode::NOT_FOUND),
            (DomainError::RoomNotAvailable, StatusCode::CONFLICT),
            (
                DomainError::InvalidStatusTransition {
                    from: BookingStatus::Cancelled,
                    to: BookingStatus::Confirmed,
                },
                StatusCode::CONFLICT,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(ApplicationError::from(error)).status(), status);
        }
    }

    #[test]
    fn repository_and_notification_errors_map_to_http_status() {
        let storage = ApiError::from(ApplicationError::from(RepositoryError::storage("down")));
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(storage.body.code, "DATABASE_ERROR");

        let conflict = ApiError::from(ApplicationError::from(RepositoryError::Conflict));
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let channel = ApiError::from(ApplicationError::from(NotificationError::UnknownChannel(
            "fax".into(),
        )));
        assert_eq!(channel.status(), StatusCode::BAD_REQUEST);
    }
}
