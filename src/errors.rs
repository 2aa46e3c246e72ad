use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

/// Failure taxonomy for the record store boundary.
///
/// `Connection` means the pool handed us nothing — the store is unavailable
/// and no statement was ever sent. `Query` wraps a structured SQLite error.
/// `NotFound` is an update that matched zero rows (the record was deleted
/// remotely between fetch and write).
#[derive(Debug)]
pub enum StoreError {
    Connection(r2d2::Error),
    Query(rusqlite::Error),
    NotFound,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Connection(e) => write!(f, "Store unavailable: {e}"),
            StoreError::Query(e) => write!(f, "Query error: {e}"),
            StoreError::NotFound => write!(f, "Record not found"),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Query(e)
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(e: r2d2::Error) -> Self {
        StoreError::Connection(e)
    }
}

/// Local, pre-flight rejection. Raised before any remote call is issued.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        ValidationError {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    Validation(ValidationError),
    SaveInFlight,
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Store(e) => write!(f, "{e}"),
            AppError::Validation(e) => write!(f, "Validation failed: {e}"),
            AppError::SaveInFlight => write!(f, "A save is already in progress"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(e) => HttpResponse::BadRequest().json(json!({
                "error": e.message,
                "field": e.field,
            })),
            AppError::NotFound | AppError::Store(StoreError::NotFound) => {
                HttpResponse::NotFound().json(json!({ "error": "not found" }))
            }
            AppError::SaveInFlight => HttpResponse::Conflict().json(json!({
                "error": "a save is already in progress",
            })),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().json(json!({
                    "error": "internal server error",
                }))
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e)
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Store(StoreError::Query(e))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Store(StoreError::Connection(e))
    }
}
