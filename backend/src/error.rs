//! Error handling for the Catering Event Management Platform
//!
//! Provides consistent error data in Spanish and English. There is no HTTP
//! surface in this crate; the embedding application turns `ErrorDetail`
//! into whatever its transport needs.

use serde::Serialize;
use shared::LedgerError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_es: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Picking incomplete: {pending_needs} need(s) still pending")]
    IncompletePicking { pending_needs: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

/// Serializable error payload for the consuming application
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::IncompletePicking { .. } => "PICKING_INCOMPLETE",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Bilingual payload for display
    pub fn detail(&self) -> ErrorDetail {
        match self {
            AppError::Validation {
                field,
                message,
                message_es,
            } => ErrorDetail {
                code: self.code().to_string(),
                message_en: message.clone(),
                message_es: message_es.clone(),
                field: Some(field.clone()),
            },
            AppError::NotFound(resource) => ErrorDetail {
                code: self.code().to_string(),
                message_en: format!("{} not found", resource),
                message_es: format!("No se encontró {}", resource),
                field: None,
            },
            AppError::IncompletePicking { pending_needs } => ErrorDetail {
                code: self.code().to_string(),
                message_en: format!(
                    "Picking is incomplete: {} need(s) still pending",
                    pending_needs
                ),
                message_es: format!(
                    "El picking está incompleto: {} necesidad(es) pendientes",
                    pending_needs
                ),
                field: None,
            },
            AppError::Configuration(msg) => ErrorDetail {
                code: self.code().to_string(),
                message_en: format!("Configuration error: {}", msg),
                message_es: format!("Error de configuración: {}", msg),
                field: None,
            },
            AppError::DatabaseError(_) => ErrorDetail {
                code: self.code().to_string(),
                message_en: "A database error occurred".to_string(),
                message_es: "Se produjo un error en la base de datos".to_string(),
                field: None,
            },
            AppError::Internal(_) => ErrorDetail {
                code: self.code().to_string(),
                message_en: "An internal error occurred".to_string(),
                message_es: "Se produjo un error interno".to_string(),
                field: None,
            },
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::ContainerNotFound(_) => AppError::Validation {
                field: "container".to_string(),
                message: "Select a container".to_string(),
                message_es: "Selecciona un contenedor".to_string(),
            },
            LedgerError::EmptyAllocation => AppError::Validation {
                field: "quantity".to_string(),
                message: "Enter a quantity greater than zero".to_string(),
                message_es: "Introduce una cantidad mayor que cero".to_string(),
            },
            LedgerError::AllocationNotFound(_) => AppError::NotFound("Allocation".to_string()),
        }
    }
}

/// Result type alias for services
pub type AppResult<T> = Result<T, AppError>;
