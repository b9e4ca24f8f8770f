//! # Engine Error Types
//!
//! One error enum wrapping the lower layers, so engine callers match on a
//! single type. Conversions are `#[from]`; sqlx errors arriving from
//! transaction begin/commit are routed through the DbError taxonomy.

use thiserror::Error;

use mandi_core::{CoreError, ValidationError};
use mandi_db::DbError;

/// Errors surfaced by the engine layer.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Business rule violation from mandi-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Input validation failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Database failure from mandi-db.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::Db(DbError::from(err))
    }
}

/// Convenience alias for Results with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_convert() {
        let err: EngineError = CoreError::not_found("Vendor", "v-1").into();
        assert!(matches!(err, EngineError::Core(_)));

        let err: EngineError = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
