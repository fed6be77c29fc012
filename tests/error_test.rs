use saucier::cache::StorageError;
use saucier::{Result, SaucierError};

#[test]
fn test_error_display() {
    let err = SaucierError::NotFound("/recipe2-api/search-recipe/42".to_string());
    assert!(err.to_string().contains("search-recipe/42"));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(SaucierError::EmptyResponse)
    }
    assert!(returns_error().is_err());
}

#[test]
fn test_storage_error_converts() {
    let err: SaucierError = StorageError::QuotaExceeded {
        required: 10,
        quota: 5,
    }
    .into();
    assert!(matches!(err, SaucierError::Storage(_)));
    assert!(err.to_string().contains("quota"));
}

// ============================================================================
// Transient error classification
// ============================================================================

#[test]
fn transient_errors() {
    assert!(SaucierError::Timeout.is_transient());
    assert!(SaucierError::Http("connection reset".into()).is_transient());
    assert!(
        SaucierError::Api {
            status: 500,
            message: "internal".into()
        }
        .is_transient()
    );
    assert!(
        SaucierError::Api {
            status: 503,
            message: "unavailable".into()
        }
        .is_transient()
    );
}

#[test]
fn permanent_errors() {
    assert!(!SaucierError::AuthenticationFailed.is_transient());
    assert!(!SaucierError::NotFound("x".into()).is_transient());
    assert!(
        !SaucierError::Api {
            status: 400,
            message: "bad request".into()
        }
        .is_transient()
    );
    assert!(!SaucierError::EmptyResponse.is_transient());
    assert!(!SaucierError::DataError("not json".into()).is_transient());
    assert!(!SaucierError::Configuration("no key".into()).is_transient());
}
