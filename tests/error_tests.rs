//! Tests for the error system.

use drover::error::*;

#[test]
fn error_api_creation() {
    let err = DroverError::api(404, "Not found");
    assert!(matches!(&err, DroverError::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "API error (status 404): Not found");
}

#[test]
fn category_mappings_are_stable() {
    struct Case {
        error: DroverError,
        expected_category: ErrorCategory,
        expected_retryable: bool,
    }

    let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();

    let cases = vec![
        Case {
            error: DroverError::Authentication("bad-key".to_string()),
            expected_category: ErrorCategory::Authentication,
            expected_retryable: false,
        },
        Case {
            error: DroverError::RateLimited {
                retry_after_ms: Some(1000),
            },
            expected_category: ErrorCategory::RateLimit,
            expected_retryable: true,
        },
        Case {
            error: DroverError::Timeout(5000),
            expected_category: ErrorCategory::Timeout,
            expected_retryable: true,
        },
        Case {
            error: DroverError::NotFound("run_1".to_string()),
            expected_category: ErrorCategory::NotFound,
            expected_retryable: false,
        },
        Case {
            error: DroverError::Configuration("no endpoint".to_string()),
            expected_category: ErrorCategory::Configuration,
            expected_retryable: false,
        },
        Case {
            error: DroverError::Serialization(serde_error),
            expected_category: ErrorCategory::Serialization,
            expected_retryable: false,
        },
        Case {
            error: DroverError::api(500, "internal"),
            expected_category: ErrorCategory::Server,
            expected_retryable: true,
        },
        Case {
            error: DroverError::api(403, "forbidden"),
            expected_category: ErrorCategory::Authentication,
            expected_retryable: false,
        },
        Case {
            error: DroverError::api(418, "teapot"),
            expected_category: ErrorCategory::Api,
            expected_retryable: false,
        },
    ];

    for case in cases {
        assert_eq!(
            case.error.category(),
            case.expected_category,
            "category for {}",
            case.error
        );
        assert_eq!(
            case.error.is_retryable(),
            case.expected_retryable,
            "retryable for {}",
            case.error
        );
    }
}
