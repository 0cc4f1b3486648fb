//! Tests for the error system.

use pagesmith::error::*;
use pagesmith::types::GenerationResult;

#[test]
fn error_api_creation() {
    let err = PagesmithError::api(404, "Not found");
    assert!(matches!(&err, PagesmithError::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "API error (status 404): Not found");
}

#[test]
fn failure_reason_mapping_is_stable_for_major_variants() {
    struct Case {
        error: PagesmithError,
        expected: FailureReason,
    }

    let network_error = reqwest::Client::new()
        .get("http://[::1")
        .build()
        .unwrap_err();
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk");
    let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();

    let cases = vec![
        Case {
            error: PagesmithError::Authentication("bad-key".to_string()),
            expected: FailureReason::Authentication,
        },
        Case {
            error: PagesmithError::RateLimited {
                retry_after_ms: Some(1000),
            },
            expected: FailureReason::RateLimit,
        },
        Case {
            error: PagesmithError::Timeout(5000),
            expected: FailureReason::Timeout,
        },
        Case {
            error: PagesmithError::Network(network_error),
            expected: FailureReason::Transport,
        },
        Case {
            error: PagesmithError::Serialization(serde_error),
            expected: FailureReason::MalformedResponse,
        },
        Case {
            error: PagesmithError::MalformedResponse("no choices".to_string()),
            expected: FailureReason::MalformedResponse,
        },
        Case {
            error: PagesmithError::api(401, "Unauthorized"),
            expected: FailureReason::Authentication,
        },
        Case {
            error: PagesmithError::api(403, "Forbidden"),
            expected: FailureReason::Authentication,
        },
        Case {
            error: PagesmithError::api(429, "Rate limited"),
            expected: FailureReason::RateLimit,
        },
        Case {
            error: PagesmithError::api(504, "Gateway timeout"),
            expected: FailureReason::Timeout,
        },
        Case {
            error: PagesmithError::api(503, "Server unavailable"),
            expected: FailureReason::Upstream,
        },
        Case {
            error: PagesmithError::api(418, "Teapot"),
            expected: FailureReason::Upstream,
        },
        Case {
            error: PagesmithError::Configuration("bad-config".to_string()),
            expected: FailureReason::Internal,
        },
        Case {
            error: PagesmithError::Io(io_error),
            expected: FailureReason::Internal,
        },
    ];

    for case in cases {
        assert_eq!(
            case.error.failure_reason(),
            case.expected,
            "unexpected reason for {:?}",
            case.error
        );
    }
}

#[test]
fn rate_limit_message_renders_retry_hint() {
    let with_hint = PagesmithError::RateLimited {
        retry_after_ms: Some(1500),
    };
    let without_hint = PagesmithError::RateLimited {
        retry_after_ms: None,
    };

    assert_eq!(with_hint.to_string(), "Rate limited: retry after 1500ms");
    assert_eq!(without_hint.to_string(), "Rate limited");
}

#[test]
fn error_kinds_map_to_http_statuses() {
    let cases = [
        (ErrorKind::MissingCredential, 400),
        (ErrorKind::EmptyMessage, 400),
        (ErrorKind::NoDocumentAvailable, 400),
        (ErrorKind::ConfirmationRequired, 400),
        (ErrorKind::Busy, 409),
        (
            ErrorKind::GenerationFailed {
                reason: FailureReason::Timeout,
            },
            502,
        ),
        (ErrorKind::ExtractionFailed, 502),
    ];

    for (kind, status) in cases {
        assert_eq!(kind.status_code(), status, "{kind:?}");
    }
}

#[test]
fn failure_reason_parses_from_wire_name() {
    assert_eq!(
        "malformed_response".parse::<FailureReason>().unwrap(),
        FailureReason::MalformedResponse
    );
    assert_eq!(FailureReason::RateLimit.to_string(), "rate_limit");
    assert!("bogus".parse::<FailureReason>().is_err());
}

#[test]
fn error_result_explanation_is_the_kind_message() {
    let result = GenerationResult::from(ErrorKind::Busy);

    assert!(!result.is_success());
    assert!(result.document.is_none());
    assert_eq!(result.explanation, ErrorKind::Busy.to_string());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["error"]["kind"], "busy");
}
