use mood_core::{ConfigError, CoreError, ErrorClass, ErrorExt, ErrorReporter, RedditApiError};

#[test]
fn test_error_codes() {
    let reddit_error = CoreError::RedditApi(RedditApiError::InvalidToken);
    assert_eq!(reddit_error.error_code(), "REDDIT_API");

    let config_error = CoreError::Config(ConfigError::MissingEnvironmentVariable {
        var_name: "REDDIT_CLIENT_ID".to_string(),
    });
    assert_eq!(config_error.error_code(), "CONFIG");

    let unavailable = CoreError::CollectorUnavailable {
        reason: "no credentials".to_string(),
    };
    assert_eq!(unavailable.error_code(), "COLLECTOR_UNAVAILABLE");

    let invalid = CoreError::InvalidInput {
        message: "Please enter a topic.".to_string(),
    };
    assert_eq!(invalid.error_code(), "INVALID_INPUT");
}

#[test]
fn test_reddit_api_error_codes() {
    let cases = [
        (
            RedditApiError::AuthenticationFailed {
                reason: "invalid_client".to_string(),
            },
            "REDDIT_AUTH_FAILED",
        ),
        (
            RedditApiError::RateLimitExceeded { retry_after: 30 },
            "REDDIT_RATE_LIMIT",
        ),
        (
            RedditApiError::Forbidden {
                resource: "/comments/p1".to_string(),
            },
            "REDDIT_FORBIDDEN",
        ),
        (RedditApiError::InvalidToken, "REDDIT_INVALID_TOKEN"),
        (RedditApiError::RequestTimeout, "REDDIT_TIMEOUT"),
        (
            RedditApiError::InvalidResponse {
                details: "Resource not found: /comments/p1".to_string(),
            },
            "REDDIT_INVALID_RESPONSE",
        ),
        (
            RedditApiError::ServerError { status_code: 502 },
            "REDDIT_SERVER_ERROR",
        ),
    ];

    for (error, code) in cases {
        assert_eq!(error.error_code(), code);
        assert!(!error.user_friendly_message().is_empty());
        assert!(CoreError::RedditApi(error).is_fetch_error());
    }
}

#[test]
fn test_error_classes() {
    let fetch_errors = [
        CoreError::RedditApi(RedditApiError::ServerError { status_code: 503 }),
        CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after: 60 }),
        CoreError::Timeout { seconds: 30 },
    ];
    for error in &fetch_errors {
        assert!(error.is_fetch_error(), "{error} should be a fetch error");
        assert!(!error.is_configuration_error());
    }

    let unavailable = CoreError::CollectorUnavailable {
        reason: "no credentials".to_string(),
    };
    assert!(unavailable.is_configuration_error());
    assert!(!unavailable.is_fetch_error());

    let invalid = CoreError::InvalidInput {
        message: "Please enter a topic.".to_string(),
    };
    assert!(!invalid.is_fetch_error());
    assert!(!invalid.is_configuration_error());
    assert_eq!(invalid.class(), ErrorClass::Validation);

    let internal = CoreError::Internal {
        message: "rate limiter closed".to_string(),
    };
    assert_eq!(internal.class(), ErrorClass::Internal);
    assert_eq!(internal.class().to_string(), "internal");
}

#[test]
fn test_user_friendly_messages() {
    let reddit_error = CoreError::RedditApi(RedditApiError::InvalidToken);
    let message = reddit_error.user_friendly_message();
    assert!(message.contains("authentication token is invalid"));

    let config_error = CoreError::Config(ConfigError::MissingEnvironmentVariable {
        var_name: "REDDIT_CLIENT_SECRET".to_string(),
    });
    assert!(config_error
        .user_friendly_message()
        .contains("REDDIT_CLIENT_SECRET"));

    let unavailable = CoreError::CollectorUnavailable {
        reason: "no credentials".to_string(),
    };
    assert!(unavailable.user_friendly_message().contains(".env"));

    let invalid = CoreError::InvalidInput {
        message: "Please enter a topic.".to_string(),
    };
    assert_eq!(invalid.user_friendly_message(), "Please enter a topic.");

    let rate_limited = CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after: 42 });
    assert!(rate_limited.user_friendly_message().contains("42 seconds"));
}

#[test]
fn test_error_reporter() {
    let reporter = ErrorReporter::new()
        .with_error_reporting(true)
        .with_warning_reporting(true);
    let error = CoreError::RedditApi(RedditApiError::InvalidToken);

    // This test just ensures the methods don't panic
    reporter.report_error(&error);
    reporter.report_warning(&error);
    reporter.report(&CoreError::InvalidInput {
        message: "Please enter a topic.".to_string(),
    });

    let silent = ErrorReporter::default()
        .with_error_reporting(false)
        .with_warning_reporting(false);
    silent.report(&error);
}
