#[cfg(test)]
mod error_tests {
    use fontsnap::{ErrorCategory, FontSnapError, Result};
    use serde_json::json;

    #[test]
    fn test_api_error() {
        let err = FontSnapError::ApiError("API connection failed".to_string());
        assert_eq!(format!("{}", err), "API error: API connection failed");
        assert_eq!(err.category(), ErrorCategory::Model);
    }

    #[test]
    fn test_validation_error() {
        let err = FontSnapError::ValidationError("Invalid data".to_string());
        assert_eq!(format!("{}", err), "Validation error: Invalid data");
    }

    #[test]
    fn test_schema_error() {
        let err = FontSnapError::SchemaError("Invalid schema".to_string());
        assert_eq!(format!("{}", err), "Schema error: Invalid schema");
        assert_eq!(err.category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_invalid_input_shows_its_own_text() {
        let err = FontSnapError::InvalidInput("Invalid URL provided.".to_string());
        assert_eq!(err.to_string(), "Invalid URL provided.");
        assert_eq!(err.user_message(), "Invalid URL provided.");
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
    }

    #[test]
    fn test_fetch_error_hides_cause_from_users() {
        let err = FontSnapError::FetchError("Failed to fetch image: Not Found".to_string());
        assert_eq!(err.to_string(), "Fetch error: Failed to fetch image: Not Found");
        assert_eq!(
            err.user_message(),
            "Could not process the image from the provided URL. Please check the URL or try uploading the image directly."
        );
        assert_eq!(err.category(), ErrorCategory::Fetch);
    }

    #[test]
    fn test_no_suggestions_message() {
        let err = FontSnapError::NoSuggestions;
        assert_eq!(err.to_string(), "Could not identify any fonts. Try a different image.");
        assert_eq!(err.user_message(), err.to_string());
    }

    #[test]
    fn test_timeout_is_a_model_failure() {
        assert_eq!(FontSnapError::Timeout.to_string(), "Timeout error");
        assert_eq!(FontSnapError::Timeout.category(), ErrorCategory::Model);
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_value::<String>(json!(42)).unwrap_err();

        let err: FontSnapError = json_err.into();

        match err {
            FontSnapError::JsonError(_) => {}
            other => panic!("Expected JsonError, got {:?}", other),
        }
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert_eq!(ok_result, Ok(42));

        let err_result: Result<i32> = Err(FontSnapError::ValidationError("test error".to_string()));
        assert!(err_result.is_err());
    }
}
