//! End-to-end behaviour of the identify and suggest actions, with a
//! recording model client and a mock image host.

mod common;

#[cfg(test)]
mod action_tests {
    use super::common::{NO_FONTS, PNG_DATA_URI, RecordingClient, THREE_FONTS};
    use fontsnap::action::{
        INVALID_URL_MESSAGE, MISSING_DESCRIPTION_MESSAGE, MISSING_IMAGE_MESSAGE,
        NO_DESCRIBED_FONTS_MESSAGE,
    };
    use fontsnap::flows::{DESCRIBE_PROMPT, IDENTIFY_PROMPT};
    use fontsnap::render::confidence_percent;
    use fontsnap::{
        ActionOutcome, FontSnap, FontSnapError, IdentifyFontRequest, ImageFetcher,
        SuggestFontsRequest,
    };
    use httpmock::prelude::*;

    const FETCH_FAILURE: &str = "Could not process the image from the provided URL. Please check the URL or try uploading the image directly.";

    #[tokio::test]
    async fn test_no_image_source_returns_error_without_calling_model() {
        let service = FontSnap::new(RecordingClient::answering(THREE_FONTS));

        let outcome = service.identify_font(&IdentifyFontRequest::default()).await;

        assert_eq!(outcome, ActionOutcome::error(MISSING_IMAGE_MESSAGE));
        assert!(outcome.suggestions().is_none());
        assert!(service.client().calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_url_is_rejected() {
        let service = FontSnap::new(RecordingClient::answering(THREE_FONTS));

        let outcome = service
            .identify_font(&IdentifyFontRequest::from_url("example dot com"))
            .await;

        assert_eq!(outcome.error_message(), Some(INVALID_URL_MESSAGE));
        assert!(service.client().calls().is_empty());
    }

    #[tokio::test]
    async fn test_data_uri_is_forwarded_unchanged() {
        let service = FontSnap::new(RecordingClient::answering(THREE_FONTS));

        let outcome = service
            .identify_font(&IdentifyFontRequest::from_data_uri(PNG_DATA_URI))
            .await;

        let suggestions = outcome.suggestions().expect("expected suggestions");
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].font_name, "Helvetica Neue");

        let calls = service.client().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, IDENTIFY_PROMPT);
        assert_eq!(calls[0].media.len(), 1);
        assert_eq!(calls[0].media[0].to_data_uri().as_deref(), Some(PNG_DATA_URI));
    }

    #[tokio::test]
    async fn test_empty_suggestions_become_an_error() {
        let service = FontSnap::new(RecordingClient::answering(NO_FONTS));

        let outcome = service
            .identify_font(&IdentifyFontRequest::from_data_uri(PNG_DATA_URI))
            .await;

        assert_eq!(
            outcome,
            ActionOutcome::error("Could not identify any fonts. Try a different image.")
        );

        let err = service
            .try_identify_font(&IdentifyFontRequest::from_data_uri(PNG_DATA_URI))
            .await
            .unwrap_err();
        assert_eq!(err, FontSnapError::NoSuggestions);
    }

    #[tokio::test]
    async fn test_model_failure_is_surfaced_as_text() {
        let service = FontSnap::new(RecordingClient::failing("quota exceeded"));

        let outcome = service
            .identify_font(&IdentifyFontRequest::from_data_uri(PNG_DATA_URI))
            .await;

        assert_eq!(outcome.error_message(), Some("API error: quota exceeded"));
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_a_model_failure() {
        let service = FontSnap::new(RecordingClient::answering(
            r#"{"suggestions":[{"fontName":"Arial"}]}"#,
        ));

        let err = service
            .try_identify_font(&IdentifyFontRequest::from_data_uri(PNG_DATA_URI))
            .await
            .unwrap_err();

        assert!(matches!(err, FontSnapError::ValidationError(_)), "{err:?}");
        assert_eq!(err.category(), fontsnap::ErrorCategory::Model);
    }

    #[tokio::test]
    async fn test_image_url_is_fetched_and_inlined() {
        let server = MockServer::start();
        let image = server.mock(|when, then| {
            when.method(GET).path("/poster.png");
            then.status(200)
                .header("Content-Type", "image/png")
                .body("abc");
        });
        let service = FontSnap::new(RecordingClient::answering(THREE_FONTS));

        let outcome = service
            .identify_font(&IdentifyFontRequest::from_url(server.url("/poster.png")))
            .await;

        image.assert();
        assert!(!outcome.is_error(), "{outcome:?}");
        let calls = service.client().calls();
        assert_eq!(
            calls[0].media[0].to_data_uri().as_deref(),
            Some("data:image/png;base64,YWJj")
        );
    }

    #[tokio::test]
    async fn test_non_image_url_fails_with_fetch_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/index.html");
            then.status(200)
                .header("Content-Type", "text/html; charset=utf-8")
                .body("<html></html>");
        });
        let service = FontSnap::new(RecordingClient::answering(THREE_FONTS));
        let request = IdentifyFontRequest::from_url(server.url("/index.html"));

        let outcome = service.identify_font(&request).await;
        assert_eq!(outcome.error_message(), Some(FETCH_FAILURE));

        let err = service.try_identify_font(&request).await.unwrap_err();
        assert_eq!(
            err,
            FontSnapError::FetchError("URL does not point to a valid image.".into())
        );
        assert!(service.client().calls().is_empty());
    }

    #[tokio::test]
    async fn test_url_is_ignored_when_data_uri_present() {
        let server = MockServer::start();
        let image = server.mock(|when, then| {
            when.method(GET).path("/other.png");
            then.status(200).header("Content-Type", "image/png").body("x");
        });
        let service = FontSnap::with_fetcher(
            RecordingClient::answering(THREE_FONTS),
            ImageFetcher::new(),
        );

        let request = IdentifyFontRequest {
            image_data_uri: Some(PNG_DATA_URI.to_string()),
            image_url: Some(server.url("/other.png")),
        };
        let outcome = service.identify_font(&request).await;

        assert!(!outcome.is_error());
        image.assert_hits(0);
        assert_eq!(
            service.client().calls()[0].media[0].to_data_uri().as_deref(),
            Some(PNG_DATA_URI)
        );
    }

    #[tokio::test]
    async fn test_rendered_confidence_matches_model_value() {
        let service = FontSnap::new(RecordingClient::answering(THREE_FONTS));
        let outcome = service
            .identify_font(&IdentifyFontRequest::from_data_uri(PNG_DATA_URI))
            .await;

        let percents: Vec<i64> = outcome
            .suggestions()
            .unwrap()
            .iter()
            .map(|s| confidence_percent(s.confidence_level))
            .collect();
        assert_eq!(percents, vec![87, 61, 40]);
    }

    #[tokio::test]
    async fn test_suggest_fonts_embeds_description() {
        let service = FontSnap::new(RecordingClient::answering(
            r#"{"suggestions":[{"fontName":"Playfair Display","confidence":0.8,"purchaseUrl":"https://fonts.google.com/specimen/Playfair+Display"}]}"#,
        ));

        let outcome = service
            .suggest_fonts(&SuggestFontsRequest {
                description: "  elegant high-contrast serif  ".to_string(),
            })
            .await;

        assert_eq!(outcome.suggestions().unwrap()[0].font_name, "Playfair Display");
        let calls = service.client().calls();
        assert_eq!(
            calls[0].prompt,
            DESCRIBE_PROMPT.replace("{description}", "elegant high-contrast serif")
        );
        assert!(calls[0].media.is_empty());
    }

    #[tokio::test]
    async fn test_suggest_fonts_rejects_blank_and_empty_results() {
        let service = FontSnap::new(RecordingClient::answering(NO_FONTS));

        let blank = service
            .suggest_fonts(&SuggestFontsRequest { description: " ".into() })
            .await;
        assert_eq!(blank.error_message(), Some(MISSING_DESCRIPTION_MESSAGE));
        assert!(service.client().calls().is_empty());

        let empty = service
            .suggest_fonts(&SuggestFontsRequest { description: "grotesque".into() })
            .await;
        assert_eq!(empty.error_message(), Some(NO_DESCRIBED_FONTS_MESSAGE));
    }
}
