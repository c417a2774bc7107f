/*!
 * Tests for provider clients and the mock translator
 */

use docs_translate::app_config::{ProviderConfig, TranslationProvider};
use docs_translate::errors::{ProviderError, TranslationError};
use docs_translate::providers::mock::{MockBehavior, MockTranslator, TRANSLATED_TAG};
use docs_translate::providers::openai::{OpenAI, OpenAIResponse};
use docs_translate::providers::{Provider, Translator};

fn openai_compatible(endpoint: &str) -> ProviderConfig {
    ProviderConfig {
        provider_type: TranslationProvider::OpenAI,
        model: "local-model".to_string(),
        endpoint: endpoint.to_string(),
        ..ProviderConfig::default()
    }
}

#[test]
fn test_from_config_withCompatibleServer_shouldNotRequireKey() {
    let client = OpenAI::from_config(&openai_compatible("http://localhost:1234/v1")).unwrap();
    assert_eq!(client.describe(), "OpenAI - local-model");
}

#[test]
fn test_from_config_withPublicOpenAIAndNoKey_shouldFail() {
    let result = OpenAI::from_config(&openai_compatible(""));
    assert!(matches!(result, Err(TranslationError::MissingCredentials(_))));
}

#[test]
fn test_completions_url_withTrailingPath_shouldAppendRoute() {
    let url = OpenAI::completions_url(&openai_compatible("http://localhost:1234/v1/")).unwrap();
    assert_eq!(url.as_str(), "http://localhost:1234/v1/chat/completions");
}

#[test]
fn test_completions_url_withInvalidEndpoint_shouldFail() {
    assert!(OpenAI::completions_url(&openai_compatible("not a url")).is_err());
}

#[test]
fn test_extract_text_shouldUseFirstChoice() {
    let response: OpenAIResponse = serde_json::from_str(
        r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "こんにちは"}, "finish_reason": "stop"},
                {"message": {"role": "assistant", "content": "other"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3}
        }"#,
    )
    .unwrap();

    assert_eq!(OpenAI::extract_text(&response).as_deref(), Some("こんにちは"));
    assert_eq!(response.usage.map(|u| u.completion_tokens), Some(3));
}

#[tokio::test]
async fn test_mock_failOn_shouldOnlyFailMatchingChunks() {
    let translator = MockTranslator::new(MockBehavior::FailOn("poison"));

    let ok = translator.translate("rules", "fine").await.unwrap();
    assert_eq!(ok, format!("{}fine", TRANSLATED_TAG));

    let err = translator.translate("rules", "poison pill").await;
    assert!(matches!(err, Err(TranslationError::Provider(ProviderError::ConnectionError(_)))));
    assert_eq!(translator.call_count(), 2);
}

#[tokio::test]
async fn test_mock_empty_shouldReturnEmptyResponse() {
    let translator = MockTranslator::new(MockBehavior::Empty);
    assert!(matches!(
        translator.translate("rules", "text").await,
        Err(TranslationError::EmptyResponse)
    ));
}

#[tokio::test]
async fn test_mock_shouldRecordInstructions() {
    let translator = MockTranslator::identity();
    translator.translate("system prompt", "body").await.unwrap();

    let calls = translator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].instructions, "system prompt");
    assert_eq!(translator.describe(), "Mock - Identity");
}

/// Serve one canned HTTP response on a local port
///
/// Returns the endpoint to configure and a handle yielding the raw request.
async fn serve_once(status: &str, body: &str) -> (String, tokio::task::JoinHandle<String>) {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];

        // read headers, then as much body as Content-Length announces
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&request);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if request.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{}/v1", addr), handle)
}

async fn translate_against(status: &str, body: &str) -> Result<String, TranslationError> {
    let (endpoint, server) = serve_once(status, body).await;
    let client = OpenAI::from_config(&openai_compatible(&endpoint)).unwrap();
    let result = client.translate("system rules", "# Title").await;
    server.await.unwrap();
    result
}

#[tokio::test]
async fn test_translate_withSuccessfulResponse_shouldReturnContent() {
    let (endpoint, server) = serve_once(
        "200 OK",
        r##"{"choices":[{"message":{"role":"assistant","content":"# タイトル"},"finish_reason":"stop"}]}"##,
    )
    .await;
    let client = OpenAI::from_config(&openai_compatible(&endpoint)).unwrap();

    let text = client.translate("system rules", "# Title").await.unwrap();
    let request = server.await.unwrap();

    assert_eq!(text, "# タイトル");
    assert!(request.starts_with("POST /v1/chat/completions"));
    assert!(request.contains(r#""role":"system","content":"system rules""#));
    assert!(request.contains(r##""role":"user","content":"# Title""##));
    assert!(request.contains(r#""model":"local-model""#));
}

#[tokio::test]
async fn test_translate_withTooManyRequests_shouldMapToRateLimit() {
    let result = translate_against("429 Too Many Requests", r#"{"error":{"message":"Rate limit is exceeded."}}"#).await;

    assert!(matches!(
        result,
        Err(TranslationError::Provider(ProviderError::RateLimitExceeded(ref m))) if m == "Rate limit is exceeded."
    ));
}

#[tokio::test]
async fn test_translate_withUnauthorizedOrForbidden_shouldMapToAuthentication() {
    for status in ["401 Unauthorized", "403 Forbidden"] {
        let result = translate_against(status, r#"{"error":{"message":"Access denied"}}"#).await;
        assert!(
            matches!(result, Err(TranslationError::Provider(ProviderError::AuthenticationError(_)))),
            "status {}: {:?}",
            status,
            result
        );
    }
}

#[tokio::test]
async fn test_translate_withServerError_shouldKeepStatusCode() {
    let result = translate_against("500 Internal Server Error", "upstream exploded").await;

    assert!(matches!(
        result,
        Err(TranslationError::Provider(ProviderError::ApiError { status_code: 500, ref message }))
            if message == "upstream exploded"
    ));
}

#[tokio::test]
async fn test_translate_withUndecodableBody_shouldReturnParseError() {
    let result = translate_against("200 OK", "definitely not json").await;
    assert!(matches!(result, Err(TranslationError::Provider(ProviderError::ParseError(_)))));
}

#[tokio::test]
async fn test_translate_withoutChoicesOrContent_shouldReturnEmptyResponse() {
    let no_choices = translate_against("200 OK", r#"{"choices":[]}"#).await;
    assert!(matches!(no_choices, Err(TranslationError::EmptyResponse)));

    let null_content = translate_against(
        "200 OK",
        r#"{"choices":[{"message":{"role":"assistant","content":null},"finish_reason":"content_filter"}]}"#,
    )
    .await;
    assert!(matches!(null_content, Err(TranslationError::EmptyResponse)));
}
