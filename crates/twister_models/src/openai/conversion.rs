//! Conversions between Twister and chat-completions types.

use super::dto::{ChatCompletionRequest, ChatCompletionResponse, OpenAIMessage, ResponseFormat};
use twister_core::{GenerateRequest, GenerateResponse};
use twister_error::{TransportError, TransportErrorKind, TwisterResult, ValidationError};

/// Converts a Twister request to a chat-completions body.
///
/// The request's model overrides `default_model`.
pub fn to_openai_request(
    request: &GenerateRequest,
    default_model: &str,
) -> TwisterResult<ChatCompletionRequest> {
    let messages = request
        .messages
        .iter()
        .map(|message| OpenAIMessage::new(message.role, message.content.clone()))
        .collect::<Vec<_>>();

    let model = request
        .model
        .clone()
        .unwrap_or_else(|| default_model.to_string());

    let mut builder = ChatCompletionRequest::builder();
    builder.model(model).messages(messages);

    if let Some(max_tokens) = request.max_tokens {
        builder.max_tokens(max_tokens);
    }

    if let Some(temperature) = request.temperature {
        builder.temperature(temperature);
    }

    if request.json_mode {
        builder.response_format(ResponseFormat::JsonObject);
    }

    builder
        .build()
        .map_err(|e| ValidationError::from(e.to_string()).into())
}

/// Extracts the first assistant turn.
///
/// A response with no choices, or whose first choice has no content, is
/// [`TransportErrorKind::EmptyChoice`].
pub fn from_openai_response(response: &ChatCompletionResponse) -> TwisterResult<GenerateResponse> {
    let content = response
        .choices()
        .first()
        .and_then(|choice| choice.message().content().clone())
        .ok_or_else(|| TransportError::new(TransportErrorKind::EmptyChoice))?;

    Ok(GenerateResponse::from_text(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use twister_core::Message;
    use twister_error::TwisterErrorKind;

    #[test]
    fn test_json_mode_sets_response_format() {
        let request = GenerateRequest::builder()
            .messages(vec![
                Message::system("You are a helpful assistant designed to output JSON."),
                Message::user("Give me a twist"),
            ])
            .json_mode(true)
            .build()
            .unwrap();

        let body = to_openai_request(&request, "gpt-3.5-turbo-1106").unwrap();
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["model"], "gpt-3.5-turbo-1106");
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "Give me a twist");
        assert!(value.get("temperature").is_none());
    }

    #[test]
    fn test_text_mode_omits_response_format_and_honours_model_override() {
        let request = GenerateRequest::builder()
            .messages(vec![Message::user("Tell me a story")])
            .model("gpt-4o-mini".to_string())
            .temperature(0.7f32)
            .build()
            .unwrap();

        let body = to_openai_request(&request, "gpt-3.5-turbo-1106").unwrap();
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["model"], "gpt-4o-mini");
        assert!(value.get("response_format").is_none());
        assert!(value["temperature"].as_f64().is_some());
    }

    #[test]
    fn test_first_choice_content_is_returned() {
        let raw = r#"{
            "model": "gpt-3.5-turbo-1106",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "{\"0\": {}}"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        let converted = from_openai_response(&response).unwrap();
        assert_eq!(converted.text().as_deref(), Some("{\"0\": {}}"));
        assert_eq!(response.usage().as_ref().map(|u| *u.total_tokens()), Some(15));
    }

    #[test]
    fn test_empty_choices_is_empty_choice_error() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let err = from_openai_response(&response).unwrap_err();
        match err.kind() {
            TwisterErrorKind::Transport(e) => {
                assert_eq!(e.kind(), &TransportErrorKind::EmptyChoice)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_null_content_is_empty_choice_error() {
        let raw = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert!(from_openai_response(&response).is_err());
    }
}
