//! Story3 request and response bodies.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use twister_core::Twist;

/// Body of `POST stories`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateStoryRequest<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

impl<'a> From<&'a Twist> for CreateStoryRequest<'a> {
    fn from(twist: &'a Twist) -> Self {
        Self {
            title: &twist.title,
            body: &twist.body,
        }
    }
}

/// Body of `POST twists`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateTwistRequest<'a> {
    pub hash_parent_id: &'a str,
    pub is_extra_twist: bool,
    pub title: &'a str,
    pub body: &'a str,
}

impl<'a> CreateTwistRequest<'a> {
    pub fn new(hash_parent_id: &'a str, twist: &'a Twist) -> Self {
        Self {
            hash_parent_id,
            is_extra_twist: true,
            title: &twist.title,
            body: &twist.body,
        }
    }
}

/// The part of a creation response we keep.
#[derive(Debug, Clone, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatedResponse {
    hash_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_twist_request_uses_camel_case() {
        let twist = Twist::new("Climb", "You climb the stairs.");
        let value = serde_json::to_value(CreateTwistRequest::new("abc123", &twist)).unwrap();
        assert_eq!(
            value,
            json!({
                "hashParentId": "abc123",
                "isExtraTwist": true,
                "title": "Climb",
                "body": "You climb the stairs."
            })
        );
    }

    #[test]
    fn test_created_response_ignores_extra_fields() {
        let response: CreatedResponse =
            serde_json::from_value(json!({ "hashId": "h1", "status": "draft" })).unwrap();
        assert_eq!(response.hash_id(), "h1");
    }
}
