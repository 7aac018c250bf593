use serde::Deserialize;

use super::ValidationError;
use crate::db::ResponseKind;

// Wire shape shared by a review's overall response and an annotation's
// response. Which fields are required depends on `type`.
#[derive(Debug, Default, Deserialize)]
pub struct ResponsePayload {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "mediaUrl")]
    pub media_url: Option<String>,
    #[serde(rename = "mediaSec")]
    pub media_sec: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Text(String),
    Audio { url: String, seconds: Option<i32> },
    Video { url: String, seconds: Option<i32> },
}

impl Response {
    pub fn kind(&self) -> ResponseKind {
        match self {
            Response::Text(_) => ResponseKind::Text,
            Response::Audio { .. } => ResponseKind::Audio,
            Response::Video { .. } => ResponseKind::Video,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Response::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn media_url(&self) -> Option<&str> {
        match self {
            Response::Audio { url, .. } | Response::Video { url, .. } => Some(url),
            Response::Text(_) => None,
        }
    }

    pub fn media_sec(&self) -> Option<i32> {
        match self {
            Response::Audio { seconds, .. } | Response::Video { seconds, .. } => *seconds,
            Response::Text(_) => None,
        }
    }
}

// `field` names the payload in error messages ("overall" or "response");
// the minimum text length differs between the two call sites.
pub fn validate_response(
    field: &str,
    min_text: usize,
    payload: &ResponsePayload,
) -> Result<Response, ValidationError> {
    match payload.kind.as_deref() {
        Some("TEXT") => {
            let text = payload.text.as_deref().unwrap_or("").trim();
            if text.chars().count() < min_text {
                return Err(ValidationError(format!(
                    "{field}.text must be at least {min_text} characters"
                )));
            }
            Ok(Response::Text(text.to_string()))
        }
        Some(kind @ ("AUDIO" | "VIDEO")) => {
            let url = payload.media_url.as_deref().unwrap_or("").trim();
            if url.is_empty() {
                return Err(ValidationError(format!(
                    "{field}.mediaUrl is required for AUDIO/VIDEO"
                )));
            }
            let seconds = payload.media_sec.and_then(coerce_seconds);
            let url = url.to_string();
            Ok(if kind == "AUDIO" {
                Response::Audio { url, seconds }
            } else {
                Response::Video { url, seconds }
            })
        }
        _ => Err(ValidationError(format!(
            "{field}.type must be TEXT, AUDIO, or VIDEO"
        ))),
    }
}

fn coerce_seconds(sec: f64) -> Option<i32> {
    if sec.is_finite() {
        Some(sec.floor().max(0.0) as i32)
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn text_payload(text: &str) -> ResponsePayload {
        ResponsePayload {
            kind: Some("TEXT".to_string()),
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let payload = ResponsePayload {
            kind: Some("IMAGE".to_string()),
            ..Default::default()
        };
        let err = validate_response("overall", 10, &payload).unwrap_err();
        assert_eq!(err.0, "overall.type must be TEXT, AUDIO, or VIDEO");

        let missing = ResponsePayload::default();
        assert!(validate_response("overall", 10, &missing).is_err());
    }

    #[test]
    fn text_length_is_checked_after_trimming() {
        // 9 characters: one short of the overall minimum
        assert!(validate_response("overall", 10, &text_payload("too short")).is_err());
        // exactly 10 passes
        let ok = validate_response("overall", 10, &text_payload("just right")).unwrap();
        assert_eq!(ok, Response::Text("just right".to_string()));
        // surrounding whitespace does not count toward the minimum
        assert!(validate_response("overall", 10, &text_payload("   too short   ")).is_err());
    }

    #[test]
    fn annotation_minimum_is_five() {
        assert_eq!(
            validate_response("response", 5, &text_payload("ok!")).unwrap_err().0,
            "response.text must be at least 5 characters"
        );
        // 4 characters is still one short
        assert!(validate_response("response", 5, &text_payload("good")).is_err());
        assert!(validate_response("response", 5, &text_payload("5char")).is_ok());
    }

    #[test]
    fn media_requires_a_url() {
        let payload = ResponsePayload {
            kind: Some("AUDIO".to_string()),
            media_url: Some("   ".to_string()),
            ..Default::default()
        };
        let err = validate_response("overall", 10, &payload).unwrap_err();
        assert_eq!(err.0, "overall.mediaUrl is required for AUDIO/VIDEO");
    }

    #[test]
    fn media_seconds_are_floored_and_clamped() {
        let payload = ResponsePayload {
            kind: Some("VIDEO".to_string()),
            media_url: Some("https://cdn.example.com/clip.mp4".to_string()),
            media_sec: Some(12.9),
            ..Default::default()
        };
        let response = validate_response("overall", 10, &payload).unwrap();
        assert_eq!(response.media_sec(), Some(12));
        assert_eq!(response.kind(), ResponseKind::Video);
        assert_eq!(response.text(), None);

        let negative = ResponsePayload {
            media_sec: Some(-3.0),
            ..payload
        };
        let response = validate_response("overall", 10, &negative).unwrap();
        assert_eq!(response.media_sec(), Some(0));
    }

    #[test]
    fn media_seconds_are_optional() {
        let payload = ResponsePayload {
            kind: Some("AUDIO".to_string()),
            media_url: Some("https://cdn.example.com/take.mp3".to_string()),
            ..Default::default()
        };
        let response = validate_response("response", 5, &payload).unwrap();
        assert_eq!(response.media_sec(), None);
        assert_eq!(
            response.media_url(),
            Some("https://cdn.example.com/take.mp3")
        );
    }
}
