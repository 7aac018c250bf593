use serde::Deserialize;

use super::response::{validate_response, Response, ResponsePayload};
use super::{as_integer, ValidationError};
use crate::db::AnchorKind;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorPayload {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub start_sec: Option<f64>,
    pub end_sec: Option<f64>,
    pub start_char: Option<f64>,
    pub end_char: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct AnnotationRequest {
    pub kind: Option<String>,
    #[serde(default)]
    pub anchor: AnchorPayload,
    #[serde(default)]
    pub response: ResponsePayload,
}

// One variant per anchor kind so a pin can never carry span fields and vice
// versa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    ImagePin { x: f64, y: f64 },
    TimePoint { start_sec: i32 },
    TimeRange { start_sec: i32, end_sec: i32 },
    TextSpan { start_char: i32, end_char: i32 },
}

impl Anchor {
    pub fn kind(&self) -> AnchorKind {
        match self {
            Anchor::ImagePin { .. } => AnchorKind::ImagePin,
            Anchor::TimePoint { .. } => AnchorKind::TimePoint,
            Anchor::TimeRange { .. } => AnchorKind::TimeRange,
            Anchor::TextSpan { .. } => AnchorKind::TextSpan,
        }
    }

    pub fn pin(&self) -> (Option<f64>, Option<f64>) {
        match *self {
            Anchor::ImagePin { x, y } => (Some(x), Some(y)),
            _ => (None, None),
        }
    }

    pub fn time_span(&self) -> (Option<i32>, Option<i32>) {
        match *self {
            Anchor::TimePoint { start_sec } => (Some(start_sec), None),
            Anchor::TimeRange { start_sec, end_sec } => (Some(start_sec), Some(end_sec)),
            _ => (None, None),
        }
    }

    pub fn char_span(&self) -> (Option<i32>, Option<i32>) {
        match *self {
            Anchor::TextSpan {
                start_char,
                end_char,
            } => (Some(start_char), Some(end_char)),
            _ => (None, None),
        }
    }
}

fn validate_anchor(kind: Option<&str>, anchor: &AnchorPayload) -> Result<Anchor, ValidationError> {
    match kind {
        Some("IMAGE_PIN") => match (anchor.x, anchor.y) {
            (Some(x), Some(y))
                if x.is_finite()
                    && y.is_finite()
                    && (0.0..=1.0).contains(&x)
                    && (0.0..=1.0).contains(&y) =>
            {
                Ok(Anchor::ImagePin { x, y })
            }
            _ => Err(ValidationError(
                "IMAGE_PIN requires x,y in [0..1]".to_string(),
            )),
        },
        Some("TIME_POINT") => match as_integer(anchor.start_sec) {
            Some(start_sec) if start_sec >= 0 => Ok(Anchor::TimePoint {
                start_sec: start_sec as i32,
            }),
            _ => Err(ValidationError(
                "TIME_POINT requires startSec >= 0".to_string(),
            )),
        },
        Some("TIME_RANGE") => match (as_integer(anchor.start_sec), as_integer(anchor.end_sec)) {
            // zero-length ranges are allowed
            (Some(start_sec), Some(end_sec)) if start_sec >= 0 && end_sec >= start_sec => {
                Ok(Anchor::TimeRange {
                    start_sec: start_sec as i32,
                    end_sec: end_sec as i32,
                })
            }
            _ => Err(ValidationError(
                "TIME_RANGE requires startSec >= 0 and endSec >= startSec".to_string(),
            )),
        },
        Some("TEXT_SPAN") => match (as_integer(anchor.start_char), as_integer(anchor.end_char)) {
            // unlike TIME_RANGE, a span must cover at least one character
            (Some(start_char), Some(end_char)) if start_char >= 0 && end_char > start_char => {
                Ok(Anchor::TextSpan {
                    start_char: start_char as i32,
                    end_char: end_char as i32,
                })
            }
            _ => Err(ValidationError(
                "TEXT_SPAN requires startChar >= 0 and endChar > startChar".to_string(),
            )),
        },
        _ => Err(ValidationError("Invalid annotation kind".to_string())),
    }
}

#[derive(Debug)]
pub struct AnnotationDraft {
    pub anchor: Anchor,
    pub response: Response,
}

impl AnnotationDraft {
    pub fn validate(request: AnnotationRequest) -> Result<Self, ValidationError> {
        let anchor = validate_anchor(request.kind.as_deref(), &request.anchor)?;
        let response = validate_response("response", 5, &request.response)?;
        Ok(Self { anchor, response })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn request(kind: &str, anchor: AnchorPayload) -> AnnotationRequest {
        AnnotationRequest {
            kind: Some(kind.to_string()),
            anchor,
            response: ResponsePayload {
                kind: Some("TEXT".to_string()),
                text: Some("A note on this spot.".to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = AnnotationDraft::validate(request("PIN", AnchorPayload::default())).unwrap_err();
        assert_eq!(err.0, "Invalid annotation kind");

        let mut missing = request("IMAGE_PIN", AnchorPayload::default());
        missing.kind = None;
        assert!(AnnotationDraft::validate(missing).is_err());
    }

    #[test]
    fn image_pin_accepts_the_unit_square_boundaries() {
        for (x, y) in [(0.0, 0.0), (1.0, 1.0), (0.5, 1.0), (0.0, 0.25)] {
            let anchor = AnchorPayload {
                x: Some(x),
                y: Some(y),
                ..Default::default()
            };
            let draft = AnnotationDraft::validate(request("IMAGE_PIN", anchor)).unwrap();
            assert_eq!(draft.anchor, Anchor::ImagePin { x, y });
        }
    }

    #[test]
    fn image_pin_rejects_coordinates_outside_the_unit_square() {
        for (x, y) in [(-0.0001, 0.5), (0.5, 1.0001), (2.0, 0.0), (0.0, -1.0)] {
            let anchor = AnchorPayload {
                x: Some(x),
                y: Some(y),
                ..Default::default()
            };
            let err = AnnotationDraft::validate(request("IMAGE_PIN", anchor)).unwrap_err();
            assert_eq!(err.0, "IMAGE_PIN requires x,y in [0..1]");
        }
    }

    #[test]
    fn time_point_requires_a_non_negative_integer() {
        let ok = AnchorPayload {
            start_sec: Some(0.0),
            ..Default::default()
        };
        let draft = AnnotationDraft::validate(request("TIME_POINT", ok)).unwrap();
        assert_eq!(draft.anchor, Anchor::TimePoint { start_sec: 0 });

        for bad in [Some(-1.0), Some(1.5), None] {
            let anchor = AnchorPayload {
                start_sec: bad,
                ..Default::default()
            };
            assert!(AnnotationDraft::validate(request("TIME_POINT", anchor)).is_err());
        }
    }

    #[test]
    fn time_range_permits_zero_length() {
        let anchor = AnchorPayload {
            start_sec: Some(30.0),
            end_sec: Some(30.0),
            ..Default::default()
        };
        let draft = AnnotationDraft::validate(request("TIME_RANGE", anchor)).unwrap();
        assert_eq!(
            draft.anchor,
            Anchor::TimeRange {
                start_sec: 30,
                end_sec: 30
            }
        );
    }

    #[test]
    fn time_range_rejects_inverted_or_negative_bounds() {
        for (start, end) in [(10.0, 9.0), (-1.0, 5.0)] {
            let anchor = AnchorPayload {
                start_sec: Some(start),
                end_sec: Some(end),
                ..Default::default()
            };
            assert!(AnnotationDraft::validate(request("TIME_RANGE", anchor)).is_err());
        }
    }

    #[test]
    fn text_span_requires_positive_length() {
        let zero = AnchorPayload {
            start_char: Some(5.0),
            end_char: Some(5.0),
            ..Default::default()
        };
        let err = AnnotationDraft::validate(request("TEXT_SPAN", zero)).unwrap_err();
        assert_eq!(err.0, "TEXT_SPAN requires startChar >= 0 and endChar > startChar");

        let ok = AnchorPayload {
            start_char: Some(5.0),
            end_char: Some(6.0),
            ..Default::default()
        };
        let draft = AnnotationDraft::validate(request("TEXT_SPAN", ok)).unwrap();
        assert_eq!(
            draft.anchor,
            Anchor::TextSpan {
                start_char: 5,
                end_char: 6
            }
        );
    }

    #[test]
    fn anchor_is_checked_before_the_response() {
        // both the zero-length span and the 3-character response are invalid;
        // the anchor failure is the one reported
        let mut bad = request(
            "TEXT_SPAN",
            AnchorPayload {
                start_char: Some(5.0),
                end_char: Some(5.0),
                ..Default::default()
            },
        );
        bad.response.text = Some("ok!".to_string());
        let err = AnnotationDraft::validate(bad).unwrap_err();
        assert_eq!(err.0, "TEXT_SPAN requires startChar >= 0 and endChar > startChar");
    }

    #[test]
    fn response_minimum_is_five_characters() {
        let mut short = request(
            "TIME_POINT",
            AnchorPayload {
                start_sec: Some(12.0),
                ..Default::default()
            },
        );
        short.response.text = Some("ok!".to_string());
        let err = AnnotationDraft::validate(short).unwrap_err();
        assert_eq!(err.0, "response.text must be at least 5 characters");
    }

    #[test]
    fn column_accessors_only_fill_their_own_kind() {
        let pin = Anchor::ImagePin { x: 0.25, y: 0.75 };
        assert_eq!(pin.pin(), (Some(0.25), Some(0.75)));
        assert_eq!(pin.time_span(), (None, None));
        assert_eq!(pin.char_span(), (None, None));

        let point = Anchor::TimePoint { start_sec: 7 };
        assert_eq!(point.time_span(), (Some(7), None));
        assert_eq!(point.pin(), (None, None));
    }
}
