use serde::Deserialize;

use super::response::{validate_response, Response, ResponsePayload};
use super::score::composite;
use super::{as_integer, ValidationError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub submission_id: Option<String>,
    #[serde(default)]
    pub overall: ResponsePayload,
    #[serde(default)]
    pub rubrics: RubricPayload,
}

#[derive(Debug, Default, Deserialize)]
pub struct RubricPayload {
    pub voice: Option<f64>,
    pub craft: Option<f64>,
    pub clarity: Option<f64>,
    pub affect: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RubricScores {
    pub voice: i32,
    pub craft: i32,
    pub clarity: i32,
    pub affect: i32,
}

impl RubricScores {
    pub fn validate(payload: &RubricPayload) -> Result<Self, ValidationError> {
        let scores = [payload.voice, payload.craft, payload.clarity, payload.affect]
            .map(|value| int_in_range(value, 1, 100));
        match scores {
            [Some(voice), Some(craft), Some(clarity), Some(affect)] => Ok(Self {
                voice,
                craft,
                clarity,
                affect,
            }),
            _ => Err(ValidationError(
                "All rubrics must be integers 1-100".to_string(),
            )),
        }
    }
}

fn int_in_range(value: Option<f64>, min: i64, max: i64) -> Option<i32> {
    let n = as_integer(value)?;
    if (min..=max).contains(&n) {
        Some(n as i32)
    } else {
        None
    }
}

// A fully validated review, ready for the store gateway. The composite is
// derived here so every persisted review carries a score consistent with its
// rubrics.
#[derive(Debug)]
pub struct ReviewDraft {
    pub submission_id: String,
    pub overall: Response,
    pub rubrics: RubricScores,
    pub composite: f64,
}

impl ReviewDraft {
    pub fn validate(request: ReviewRequest) -> Result<Self, ValidationError> {
        let submission_id = request.submission_id.unwrap_or_default();
        if submission_id.is_empty() {
            return Err(ValidationError("submissionId is required".to_string()));
        }

        let overall = validate_response("overall", 10, &request.overall)?;
        let rubrics = RubricScores::validate(&request.rubrics)?;
        let composite = composite(rubrics.voice, rubrics.craft, rubrics.clarity, rubrics.affect);

        Ok(Self {
            submission_id,
            overall,
            rubrics,
            composite,
        })
    }
}
