use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Cutoff applied to the model's scalar output. Strictly greater than the
/// threshold counts as a stroke; exactly 0.5 is Normal.
pub const STROKE_THRESHOLD: f32 = 0.5;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Display)]
pub enum Verdict {
    #[serde(rename = "Stroke Detected")]
    #[strum(serialize = "Stroke Detected")]
    StrokeDetected,
    #[serde(rename = "Normal")]
    #[strum(serialize = "Normal")]
    Normal,
}

impl Verdict {
    pub fn from_probability(probability: f32) -> Self {
        if probability > STROKE_THRESHOLD {
            Verdict::StrokeDetected
        } else {
            Verdict::Normal
        }
    }

    pub fn is_stroke(self) -> bool {
        self == Verdict::StrokeDetected
    }

    pub fn advisory(self) -> &'static str {
        match self {
            Verdict::StrokeDetected => "Please consult a medical professional.",
            Verdict::Normal => "No signs of stroke detected.",
        }
    }

    pub fn toast_message(self) -> &'static str {
        match self {
            Verdict::StrokeDetected => "Stroke Detected! Please consult a medical professional.",
            Verdict::Normal => "No signs of stroke detected.",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InferenceResponse {
    pub probability: f32,
    pub verdict: Verdict,
    pub advisory: String,
}

impl InferenceResponse {
    pub fn from_probability(probability: f32) -> Self {
        let verdict = Verdict::from_probability(probability);
        Self {
            probability,
            verdict,
            advisory: verdict.advisory().to_string(),
        }
    }
}
