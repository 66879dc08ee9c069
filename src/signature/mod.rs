pub mod canvas;

pub use canvas::{AcceptError, CaptureState, SignatureCanvas, CANVAS_HEIGHT, CANVAS_WIDTH};

use serde::{Deserialize, Serialize};

/// Phrases in agent replies that should surface the signature pad.
pub const SIGNATURE_TRIGGER_KEYWORDS: &[&str] = &[
    "signature",
    "sign here",
    "please sign",
    "digital signature",
    "electronic signature",
    "draw your signature",
    "provide signature",
    "signature pad",
    "signature required",
    "signature needed",
];

pub fn requests_signature(text: &str) -> bool {
    let lowered = text.to_lowercase();
    SIGNATURE_TRIGGER_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// Accepted signature image. At most one lives per session; a later accept
/// overwrites it, and it persists until sign-out or an explicit clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureArtifact {
    pub base64_data: String,
    /// Unix seconds at accept time.
    pub captured_at: i64,
    pub format: String,
}
