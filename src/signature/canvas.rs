use crate::signature::SignatureArtifact;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use image::{GrayImage, ImageFormat};
use std::io::Cursor;

pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 300;

const BLANK: u8 = 0xff;
const INK: u8 = 0x00;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Hidden,
    Open,
}

#[derive(Debug, thiserror::Error)]
pub enum AcceptError {
    #[error("signature canvas is empty; draw a signature before saving")]
    EmptyCanvas,
    #[error("signature capture is not open")]
    NotOpen,
    #[error("failed to encode signature image: {0}")]
    Encode(String),
}

/// Freehand drawing surface backed by an 8-bit grayscale raster (white
/// background). Strokes only land while the capture is open; `Clear` swaps
/// in a fresh blank buffer and bumps the reset counter so a rendering layer
/// can force the surface to reinitialize.
#[derive(Debug, Clone)]
pub struct SignatureCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    state: CaptureState,
    reset_counter: u64,
}

impl Default for SignatureCanvas {
    fn default() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }
}

impl SignatureCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![BLANK; (width * height) as usize],
            state: CaptureState::Hidden,
            reset_counter: 0,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn reset_counter(&self) -> u64 {
        self.reset_counter
    }

    pub fn open(&mut self) {
        self.state = CaptureState::Open;
    }

    pub fn clear(&mut self) {
        self.pixels = vec![BLANK; (self.width * self.height) as usize];
        self.reset_counter += 1;
    }

    /// Discard the buffer and hide the surface; no artifact is created.
    pub fn cancel(&mut self) {
        self.clear();
        self.state = CaptureState::Hidden;
    }

    pub fn stroke(&mut self, points: &[(u32, u32)]) {
        if self.state != CaptureState::Open {
            return;
        }
        for &(x, y) in points {
            if x < self.width && y < self.height {
                self.pixels[(y * self.width + x) as usize] = INK;
            }
        }
    }

    /// Uniformly blank means the pixel sum equals the all-white sum.
    pub fn is_blank(&self) -> bool {
        let total: u64 = self.pixels.iter().map(|&p| u64::from(p)).sum();
        total >= u64::from(BLANK) * self.pixels.len() as u64
    }

    /// Accept the drawing: guard against a blank buffer, encode as PNG then
    /// base64, timestamp, and return the artifact. The surface returns to
    /// hidden with a fresh buffer.
    pub fn accept(&mut self) -> Result<SignatureArtifact, AcceptError> {
        if self.state != CaptureState::Open {
            return Err(AcceptError::NotOpen);
        }
        if self.is_blank() {
            return Err(AcceptError::EmptyCanvas);
        }
        let image = GrayImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| {
                AcceptError::Encode("raster buffer does not match canvas dimensions".to_string())
            })?;
        let mut encoded = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .map_err(|err| AcceptError::Encode(err.to_string()))?;
        let artifact = SignatureArtifact {
            base64_data: STANDARD.encode(&encoded),
            captured_at: Utc::now().timestamp(),
            format: "PNG".to_string(),
        };
        self.clear();
        self.state = CaptureState::Hidden;
        Ok(artifact)
    }
}
