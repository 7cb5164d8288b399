//! Live camera panel fed by tracker frames.
//!
//! Shows a placeholder until the first frame arrives, then swaps to a live
//! image that is updated in place - the texture is created exactly once and
//! only its pixels change afterwards. A frame that fails to decode keeps
//! the view as it is and surfaces the error as a status message.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Local};
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use thiserror::Error;
use tracing::{debug, warn};

use crate::tracker::CameraFramePayload;
use crate::ui::common::{create_frame, UiColors};

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("invalid frame encoding: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid frame image: {0}")]
    Image(#[from] image::ImageError),
}

/// Decodes a base64 JPEG frame into an egui color image.
pub fn decode_frame(frame_b64: &str) -> Result<ColorImage, CameraError> {
    let bytes = BASE64.decode(frame_b64.trim())?;
    let rgba = image::load_from_memory(&bytes)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Camera panel state.
pub struct CameraView {
    texture: Option<TextureHandle>,
    head_direction: String,
    blink_count: u64,
    frames_received: u64,
    last_frame_at: Option<DateTime<Local>>,
}

impl CameraView {
    pub fn new() -> Self {
        Self {
            texture: None,
            head_direction: String::new(),
            blink_count: 0,
            frames_received: 0,
            last_frame_at: None,
        }
    }

    /// True once the placeholder has been replaced by live frames.
    pub fn is_live(&self) -> bool {
        self.texture.is_some()
    }

    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }

    pub fn blink_count(&self) -> u64 {
        self.blink_count
    }

    /// Wall-clock time of the last good frame.
    pub fn last_frame_at(&self) -> Option<DateTime<Local>> {
        self.last_frame_at
    }

    /// Texture id of the live view, if any. Stable across frame updates.
    pub fn texture_id(&self) -> Option<egui::TextureId> {
        self.texture.as_ref().map(|t| t.id())
    }

    /// Ingests one frame payload and returns the status line to show.
    ///
    /// The first good frame creates the texture; later ones update its
    /// pixels. A malformed payload returns a camera error status and leaves
    /// the view untouched.
    pub fn push_frame(&mut self, ctx: &egui::Context, payload: &CameraFramePayload) -> String {
        match decode_frame(&payload.frame) {
            Ok(image) => {
                match &mut self.texture {
                    Some(texture) => texture.set(image, TextureOptions::LINEAR),
                    None => {
                        debug!("First camera frame received, replacing placeholder");
                        self.texture =
                            Some(ctx.load_texture("camera-frame", image, TextureOptions::LINEAR));
                    }
                }

                self.head_direction = payload.head_direction.clone();
                self.blink_count = payload.blink_count;
                self.frames_received += 1;
                self.last_frame_at = Some(Local::now());

                format!(
                    "Head: {} | Blinks: {}",
                    self.head_direction, self.blink_count
                )
            }
            Err(e) => {
                warn!("Dropping undecodable camera frame: {}", e);
                format!("Camera error: {}", e)
            }
        }
    }

    /// Renders the live view or the placeholder.
    pub fn render(&self, ui: &mut egui::Ui) {
        create_frame(UiColors::EXTREME_BG, UiColors::BORDER).show(ui, |ui| {
            match &self.texture {
                Some(texture) => {
                    let available = ui.available_size();
                    let tex_size = texture.size_vec2();
                    let scale = (available.x / tex_size.x)
                        .min(available.y / tex_size.y)
                        .min(1.0);
                    ui.centered_and_justified(|ui| {
                        ui.add(
                            egui::Image::new(texture)
                                .fit_to_exact_size(tex_size * scale.max(0.1)),
                        );
                    });
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.label("Waiting for camera feed from gesture tracker...");
                    });
                }
            }
        });
    }
}

impl Default for CameraView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;

    /// Builds a valid base64-encoded JPEG payload in memory.
    fn jpeg_payload(head_direction: &str, blink_count: u64) -> CameraFramePayload {
        let pixels = image::RgbImage::from_pixel(4, 4, image::Rgb([10, 200, 40]));
        let mut bytes = Vec::new();
        let mut encoder = JpegEncoder::new(&mut bytes);
        encoder
            .encode_image(&image::DynamicImage::ImageRgb8(pixels))
            .unwrap();

        CameraFramePayload {
            frame: BASE64.encode(&bytes),
            head_direction: head_direction.to_string(),
            blink_count,
        }
    }

    #[test]
    fn decodes_a_valid_frame() {
        let payload = jpeg_payload("Left", 1);
        let image = decode_frame(&payload.frame).unwrap();
        assert_eq!(image.size, [4, 4]);
    }

    #[test]
    fn rejects_bad_base64() {
        assert!(matches!(
            decode_frame("not base64!!!"),
            Err(CameraError::Base64(_))
        ));
    }

    #[test]
    fn rejects_non_jpeg_bytes() {
        let bogus = BASE64.encode(b"definitely not a jpeg");
        assert!(matches!(decode_frame(&bogus), Err(CameraError::Image(_))));
    }

    #[test]
    fn first_frame_swaps_the_placeholder() {
        let ctx = egui::Context::default();
        let mut view = CameraView::new();
        assert!(!view.is_live());

        let status = view.push_frame(&ctx, &jpeg_payload("Center", 0));
        assert!(view.is_live());
        assert_eq!(status, "Head: Center | Blinks: 0");
    }

    #[test]
    fn repeated_frames_reuse_the_texture() {
        let ctx = egui::Context::default();
        let mut view = CameraView::new();

        view.push_frame(&ctx, &jpeg_payload("Left", 1));
        let first_id = view.texture_id().unwrap();

        view.push_frame(&ctx, &jpeg_payload("Right", 2));
        let second_id = view.texture_id().unwrap();

        assert_eq!(first_id, second_id);
        assert_eq!(view.frames_received(), 2);
        assert_eq!(view.blink_count(), 2);
    }

    #[test]
    fn malformed_frame_becomes_a_status_message() {
        let ctx = egui::Context::default();
        let mut view = CameraView::new();

        let payload = CameraFramePayload {
            frame: "%%%".to_string(),
            head_direction: "Left".to_string(),
            blink_count: 1,
        };
        let status = view.push_frame(&ctx, &payload);

        assert!(status.starts_with("Camera error:"));
        assert!(!view.is_live());
        assert_eq!(view.frames_received(), 0);
    }

    #[test]
    fn bad_frame_does_not_tear_down_the_live_view() {
        let ctx = egui::Context::default();
        let mut view = CameraView::new();

        view.push_frame(&ctx, &jpeg_payload("Left", 1));
        let id = view.texture_id().unwrap();

        let bogus = CameraFramePayload {
            frame: "%%%".to_string(),
            head_direction: "Right".to_string(),
            blink_count: 9,
        };
        view.push_frame(&ctx, &bogus);

        assert_eq!(view.texture_id(), Some(id));
        assert_eq!(view.blink_count(), 1);
    }
}
