//! Raster surface - the sole persistent drawing state
//!
//! An RGBA8 straight-alpha pixel buffer owned by the canvas manager.
//! Brush, symmetry and stamp code receive `&mut Surface` per call and
//! never retain it. Paint primitives composite source-over; the eraser
//! path clears destination-out.

mod draw;

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::color::Rgb;
use crate::error::DoodleError;

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Mutable 2D pixel buffer with alpha compositing.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    /// RGBA8, straight alpha, row-major
    data: Vec<u8>,
}

impl Surface {
    /// Create a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read one pixel as `[r, g, b, a]`. Out of bounds reads transparent.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Wipe to fully transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Overwrite pixels from another surface of identical dimensions.
    ///
    /// Dimension mismatch is a logged no-op; the stamp animation restores
    /// against a base captured from the same buffer, so this only trips if
    /// a resize lands mid-animation.
    pub fn copy_from(&mut self, other: &Surface) {
        if self.width != other.width || self.height != other.height {
            tracing::warn!(
                "copy_from dimension mismatch: {}x{} vs {}x{}",
                self.width,
                self.height,
                other.width,
                other.height
            );
            return;
        }
        self.data.copy_from_slice(&other.data);
    }

    /// Source-over blend of a straight-alpha colour into one pixel.
    pub fn blend_pixel(&mut self, x: i32, y: i32, rgb: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let src_a = alpha.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;

        let dst_a = self.data[idx + 3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }

        let blend = |src_c: u8, dst_c: u8| -> u8 {
            let s = src_c as f32;
            let d = dst_c as f32;
            let c = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };

        self.data[idx] = blend(rgb.r, self.data[idx]);
        self.data[idx + 1] = blend(rgb.g, self.data[idx + 1]);
        self.data[idx + 2] = blend(rgb.b, self.data[idx + 2]);
        self.data[idx + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Destination-out: knock alpha out of one pixel.
    pub fn erase_pixel(&mut self, x: i32, y: i32, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let src_a = alpha.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let dst_a = self.data[idx + 3] as f32 / 255.0;
        let out_a = dst_a * (1.0 - src_a);
        self.data[idx + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Composite another surface into a destination rectangle, bilinear
    /// sampled, at a global alpha. Used for template overlays (fixed 25%)
    /// and for redrawing captured content into a resized buffer.
    pub fn composite_scaled(
        &mut self,
        src: &Surface,
        dst_x: f32,
        dst_y: f32,
        dst_w: f32,
        dst_h: f32,
        alpha: f32,
    ) {
        if dst_w <= 0.0 || dst_h <= 0.0 || src.width == 0 || src.height == 0 {
            return;
        }
        let x0 = dst_x.floor().max(0.0) as i32;
        let y0 = dst_y.floor().max(0.0) as i32;
        let x1 = ((dst_x + dst_w).ceil() as i32).min(self.width as i32);
        let y1 = ((dst_y + dst_h).ceil() as i32).min(self.height as i32);

        for py in y0..y1 {
            for px in x0..x1 {
                let u = ((px as f32 + 0.5 - dst_x) / dst_w) * src.width as f32 - 0.5;
                let v = ((py as f32 + 0.5 - dst_y) / dst_h) * src.height as f32 - 0.5;
                let s = src.sample_bilinear(u, v);
                let a = s[3] / 255.0;
                if a <= 0.0 {
                    continue;
                }
                let rgb = Rgb::new(
                    s[0].round().clamp(0.0, 255.0) as u8,
                    s[1].round().clamp(0.0, 255.0) as u8,
                    s[2].round().clamp(0.0, 255.0) as u8,
                );
                self.blend_pixel(px, py, rgb, a * alpha);
            }
        }
    }

    /// Bilinear sample in source pixel coordinates. Returns straight-alpha
    /// `[r, g, b, a]`, each channel 0-255.
    fn sample_bilinear(&self, u: f32, v: f32) -> [f32; 4] {
        let u = u.clamp(0.0, self.width.saturating_sub(1) as f32);
        let v = v.clamp(0.0, self.height.saturating_sub(1) as f32);
        let x0 = u.floor() as u32;
        let y0 = v.floor() as u32;
        let x1 = (x0 + 1).min(self.width.saturating_sub(1));
        let y1 = (y0 + 1).min(self.height.saturating_sub(1));
        let fx = u - x0 as f32;
        let fy = v - y0 as f32;

        let p00 = self.pixel(x0, y0);
        let p10 = self.pixel(x1, y0);
        let p01 = self.pixel(x0, y1);
        let p11 = self.pixel(x1, y1);

        let mut out = [0.0f32; 4];
        for (c, slot) in out.iter_mut().enumerate() {
            let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
            let bot = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
            *slot = top * (1.0 - fy) + bot * fy;
        }
        out
    }

    /// Encode the surface as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, DoodleError> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| DoodleError::InvalidInput("buffer size mismatch".into()))?;
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Decode a surface from PNG bytes.
    pub fn from_png(bytes: &[u8]) -> Result<Surface, DoodleError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Surface {
            width: img.width(),
            height: img.height(),
            data: img.into_raw(),
        })
    }

    /// Encode as a `data:image/png;base64,...` URL for the persistence
    /// boundary (journal save, print hand-off).
    pub fn to_data_url(&self) -> Result<String, DoodleError> {
        let png = self.to_png()?;
        Ok(format!("{}{}", DATA_URL_PREFIX, BASE64.encode(png)))
    }

    /// Decode a surface from a PNG data URL.
    pub fn from_data_url(url: &str) -> Result<Surface, DoodleError> {
        let b64 = url
            .strip_prefix(DATA_URL_PREFIX)
            .ok_or(DoodleError::InvalidDataUrl)?;
        let png = BASE64.decode(b64)?;
        Surface::from_png(&png)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_pixel_over_transparent() {
        let mut s = Surface::new(4, 4);
        s.blend_pixel(1, 1, Rgb::new(255, 0, 0), 1.0);
        assert_eq!(s.pixel(1, 1), [255, 0, 0, 255]);
    }

    #[test]
    fn test_blend_pixel_partial_alpha_accumulates() {
        let mut s = Surface::new(2, 2);
        s.blend_pixel(0, 0, Rgb::new(255, 0, 0), 0.5);
        let a1 = s.pixel(0, 0)[3];
        s.blend_pixel(0, 0, Rgb::new(255, 0, 0), 0.5);
        let a2 = s.pixel(0, 0)[3];
        assert!(a1 > 0 && a2 > a1);
        assert!(a2 < 255);
    }

    #[test]
    fn test_blend_out_of_bounds_ignored() {
        let mut s = Surface::new(2, 2);
        s.blend_pixel(-1, 0, Rgb::new(255, 0, 0), 1.0);
        s.blend_pixel(5, 5, Rgb::new(255, 0, 0), 1.0);
        assert!(s.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_erase_pixel() {
        let mut s = Surface::new(2, 2);
        s.blend_pixel(0, 0, Rgb::new(10, 20, 30), 1.0);
        s.erase_pixel(0, 0, 1.0);
        assert_eq!(s.pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_png_round_trip() {
        let mut s = Surface::new(8, 8);
        s.blend_pixel(3, 4, Rgb::new(1, 2, 3), 1.0);
        let png = s.to_png().unwrap();
        let back = Surface::from_png(&png).unwrap();
        assert_eq!(back.width(), 8);
        assert_eq!(back.pixel(3, 4), [1, 2, 3, 255]);
    }

    #[test]
    fn test_data_url_round_trip() {
        let mut s = Surface::new(4, 4);
        s.blend_pixel(2, 2, Rgb::new(200, 100, 50), 1.0);
        let url = s.to_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        let back = Surface::from_data_url(&url).unwrap();
        assert_eq!(back.pixel(2, 2), [200, 100, 50, 255]);
    }

    #[test]
    fn test_from_data_url_rejects_garbage() {
        assert!(Surface::from_data_url("nope").is_err());
        assert!(Surface::from_data_url("data:image/png;base64,@@@@").is_err());
    }

    #[test]
    fn test_composite_scaled_alpha() {
        let mut src = Surface::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                src.blend_pixel(x, y, Rgb::new(0, 0, 255), 1.0);
            }
        }
        let mut dst = Surface::new(4, 4);
        dst.composite_scaled(&src, 0.0, 0.0, 4.0, 4.0, 0.25);
        let a = dst.pixel(2, 2)[3] as f32 / 255.0;
        assert!((a - 0.25).abs() < 0.02);
    }

    #[test]
    fn test_copy_from_mismatch_is_noop() {
        let mut s = Surface::new(4, 4);
        s.blend_pixel(0, 0, Rgb::new(9, 9, 9), 1.0);
        let other = Surface::new(2, 2);
        s.copy_from(&other);
        assert_eq!(s.pixel(0, 0), [9, 9, 9, 255]);
    }
}
