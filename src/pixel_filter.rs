//! CPU pixel path: per-pixel filters over tightly packed RGBA8 buffers.
//!
//! Filters read a source buffer and write a separate destination of the
//! same length, so the source stays available for the next control value.
//! Channel results are rounded and clamped to `0..=255` explicitly.

use thiserror::Error;

use crate::color_transform::ColorTransform;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Invalid {buffer} buffer size: {len} bytes for a {width}x{height} RGBA image")]
    InvalidBufferSize {
        buffer: &'static str,
        len: usize,
        width: u32,
        height: u32,
    },
}

pub type Result<T> = std::result::Result<T, FilterError>;

/// Byte length of a `width` x `height` RGBA8 image, or `None` on overflow.
pub fn expected_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
}

fn check_len(buffer: &'static str, len: usize, width: u32, height: u32) -> Result<()> {
    if expected_len(width, height) == Some(len) {
        Ok(())
    } else {
        Err(FilterError::InvalidBufferSize {
            buffer,
            len,
            width,
            height,
        })
    }
}

/// RGBA8 image with a validated length (`4 * width * height`, row-major).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_len("pixel", data.len(), width, height)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// All-zero (transparent black) buffer.
    pub fn blank(width: u32, height: u32) -> Result<Self> {
        let len = expected_len(width, height).ok_or(FilterError::InvalidBufferSize {
            buffer: "pixel",
            len: 0,
            width,
            height,
        })?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// RGBA of the pixel at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.data[idx..idx + BYTES_PER_PIXEL]);
        Some(rgba)
    }

    /// Recompute `self` as `source` scaled by `factor`. Dimensions must match.
    pub fn brighten_from(&mut self, source: &PixelBuffer, factor: f32) -> Result<()> {
        apply_brightness_into(source.as_bytes(), &mut self.data, self.width, self.height, factor)
    }

    /// Recompute `self` as `source` run through `transform`. Dimensions must match.
    pub fn transform_from(&mut self, source: &PixelBuffer, transform: &ColorTransform) -> Result<()> {
        apply_affine_into(source.as_bytes(), &mut self.data, self.width, self.height, transform)
    }
}

/// Round (ties to even) and clamp a channel value to a byte. NaN maps to 0.
pub fn clamp_to_byte(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Scale R, G and B of every pixel by `factor`; alpha is copied.
///
/// `source.len()` must be `4 * width * height`.
pub fn apply_brightness(source: &[u8], width: u32, height: u32, factor: f32) -> Result<Vec<u8>> {
    check_len("source", source.len(), width, height)?;
    let mut dest = vec![0; source.len()];
    apply_brightness_into(source, &mut dest, width, height, factor)?;
    Ok(dest)
}

/// [`apply_brightness`] writing into an existing destination of equal length.
pub fn apply_brightness_into(
    source: &[u8],
    dest: &mut [u8],
    width: u32,
    height: u32,
    factor: f32,
) -> Result<()> {
    check_len("source", source.len(), width, height)?;
    check_len("destination", dest.len(), width, height)?;

    for (src, dst) in source
        .chunks_exact(BYTES_PER_PIXEL)
        .zip(dest.chunks_exact_mut(BYTES_PER_PIXEL))
    {
        for (d, s) in dst[..3].iter_mut().zip(&src[..3]) {
            *d = clamp_to_byte(*s as f32 * factor);
        }
        dst[3] = src[3];
    }
    Ok(())
}

/// Apply an affine color transform in normalized (0..1) space.
///
/// Same rounding and clamping as [`apply_brightness_into`], so the result
/// matches what the color matrix shader draws.
pub fn apply_affine_into(
    source: &[u8],
    dest: &mut [u8],
    width: u32,
    height: u32,
    transform: &ColorTransform,
) -> Result<()> {
    check_len("source", source.len(), width, height)?;
    check_len("destination", dest.len(), width, height)?;

    for (src, dst) in source
        .chunks_exact(BYTES_PER_PIXEL)
        .zip(dest.chunks_exact_mut(BYTES_PER_PIXEL))
    {
        let color = [
            src[0] as f32 / 255.0,
            src[1] as f32 / 255.0,
            src[2] as f32 / 255.0,
            src[3] as f32 / 255.0,
        ];
        let out = transform.apply(color);
        for (byte, value) in dst.iter_mut().zip(out) {
            *byte = clamp_to_byte(value * 255.0);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-random RGBA bytes.
    fn sample_pixels(width: u32, height: u32) -> Vec<u8> {
        let len = expected_len(width, height).unwrap();
        let mut state: u32 = 0x2545_f491;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 24) as u8
            })
            .collect()
    }

    #[test]
    fn test_single_pixel_doubling() {
        let out = apply_brightness(&[10, 20, 30, 255], 1, 1, 2.0).unwrap();
        assert_eq!(out, vec![20, 40, 60, 255]);
    }

    #[test]
    fn test_factor_one_is_identity() {
        let src = sample_pixels(7, 5);
        assert_eq!(apply_brightness(&src, 7, 5, 1.0).unwrap(), src);
    }

    #[test]
    fn test_alpha_is_preserved() {
        let src = sample_pixels(9, 4);
        for factor in [0.0, 0.3, 1.0, 1.7, 4.0, -2.0] {
            let out = apply_brightness(&src, 9, 4, factor).unwrap();
            assert_eq!(out.len(), src.len());
            for k in 0..src.len() / 4 {
                assert_eq!(out[4 * k + 3], src[4 * k + 3], "factor {} pixel {}", factor, k);
            }
        }
    }

    #[test]
    fn test_source_is_not_mutated() {
        let src = sample_pixels(6, 6);
        let before = src.clone();
        let mut dest = vec![0; src.len()];
        apply_brightness_into(&src, &mut dest, 6, 6, 1.9).unwrap();
        let _ = apply_brightness(&src, 6, 6, 0.2).unwrap();
        assert_eq!(src, before);
    }

    #[test]
    fn test_saturates_instead_of_wrapping() {
        let out = apply_brightness(&[200, 128, 127, 10], 1, 1, 2.0).unwrap();
        assert_eq!(out, vec![255, 255, 254, 10]);

        let out = apply_brightness(&[200, 128, 0, 10], 1, 1, -1.0).unwrap();
        assert_eq!(out, vec![0, 0, 0, 10]);
    }

    #[test]
    fn test_rounds_to_nearest() {
        let out = apply_brightness(&[3, 1, 4, 255], 1, 1, 0.5).unwrap();
        assert_eq!(out, vec![2, 0, 2, 255]);

        let out = apply_brightness(&[7, 10, 11, 255], 1, 1, 0.3).unwrap();
        assert_eq!(out, vec![2, 3, 3, 255]);
    }

    #[test]
    fn test_halves_round_to_even() {
        // 0.5 -> 0, 1.5 -> 2, 2.5 -> 2, 7.5 -> 8
        let out = apply_brightness(&[1, 3, 5, 255, 15, 0, 0, 255], 2, 1, 0.5).unwrap();
        assert_eq!(out, vec![0, 2, 2, 255, 8, 0, 0, 255]);

        assert_eq!(clamp_to_byte(254.5), 254);
        assert_eq!(clamp_to_byte(253.5), 254);
        assert_eq!(clamp_to_byte(-0.5), 0);
    }

    #[test]
    fn test_non_finite_factor() {
        assert_eq!(apply_brightness(&[1, 2, 3, 4], 1, 1, f32::NAN).unwrap(), vec![0, 0, 0, 4]);
        assert_eq!(
            apply_brightness(&[1, 0, 3, 4], 1, 1, f32::INFINITY).unwrap(),
            // 0 * inf is NaN
            vec![255, 0, 255, 4]
        );
    }

    #[test]
    fn test_rejects_mismatched_source() {
        let err = apply_brightness(&[0; 15], 2, 2, 1.0).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidBufferSize {
                buffer: "source",
                len: 15,
                width: 2,
                height: 2,
            }
        );
        assert!(err.to_string().contains("2x2"));
    }

    #[test]
    fn test_rejects_mismatched_destination() {
        let src = [0; 16];
        let mut dest = [0; 12];
        let err = apply_brightness_into(&src, &mut dest, 2, 2, 1.0).unwrap_err();
        assert!(matches!(err, FilterError::InvalidBufferSize { buffer: "destination", .. }));
    }

    #[test]
    fn test_rejects_overflowing_dimensions() {
        assert!(apply_brightness(&[], u32::MAX, u32::MAX, 1.0).is_err());
        assert!(PixelBuffer::new(3, 0, vec![1]).is_err());
    }

    #[test]
    fn test_empty_image() {
        assert_eq!(apply_brightness(&[], 0, 0, 2.0).unwrap(), Vec::<u8>::new());
        assert_eq!(apply_brightness(&[], 5, 0, 2.0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_pixel_buffer_accessors() {
        let data: Vec<u8> = (0..24).collect();
        let buf = PixelBuffer::new(3, 2, data).unwrap();
        assert_eq!(buf.len(), 24);
        assert_eq!(buf.pixel(0, 0), Some([0, 1, 2, 3]));
        assert_eq!(buf.pixel(2, 1), Some([20, 21, 22, 23]));
        assert_eq!(buf.pixel(3, 0), None);
        assert_eq!(buf.pixel(0, 2), None);
    }

    #[test]
    fn test_brighten_from_reuses_destination() {
        let source = PixelBuffer::new(2, 1, vec![10, 20, 30, 40, 50, 60, 70, 80]).unwrap();
        let mut dest = PixelBuffer::blank(2, 1).unwrap();

        dest.brighten_from(&source, 2.0).unwrap();
        assert_eq!(dest.as_bytes(), &[20, 40, 60, 40, 100, 120, 140, 80]);

        // Recomputed from the untouched source, not from the previous result.
        dest.brighten_from(&source, 0.5).unwrap();
        assert_eq!(dest.as_bytes(), &[5, 10, 15, 40, 25, 30, 35, 80]);

        let mut wrong = PixelBuffer::blank(1, 2).unwrap();
        assert!(wrong.brighten_from(&source, 1.0).is_err());
    }

    #[test]
    fn test_affine_identity_roundtrips_bytes() {
        let src = sample_pixels(8, 3);
        let mut dest = vec![0; src.len()];
        apply_affine_into(&src, &mut dest, 8, 3, &ColorTransform::IDENTITY).unwrap();
        assert_eq!(dest, src);
    }

    #[test]
    fn test_affine_brightness_matches_scalar_path() {
        let src = sample_pixels(5, 5);
        let mut dest = vec![0; src.len()];
        apply_affine_into(&src, &mut dest, 5, 5, &ColorTransform::brightness(2.0)).unwrap();
        assert_eq!(dest, apply_brightness(&src, 5, 5, 2.0).unwrap());
    }

    #[test]
    fn test_affine_contrast_keeps_mid_gray_and_alpha() {
        let src = [128, 100, 255, 77];
        let mut dest = [0; 4];
        apply_affine_into(&src, &mut dest, 1, 1, &ColorTransform::contrast(0.5)).unwrap();
        // 1.5 * v - 63.75: 128 sits next to mid-gray and stays put.
        assert_eq!(dest, [128, 86, 255, 77]);
    }
}
