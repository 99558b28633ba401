//! Affine color transforms over normalized RGBA.
//!
//! Every transform is `output = M * color + v` where `M` is a 4x4
//! [`ColorMatrix`] and `v` a [`ColorOffset`]. All constructors here keep the
//! bottom row of `M` at `(0, 0, 0, 1)` and the alpha component of `v` at
//! zero, so alpha passes through untouched.
//!
//! Nothing in this module clamps its input. Control ranges are
//! configuration (see [`crate::config::ControlRange`]); clamping of results
//! happens at the color channel, in the shader or in
//! [`crate::pixel_filter`].

use std::f32::consts::PI;
use std::ops::Mul;

/// Red luminance weight used by the hue rotation.
pub const LUMA_R: f32 = 0.213;
/// Green luminance weight used by the hue rotation.
pub const LUMA_G: f32 = 0.715;
/// Blue luminance weight used by the hue rotation.
pub const LUMA_B: f32 = 0.072;

/// 4x4 linear transform over (R, G, B, A), stored column-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    cols: [[f32; 4]; 4],
}

impl ColorMatrix {
    pub const IDENTITY: ColorMatrix = ColorMatrix {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Build from rows as written mathematically (`rows[r][c]`).
    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        let mut cols = [[0.0; 4]; 4];
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                cols[c][r] = *value;
            }
        }
        Self { cols }
    }

    /// Diagonal matrix `diag(r, g, b, 1)`.
    pub fn diagonal(r: f32, g: f32, b: f32) -> Self {
        Self::from_rows([
            [r, 0.0, 0.0, 0.0],
            [0.0, g, 0.0, 0.0],
            [0.0, 0.0, b, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Entry at `row`, `col`.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.cols[col][row]
    }

    pub fn row(&self, row: usize) -> [f32; 4] {
        [
            self.cols[0][row],
            self.cols[1][row],
            self.cols[2][row],
            self.cols[3][row],
        ]
    }

    /// The 16 entries in column-major order, as uploaded to a `mat4` uniform.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (c, col) in self.cols.iter().enumerate() {
            out[c * 4..c * 4 + 4].copy_from_slice(col);
        }
        out
    }

    /// Columns as nested arrays, the layout of WGSL `mat4x4<f32>`.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.cols
    }

    /// `M * color`.
    pub fn transform(&self, color: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (c, col) in self.cols.iter().enumerate() {
            for r in 0..4 {
                out[r] += col[r] * color[c];
            }
        }
        out
    }

    /// `M * color + offset`.
    pub fn apply(&self, color: [f32; 4], offset: ColorOffset) -> [f32; 4] {
        let mut out = self.transform(color);
        for (value, add) in out.iter_mut().zip(offset.to_array()) {
            *value += add;
        }
        out
    }

    /// True when the bottom row is exactly `(0, 0, 0, 1)`.
    pub fn preserves_alpha(&self) -> bool {
        self.row(3) == [0.0, 0.0, 0.0, 1.0]
    }

    pub fn approx_eq(&self, other: &ColorMatrix, epsilon: f32) -> bool {
        self.to_cols_array()
            .iter()
            .zip(other.to_cols_array())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Matrix product; `a * b` applies `b` first.
impl Mul for ColorMatrix {
    type Output = ColorMatrix;

    fn mul(self, rhs: ColorMatrix) -> ColorMatrix {
        let mut cols = [[0.0; 4]; 4];
        for (c, col) in rhs.cols.iter().enumerate() {
            cols[c] = self.transform(*col);
        }
        ColorMatrix { cols }
    }
}

/// Vector added after the matrix. The alpha component is always zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorOffset {
    rgb: [f32; 3],
}

impl ColorOffset {
    pub const ZERO: ColorOffset = ColorOffset { rgb: [0.0; 3] };

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { rgb: [r, g, b] }
    }

    /// Same value on all three color channels.
    pub fn splat(value: f32) -> Self {
        Self::rgb(value, value, value)
    }

    /// `(r, g, b, 0)`, as uploaded to a `vec4` uniform.
    pub fn to_array(&self) -> [f32; 4] {
        [self.rgb[0], self.rgb[1], self.rgb[2], 0.0]
    }
}

/// A matrix and its offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorTransform {
    pub matrix: ColorMatrix,
    pub offset: ColorOffset,
}

impl ColorTransform {
    pub const IDENTITY: ColorTransform = ColorTransform {
        matrix: ColorMatrix::IDENTITY,
        offset: ColorOffset::ZERO,
    };

    pub fn hue(fraction: f32) -> Self {
        Self {
            matrix: hue_matrix(fraction),
            offset: ColorOffset::ZERO,
        }
    }

    pub fn contrast(strength: f32) -> Self {
        Self {
            matrix: contrast_matrix(strength),
            offset: contrast_offset(strength),
        }
    }

    pub fn saturation(strength: f32) -> Self {
        Self {
            matrix: saturation_matrix(strength),
            offset: ColorOffset::ZERO,
        }
    }

    pub fn brightness(factor: f32) -> Self {
        Self {
            matrix: brightness_matrix(factor),
            offset: ColorOffset::ZERO,
        }
    }

    pub fn apply(&self, color: [f32; 4]) -> [f32; 4] {
        self.matrix.apply(color, self.offset)
    }
}

/// Hue rotation around the luminance axis.
///
/// `fraction` is a share of a full turn: 0.0 and 1.0 are both the identity.
pub fn hue_matrix(fraction: f32) -> ColorMatrix {
    let angle = fraction * 360.0 * PI / 180.0;
    let x = angle.cos();
    let y = angle.sin();

    let (rc, gc, bc) = (LUMA_R, LUMA_G, LUMA_B);
    ColorMatrix::from_rows([
        [
            rc + x * (1.0 - rc) + y * (-rc),
            gc + x * (-gc) + y * (-gc),
            bc + x * (-bc) + y * (1.0 - bc),
            0.0,
        ],
        [
            rc + x * (-rc) + y * 0.143,
            gc + x * (1.0 - gc) + y * 0.140,
            bc + x * (-bc) + y * (-0.283),
            0.0,
        ],
        [
            rc + x * (-rc) + y * (rc - 1.0),
            gc + x * (-gc) + y * gc,
            bc + x * (1.0 - bc) + y * bc,
            0.0,
        ],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Contrast scale `diag(1+s, 1+s, 1+s, 1)`; pair with [`contrast_offset`].
pub fn contrast_matrix(strength: f32) -> ColorMatrix {
    let scale = 1.0 + strength;
    ColorMatrix::diagonal(scale, scale, scale)
}

/// `(-s/2, -s/2, -s/2, 0)`, which pins mid-gray (0.5) in place.
pub fn contrast_offset(strength: f32) -> ColorOffset {
    ColorOffset::splat(-0.5 * strength)
}

/// Saturation: identity at 0, gray (R = G = B) at -1.
pub fn saturation_matrix(strength: f32) -> ColorMatrix {
    let x = strength * 2.0 / 3.0 + 1.0;
    let y = (1.0 - x) / 2.0;
    ColorMatrix::from_rows([
        [x, y, y, 0.0],
        [y, x, y, 0.0],
        [y, y, x, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Uniform RGB scale `diag(f, f, f, 1)`.
pub fn brightness_matrix(factor: f32) -> ColorMatrix {
    ColorMatrix::diagonal(factor, factor, factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_color_eq(actual: [f32; 4], expected: [f32; 4]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < EPS, "{:?} != {:?}", actual, expected);
        }
    }

    fn sample_controls() -> Vec<f32> {
        let mut values: Vec<f32> = (-40..=40).map(|i| i as f32 * 0.05).collect();
        values.extend([-100.0, -7.3, 3.7, 12.5, 1000.0]);
        values
    }

    #[test]
    fn test_from_rows_stores_columns() {
        let rows = [
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ];
        let m = ColorMatrix::from_rows(rows);
        assert_eq!(m.row(1), [5.0, 6.0, 7.0, 8.0]);
        assert_eq!(m.get(0, 3), 4.0);
        assert_eq!(
            m.to_cols_array(),
            [1.0, 5.0, 9.0, 13.0, 2.0, 6.0, 10.0, 14.0, 3.0, 7.0, 11.0, 15.0, 4.0, 8.0, 12.0, 16.0]
        );
        assert_eq!(m.to_cols_array_2d()[2], [3.0, 7.0, 11.0, 15.0]);
    }

    #[test]
    fn test_transform_uses_rows() {
        let m = ColorMatrix::from_rows([
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert_eq!(m.transform([0.1, 0.2, 0.3, 1.0]), [0.2, 0.3, 0.1, 1.0]);
    }

    #[test]
    fn test_matrix_product_applies_right_first() {
        let scale = brightness_matrix(2.0);
        let shift = ColorMatrix::from_rows([
            [0.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let color = [0.1, 0.2, 0.3, 1.0];
        assert_color_eq((shift * scale).transform(color), shift.transform(scale.transform(color)));
        assert_eq!(ColorMatrix::IDENTITY * scale, scale);
    }

    #[test]
    fn test_hue_bottom_row_is_exact() {
        for fraction in sample_controls() {
            let m = hue_matrix(fraction);
            assert_eq!(m.row(3), [0.0, 0.0, 0.0, 1.0], "fraction {}", fraction);
            for r in 0..3 {
                assert_eq!(m.get(r, 3), 0.0);
            }
        }
    }

    #[test]
    fn test_hue_zero_is_identity() {
        assert!(hue_matrix(0.0).approx_eq(&ColorMatrix::IDENTITY, EPS));
    }

    #[test]
    fn test_hue_full_turn_is_identity() {
        assert!(hue_matrix(1.0).approx_eq(&ColorMatrix::IDENTITY, EPS));
    }

    #[test]
    fn test_hue_zero_keeps_red() {
        let out = ColorTransform::hue(0.0).apply([1.0, 0.0, 0.0, 1.0]);
        assert_color_eq(out, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_hue_preserves_gray() {
        for fraction in [0.1, 0.25, 0.5, 0.75, 0.9] {
            let out = ColorTransform::hue(fraction).apply([0.4, 0.4, 0.4, 1.0]);
            assert_color_eq(out, [0.4, 0.4, 0.4, 1.0]);
        }
    }

    #[test]
    fn test_hue_quarter_turn_coefficients() {
        // cos = 0, sin = 1: each entry is the luma weight plus its sine term.
        let m = hue_matrix(0.25);
        let expected = [
            [LUMA_R - LUMA_R, LUMA_G - LUMA_G, LUMA_B + (1.0 - LUMA_B)],
            [LUMA_R + 0.143, LUMA_G + 0.140, LUMA_B - 0.283],
            [LUMA_R + (LUMA_R - 1.0), LUMA_G + LUMA_G, LUMA_B + LUMA_B],
        ];
        for (r, row) in expected.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                assert!(
                    (m.get(r, c) - value).abs() < EPS,
                    "({}, {}): {} != {}",
                    r,
                    c,
                    m.get(r, c),
                    value
                );
            }
        }
        assert_color_eq(m.row(1), [0.356, 0.855, -0.211, 0.0]);
    }

    #[test]
    fn test_hue_half_turn_moves_red() {
        let out = ColorTransform::hue(0.5).apply([1.0, 0.0, 0.0, 1.0]);
        // cos = -1, sin = 0: red drops below its luminance and green/blue rise.
        assert_color_eq(out, [2.0 * LUMA_R - 1.0, 2.0 * LUMA_R, 2.0 * LUMA_R, 1.0]);
    }

    #[test]
    fn test_contrast_zero_is_identity() {
        assert_eq!(contrast_matrix(0.0), ColorMatrix::IDENTITY);
        assert_eq!(contrast_offset(0.0).to_array(), [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_contrast_is_diagonal() {
        for strength in sample_controls() {
            let m = contrast_matrix(strength);
            for r in 0..4 {
                for c in 0..4 {
                    let expected = match (r == c, r) {
                        (true, 3) => 1.0,
                        (true, _) => 1.0 + strength,
                        (false, _) => 0.0,
                    };
                    assert_eq!(m.get(r, c), expected, "strength {} at ({}, {})", strength, r, c);
                }
            }
        }
    }

    #[test]
    fn test_contrast_pins_mid_gray() {
        let out = ColorTransform::contrast(1.0).apply([0.5, 0.5, 0.5, 1.0]);
        assert_eq!(out, [0.5, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_contrast_negative_flattens() {
        let out = ColorTransform::contrast(-1.0).apply([0.9, 0.1, 0.3, 1.0]);
        assert_color_eq(out, [0.5, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_contrast_is_not_clamped() {
        let out = ColorTransform::contrast(3.0).apply([1.0, 0.0, 0.5, 1.0]);
        assert_color_eq(out, [2.5, -1.5, 0.5, 1.0]);
    }

    #[test]
    fn test_saturation_zero_is_identity() {
        assert_eq!(saturation_matrix(0.0), ColorMatrix::IDENTITY);
    }

    #[test]
    fn test_saturation_minus_one_desaturates_red() {
        let out = ColorTransform::saturation(-1.0).apply([1.0, 0.0, 0.0, 1.0]);
        assert!((out[0] - out[1]).abs() < EPS);
        assert!((out[1] - out[2]).abs() < EPS);
        assert_eq!(out[3], 1.0);
    }

    #[test]
    fn test_saturation_is_symmetric_and_row_stochastic() {
        for strength in sample_controls() {
            let m = saturation_matrix(strength);
            for r in 0..3 {
                let sum: f32 = m.row(r)[..3].iter().sum();
                assert!((sum - 1.0).abs() < 1e-3 * (1.0 + strength.abs()), "strength {}", strength);
                for c in 0..3 {
                    assert_eq!(m.get(r, c), m.get(c, r));
                }
            }
        }
    }

    #[test]
    fn test_every_transform_keeps_alpha() {
        for value in sample_controls() {
            for t in [
                ColorTransform::hue(value),
                ColorTransform::contrast(value),
                ColorTransform::saturation(value),
                ColorTransform::brightness(value),
            ] {
                assert!(t.matrix.preserves_alpha());
                assert_eq!(t.offset.to_array()[3], 0.0);
                assert_eq!(t.apply([0.2, 0.4, 0.6, 0.7])[3], 0.7);
            }
        }
    }

    #[test]
    fn test_brightness_matrix_scales_rgb() {
        let out = ColorTransform::brightness(0.5).apply([0.8, 0.4, 0.2, 1.0]);
        assert_color_eq(out, [0.4, 0.2, 0.1, 1.0]);
    }
}
