use core::fmt;
use core::ops::Mul;

use bytemuck::{Pod, Zeroable};

/// 4×4 affine/projective transform, row-major.
///
/// Layout: row 0 is elements `0..4`, row 1 is `4..8`, and so on.
/// Vectors are rows and multiply on the left (`v' = v · M`), so the
/// translation lives in row 3 (elements 12, 13, 14).
///
/// Uploading the 16 floats as-is into a WGSL `mat4x4<f32>` (column-major)
/// yields `Mᵀ`; shaders therefore compute `M_wgsl * p`, which equals `p · M`.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Matrix4([f32; 16]);

impl Matrix4 {
    #[inline]
    pub const fn from_array(elements: [f32; 16]) -> Self {
        Self(elements)
    }

    #[inline]
    pub const fn as_array(&self) -> &[f32; 16] {
        &self.0
    }

    #[inline]
    pub fn row(&self, r: usize) -> [f32; 4] {
        let i = r * 4;
        [self.0[i], self.0[i + 1], self.0[i + 2], self.0[i + 3]]
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.0[row * 4 + col]
    }

    #[rustfmt::skip]
    pub const fn identity() -> Self {
        Self([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub const fn translation(x: f32, y: f32, z: f32) -> Self {
        Self([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            x, y, z, 1.0,
        ])
    }

    /// Rotation about the vertical axis by `angle` radians.
    #[rustfmt::skip]
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self([
            c, 0.0, -s, 0.0,
            0.0, 1.0, 0.0, 0.0,
            s, 0.0, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Combined rotation: roll (Z), then pitch (X), then yaw (Y), all in radians.
    ///
    /// The result carries no translation.
    #[rustfmt::skip]
    pub fn rotation_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Self {
        let (s_yaw, c_yaw) = yaw.sin_cos();
        let (s_pitch, c_pitch) = pitch.sin_cos();
        let (s_roll, c_roll) = roll.sin_cos();

        Self([
            c_roll * c_yaw + s_roll * s_pitch * s_yaw,
            s_roll * c_pitch,
            -s_yaw * c_roll + s_roll * s_pitch * c_yaw,
            0.0,

            -s_roll * c_yaw + c_roll * s_pitch * s_yaw,
            c_roll * c_pitch,
            s_roll * s_yaw + c_roll * s_pitch * c_yaw,
            0.0,

            c_pitch * s_yaw,
            -s_pitch,
            c_pitch * c_yaw,
            0.0,

            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// Left-handed perspective projection.
    ///
    /// `fov` is the vertical field of view in radians. View-space depth `near`
    /// maps to 0 and `far` maps to 1 after the perspective divide.
    #[rustfmt::skip]
    pub fn perspective_fov_lh(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let y_scale = 1.0 / (fov * 0.5).tan();
        let x_scale = y_scale / aspect;
        let depth = far - near;

        Self([
            x_scale, 0.0, 0.0, 0.0,
            0.0, y_scale, 0.0, 0.0,
            0.0, 0.0, far / depth, 1.0,
            0.0, 0.0, (-near * far) / depth, 0.0,
        ])
    }

    /// Standard row-major product `self · rhs`.
    pub fn multiply(&self, rhs: &Matrix4) -> Matrix4 {
        let a = &self.0;
        let b = &rhs.0;
        let mut out = [0.0f32; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = (0..4).map(|k| a[row * 4 + k] * b[k * 4 + col]).sum();
            }
        }
        Matrix4(out)
    }

    pub fn transpose(&self) -> Matrix4 {
        let mut out = [0.0f32; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[col * 4 + row] = self.0[row * 4 + col];
            }
        }
        Matrix4(out)
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|e| e.is_finite())
    }

    /// Element-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &Matrix4, eps: f32) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;
    #[inline]
    fn mul(self, rhs: Matrix4) -> Matrix4 {
        self.multiply(&rhs)
    }
}

impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..4 {
            let [a, b, c, d] = self.row(r);
            writeln!(f, "{a:.2} {b:.2} {c:.2} {d:.2}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries((0..4).map(|r| self.row(r))).finish()
    }
}
