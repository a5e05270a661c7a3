//! Quaternion to rotation-matrix conversion and rigid transform assembly.

use glam::{Mat3, Mat4, Quat, Vec3, Vec4};
use tracing::warn;

/// Tolerance on the squared norm when checking whether a quaternion is unit.
///
/// The check is advisory only: a non-unit quaternion is logged and the
/// conversion proceeds with the components as given.
pub const UNIT_NORM_TOLERANCE: f32 = 1e-6;

/// A rigid transform in one of the two shapes callers ask for.
///
/// The 3x4 affine shape drops the homogeneous row; the 4x4 shape carries the
/// fixed bottom row (0, 0, 0, 1) so it can be chained with other homogeneous
/// transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameMatrix {
    /// Rotation rows with the translation as the last column, row-major.
    Affine([[f32; 4]; 3]),
    /// Full 4x4 homogeneous matrix.
    Homogeneous(Mat4),
}

impl FrameMatrix {
    /// The three transform rows, without the homogeneous row.
    pub fn rows_3x4(&self) -> [[f32; 4]; 3] {
        match self {
            FrameMatrix::Affine(rows) => *rows,
            FrameMatrix::Homogeneous(m) => {
                let r0 = m.row(0);
                let r1 = m.row(1);
                let r2 = m.row(2);
                [r0.to_array(), r1.to_array(), r2.to_array()]
            }
        }
    }

    /// Promote to a full 4x4 homogeneous matrix.
    pub fn to_mat4(&self) -> Mat4 {
        match self {
            FrameMatrix::Affine(rows) => Mat4::from_cols(
                Vec4::new(rows[0][0], rows[1][0], rows[2][0], 0.0),
                Vec4::new(rows[0][1], rows[1][1], rows[2][1], 0.0),
                Vec4::new(rows[0][2], rows[1][2], rows[2][2], 0.0),
                Vec4::new(rows[0][3], rows[1][3], rows[2][3], 1.0),
            ),
            FrameMatrix::Homogeneous(m) => *m,
        }
    }

    /// True when the transform carries the homogeneous row.
    pub fn is_homogeneous(&self) -> bool {
        matches!(self, FrameMatrix::Homogeneous(_))
    }
}

/// Convert a quaternion (x, y, z, w) into a 3x3 rotation matrix.
///
/// No normalization is performed. A quaternion whose squared norm deviates
/// from 1 by more than [`UNIT_NORM_TOLERANCE`] is logged as a warning and the
/// conversion still runs on the given components, so the caller gets a matrix
/// either way (it is only orthonormal for unit input).
pub fn quaternion_to_rotation_matrix(q: Quat) -> Mat3 {
    let (x, y, z, w) = (q.x, q.y, q.z, q.w);

    let norm_sq = x * x + y * y + z * z + w * w;
    if (norm_sq - 1.0).abs() > UNIT_NORM_TOLERANCE {
        warn!("Not a unit quaternion: squared norm = {}", norm_sq);
    }

    // Columns are (r11, r21, r31), (r12, r22, r32), (r13, r23, r33).
    Mat3::from_cols(
        Vec3::new(
            1.0 - 2.0 * y * y - 2.0 * z * z,
            2.0 * x * y + 2.0 * w * z,
            2.0 * x * z - 2.0 * w * y,
        ),
        Vec3::new(
            2.0 * x * y - 2.0 * w * z,
            1.0 - 2.0 * x * x - 2.0 * z * z,
            2.0 * y * z + 2.0 * w * x,
        ),
        Vec3::new(
            2.0 * x * z + 2.0 * w * y,
            2.0 * y * z - 2.0 * w * x,
            1.0 - 2.0 * x * x - 2.0 * y * y,
        ),
    )
}

/// Place `rotation` in the upper-left block and `translation` in the last
/// column, appending the (0, 0, 0, 1) row only when `homogeneous` is set.
pub fn assemble_transform(rotation: Mat3, translation: Vec3, homogeneous: bool) -> FrameMatrix {
    if homogeneous {
        let mut m = Mat4::from_mat3(rotation);
        m.w_axis = translation.extend(1.0);
        FrameMatrix::Homogeneous(m)
    } else {
        let r0 = rotation.row(0);
        let r1 = rotation.row(1);
        let r2 = rotation.row(2);
        FrameMatrix::Affine([
            [r0.x, r0.y, r0.z, translation.x],
            [r1.x, r1.y, r1.z, translation.y],
            [r2.x, r2.y, r2.z, translation.z],
        ])
    }
}
