//! Common types for six-DOF joints.

use nalgebra::{Point3, UnitQuaternion};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of degrees of freedom addressed by a six-DOF joint.
pub const DOF_COUNT: usize = 6;

/// Identity of a rigid body linked by a joint.
///
/// The body itself lives in the physics world; joints only remember which
/// bodies they connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(u64);

impl BodyId {
    /// Create a body ID from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Body({})", self.0)
    }
}

/// One degree of freedom of a six-DOF joint.
///
/// The discriminant is the index used by every per-axis setter:
///
/// | Index | DOF |
/// |-------|-----|
/// | 0 | translation X |
/// | 1 | translation Y |
/// | 2 | translation Z |
/// | 3 | rotation X (third Euler rotation, range `(-π, π)`) |
/// | 4 | rotation Y (second Euler rotation, range `(-π/2, π/2)`) |
/// | 5 | rotation Z (first Euler rotation, range `(-π, π)`) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dof {
    /// Translation along X.
    TranslationX = 0,
    /// Translation along Y.
    TranslationY = 1,
    /// Translation along Z.
    TranslationZ = 2,
    /// Rotation about X.
    RotationX = 3,
    /// Rotation about Y.
    RotationY = 4,
    /// Rotation about Z.
    RotationZ = 5,
}

impl Dof {
    /// All degrees of freedom in index order.
    pub const ALL: [Self; DOF_COUNT] = [
        Self::TranslationX,
        Self::TranslationY,
        Self::TranslationZ,
        Self::RotationX,
        Self::RotationY,
        Self::RotationZ,
    ];

    /// Index of this DOF (0..6).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a DOF by index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Check if this is a translational DOF.
    #[must_use]
    pub const fn is_linear(self) -> bool {
        matches!(
            self,
            Self::TranslationX | Self::TranslationY | Self::TranslationZ
        )
    }

    /// Check if this is a rotational DOF.
    #[must_use]
    pub const fn is_angular(self) -> bool {
        !self.is_linear()
    }
}

impl From<Dof> for usize {
    fn from(dof: Dof) -> Self {
        dof.index()
    }
}

/// Pivot point and rotation frame of a joint in one body's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointFrame {
    /// Connection point in the body frame.
    pub pivot: Point3<f64>,
    /// Orientation of the joint frame relative to the body frame.
    pub rotation: UnitQuaternion<f64>,
}

impl JointFrame {
    /// Create a frame from a pivot and rotation.
    #[must_use]
    pub fn new(pivot: Point3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self { pivot, rotation }
    }

    /// Create a frame at `pivot` with identity rotation.
    #[must_use]
    pub fn at(pivot: Point3<f64>) -> Self {
        Self::new(pivot, UnitQuaternion::identity())
    }
}

impl Default for JointFrame {
    fn default() -> Self {
        Self::new(Point3::origin(), UnitQuaternion::identity())
    }
}
