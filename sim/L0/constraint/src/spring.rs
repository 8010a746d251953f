//! Six-DOF joint with a spring on every degree of freedom.
//!
//! [`SixDofSpringJoint`] is a [`SixDofJoint`] plus a [`SpringJointConfig`]:
//! per-axis spring flags, stiffness and damping. Every setter writes the
//! cached value first and then forwards the same value to the
//! [`SpringConstraintHandle`], so the cache always mirrors what the solver was
//! last told.
//!
//! Indices follow [`Dof`](crate::Dof):
//!
//! - 0, 1, 2: translation X, Y, Z
//! - 3, 4, 5: rotation X, Y, Z
//!
//! An index outside `0..6` is a programming error and panics.
//!
//! # Stiffness and damping defaults
//!
//! Stiffness and damping start at `-1.0`. The value is a sentinel meaning
//! "never set here"; it is stored and forwarded like any other value and its
//! interpretation is left to the solver.
//!
//! # Example
//!
//! ```
//! use sim_constraint::{BodyId, Dof, HeadlessConstraint, SixDofSpringJoint};
//!
//! let mut handle = HeadlessConstraint::new();
//! let mut joint = SixDofSpringJoint::new(BodyId::new(0), BodyId::new(1), &mut handle);
//!
//! let axis = Dof::TranslationY.index();
//! joint.enable_spring(axis, true);
//! joint.set_stiffness(axis, 40.0);
//! joint.set_damping(axis, 0.3);
//! joint.set_equilibrium_point();
//!
//! assert!(joint.springs().is_spring_enabled(axis));
//! drop(joint);
//! assert!(handle.spring_enabled()[axis]);
//! ```

use tracing::{debug, trace};

use crate::capsule::{InputCapsule, OutputCapsule, Savable};
use crate::error::Result;
use crate::handle::SpringConstraintHandle;
use crate::joint::{Joint, SixDofJoint};
use crate::settings::{AxisSpring, SpringSettings};
use crate::types::{BodyId, DOF_COUNT, JointFrame};

/// Stiffness and damping value meaning "not configured".
pub const UNSET: f64 = -1.0;

const SPRING_FIELD: &str = "spring";
const STIFFNESS_FIELD: &str = "stiffness";
const DAMPING_FIELD: &str = "damping";

/// Cached per-axis spring configuration of a [`SixDofSpringJoint`].
///
/// Read-only from outside: the only way to change it is through the joint,
/// which forwards each change to the constraint handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringJointConfig {
    spring_enabled: [bool; DOF_COUNT],
    stiffness: [f64; DOF_COUNT],
    damping: [f64; DOF_COUNT],
}

impl SpringJointConfig {
    fn new() -> Self {
        Self {
            spring_enabled: [false; DOF_COUNT],
            stiffness: [UNSET; DOF_COUNT],
            damping: [UNSET; DOF_COUNT],
        }
    }

    /// Whether the spring on `index` is enabled.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 6`.
    #[must_use]
    pub fn is_spring_enabled(&self, index: usize) -> bool {
        self.spring_enabled[index]
    }

    /// Stiffness of the spring on `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 6`.
    #[must_use]
    pub fn stiffness(&self, index: usize) -> f64 {
        self.stiffness[index]
    }

    /// Damping of the spring on `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 6`.
    #[must_use]
    pub fn damping(&self, index: usize) -> f64 {
        self.damping[index]
    }

    /// All spring flags in index order.
    #[must_use]
    pub fn spring_enabled_all(&self) -> &[bool; DOF_COUNT] {
        &self.spring_enabled
    }

    /// All stiffness values in index order.
    #[must_use]
    pub fn stiffness_all(&self) -> &[f64; DOF_COUNT] {
        &self.stiffness
    }

    /// All damping values in index order.
    #[must_use]
    pub fn damping_all(&self) -> &[f64; DOF_COUNT] {
        &self.damping
    }
}

impl Default for SpringJointConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A six-DOF joint with configurable springs.
#[derive(Debug, Clone)]
pub struct SixDofSpringJoint<H> {
    joint: SixDofJoint<H>,
    springs: SpringJointConfig,
}

#[track_caller]
fn check_index(index: usize) {
    assert!(
        index < DOF_COUNT,
        "DOF index {index} out of range (expected 0..{DOF_COUNT})"
    );
}

impl<H: SpringConstraintHandle> SixDofSpringJoint<H> {
    /// Bind a spring joint to an already-created constraint handle.
    ///
    /// All springs start disabled with unset stiffness and damping; nothing
    /// is forwarded.
    #[must_use]
    pub fn new(body_a: BodyId, body_b: BodyId, handle: H) -> Self {
        Self::from_joint(SixDofJoint::new(body_a, body_b, handle))
    }

    /// Attach spring configuration to an existing six-DOF joint.
    #[must_use]
    pub fn from_joint(joint: SixDofJoint<H>) -> Self {
        Self {
            joint,
            springs: SpringJointConfig::new(),
        }
    }

    /// Set both joint frames.
    #[must_use]
    pub fn with_frames(mut self, frame_a: JointFrame, frame_b: JointFrame) -> Self {
        self.joint.set_frames(frame_a, frame_b);
        self
    }

    /// Turn the spring on one DOF on or off.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 6`.
    #[track_caller]
    pub fn enable_spring(&mut self, index: usize, on: bool) {
        check_index(index);
        self.springs.spring_enabled[index] = on;
        trace!(index, on, "forwarding spring enable");
        self.joint.handle_mut().enable_spring(index, on);
    }

    /// Set the spring stiffness on one DOF. Negative values are passed
    /// through unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 6`.
    #[track_caller]
    pub fn set_stiffness(&mut self, index: usize, stiffness: f64) {
        check_index(index);
        self.springs.stiffness[index] = stiffness;
        trace!(index, stiffness, "forwarding spring stiffness");
        self.joint.handle_mut().set_stiffness(index, stiffness);
    }

    /// Set the spring damping on one DOF. Negative values are passed through
    /// unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 6`.
    #[track_caller]
    pub fn set_damping(&mut self, index: usize, damping: f64) {
        check_index(index);
        self.springs.damping[index] = damping;
        trace!(index, damping, "forwarding spring damping");
        self.joint.handle_mut().set_damping(index, damping);
    }

    /// Make the joint's current relative pose the rest point of every DOF.
    ///
    /// The rest point lives in the solver only; nothing is cached.
    pub fn set_equilibrium_point(&mut self) {
        trace!("forwarding equilibrium point for all axes");
        self.joint.handle_mut().set_equilibrium_point();
    }

    /// Make the joint's current relative pose the rest point of one DOF.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 6`.
    #[track_caller]
    pub fn set_axis_equilibrium_point(&mut self, index: usize) {
        check_index(index);
        trace!(index, "forwarding equilibrium point");
        self.joint.handle_mut().set_axis_equilibrium_point(index);
    }

    /// Apply a full spring configuration, axis by axis, through the setters.
    pub fn apply_settings(&mut self, settings: &SpringSettings) {
        for (index, axis) in settings.axes.iter().enumerate() {
            self.enable_spring(index, axis.enabled);
            self.set_stiffness(index, axis.stiffness);
            self.set_damping(index, axis.damping);
        }
        debug!(enabled = settings.enabled_count(), "applied spring settings");
    }

    /// Snapshot the current spring configuration.
    #[must_use]
    pub fn settings(&self) -> SpringSettings {
        let mut settings = SpringSettings::default();
        for (index, axis) in settings.axes.iter_mut().enumerate() {
            *axis = AxisSpring {
                enabled: self.springs.spring_enabled[index],
                stiffness: self.springs.stiffness[index],
                damping: self.springs.damping[index],
            };
        }
        settings
    }

    /// Cached spring configuration.
    #[must_use]
    pub fn springs(&self) -> &SpringJointConfig {
        &self.springs
    }

    /// The underlying six-DOF joint.
    #[must_use]
    pub fn joint(&self) -> &SixDofJoint<H> {
        &self.joint
    }

    /// Mutable access to the underlying six-DOF joint (frames and limits).
    pub fn joint_mut(&mut self) -> &mut SixDofJoint<H> {
        &mut self.joint
    }

    /// The constraint handle.
    #[must_use]
    pub fn handle(&self) -> &H {
        self.joint.handle()
    }

    /// Unbind the joint, returning its handle.
    #[must_use]
    pub fn into_handle(self) -> H {
        self.joint.into_handle()
    }
}

impl<H: SpringConstraintHandle> Joint for SixDofSpringJoint<H> {
    fn body_a(&self) -> BodyId {
        self.joint.body_a()
    }

    fn body_b(&self) -> BodyId {
        self.joint.body_b()
    }

    fn frame_a(&self) -> &JointFrame {
        self.joint.frame_a()
    }

    fn frame_b(&self) -> &JointFrame {
        self.joint.frame_b()
    }

    fn dof(&self) -> usize {
        DOF_COUNT
    }
}

impl<H: SpringConstraintHandle> Savable for SixDofSpringJoint<H> {
    /// Save the base joint, then the spring arrays.
    fn save<C: OutputCapsule>(&self, capsule: &mut C) -> Result<()> {
        self.joint.save(capsule)?;
        capsule.write(SPRING_FIELD, self.springs.spring_enabled)?;
        capsule.write(STIFFNESS_FIELD, self.springs.stiffness)?;
        capsule.write(DAMPING_FIELD, self.springs.damping)?;
        debug!(
            body_a = %self.joint.body_a(),
            body_b = %self.joint.body_b(),
            "saved spring joint"
        );
        Ok(())
    }

    /// Load the base joint, then the spring arrays.
    ///
    /// Absent spring fields keep the current values. Every value, restored
    /// or kept, is replayed through the setters so the handle ends up in
    /// sync with the cache.
    fn load<C: InputCapsule>(&mut self, capsule: &C) -> Result<()> {
        self.joint.load(capsule)?;

        let spring = capsule.read(SPRING_FIELD, self.springs.spring_enabled)?;
        let stiffness = capsule.read(STIFFNESS_FIELD, self.springs.stiffness)?;
        let damping = capsule.read(DAMPING_FIELD, self.springs.damping)?;

        for (index, on) in spring.into_iter().enumerate() {
            self.enable_spring(index, on);
        }
        for (index, value) in stiffness.into_iter().enumerate() {
            self.set_stiffness(index, value);
        }
        for (index, value) in damping.into_iter().enumerate() {
            self.set_damping(index, value);
        }
        debug!(
            body_a = %self.joint.body_a(),
            body_b = %self.joint.body_b(),
            "loaded spring joint"
        );
        Ok(())
    }
}
