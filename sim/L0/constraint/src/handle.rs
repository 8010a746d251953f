//! Native constraint handles.
//!
//! A joint never computes forces itself. It caches its configuration and
//! forwards every change to a handle owned by the constraint solver. This
//! module defines what a handle must be able to do:
//!
//! - [`SixDofConstraintHandle`] - frames and per-axis limits of a generic
//!   six-DOF constraint
//! - [`SpringConstraintHandle`] - per-axis springs and equilibrium capture on
//!   top of that
//!
//! Spring capability is a supertrait rather than a runtime cast, so a spring
//! joint can only ever be built over a handle that supports springs.
//!
//! [`HeadlessConstraint`] is a handle with no solver behind it. It records the
//! configuration it receives, which is enough for tooling, tests and headless
//! pipelines that only need to build and persist joints.

use nalgebra::Vector3;

use crate::types::{DOF_COUNT, JointFrame};

/// Generic six-DOF constraint as exposed by a physics engine.
pub trait SixDofConstraintHandle {
    /// Replace the joint frames on both bodies.
    fn set_frames(&mut self, frame_a: &JointFrame, frame_b: &JointFrame);

    /// Set the lower translation limit (one component per axis).
    fn set_linear_lower_limit(&mut self, limit: Vector3<f64>);

    /// Set the upper translation limit (one component per axis).
    fn set_linear_upper_limit(&mut self, limit: Vector3<f64>);

    /// Set the lower rotation limit in radians.
    fn set_angular_lower_limit(&mut self, limit: Vector3<f64>);

    /// Set the upper rotation limit in radians.
    fn set_angular_upper_limit(&mut self, limit: Vector3<f64>);
}

/// Six-DOF constraint with a spring on every degree of freedom.
///
/// Indices follow [`Dof`](crate::Dof): 0..3 translation, 3..6 rotation.
/// Callers guarantee `index < 6`.
pub trait SpringConstraintHandle: SixDofConstraintHandle {
    /// Turn the spring on one DOF on or off.
    fn enable_spring(&mut self, index: usize, on: bool);

    /// Set the spring stiffness on one DOF.
    fn set_stiffness(&mut self, index: usize, stiffness: f64);

    /// Set the spring damping on one DOF.
    fn set_damping(&mut self, index: usize, damping: f64);

    /// Capture the current relative pose as the rest point of every DOF.
    fn set_equilibrium_point(&mut self);

    /// Capture the current relative pose as the rest point of one DOF.
    fn set_axis_equilibrium_point(&mut self, index: usize);
}

impl<H: SixDofConstraintHandle + ?Sized> SixDofConstraintHandle for &mut H {
    fn set_frames(&mut self, frame_a: &JointFrame, frame_b: &JointFrame) {
        (**self).set_frames(frame_a, frame_b);
    }

    fn set_linear_lower_limit(&mut self, limit: Vector3<f64>) {
        (**self).set_linear_lower_limit(limit);
    }

    fn set_linear_upper_limit(&mut self, limit: Vector3<f64>) {
        (**self).set_linear_upper_limit(limit);
    }

    fn set_angular_lower_limit(&mut self, limit: Vector3<f64>) {
        (**self).set_angular_lower_limit(limit);
    }

    fn set_angular_upper_limit(&mut self, limit: Vector3<f64>) {
        (**self).set_angular_upper_limit(limit);
    }
}

impl<H: SpringConstraintHandle + ?Sized> SpringConstraintHandle for &mut H {
    fn enable_spring(&mut self, index: usize, on: bool) {
        (**self).enable_spring(index, on);
    }

    fn set_stiffness(&mut self, index: usize, stiffness: f64) {
        (**self).set_stiffness(index, stiffness);
    }

    fn set_damping(&mut self, index: usize, damping: f64) {
        (**self).set_damping(index, damping);
    }

    fn set_equilibrium_point(&mut self) {
        (**self).set_equilibrium_point();
    }

    fn set_axis_equilibrium_point(&mut self, index: usize) {
        (**self).set_axis_equilibrium_point(index);
    }
}

impl<H: SixDofConstraintHandle + ?Sized> SixDofConstraintHandle for Box<H> {
    fn set_frames(&mut self, frame_a: &JointFrame, frame_b: &JointFrame) {
        (**self).set_frames(frame_a, frame_b);
    }

    fn set_linear_lower_limit(&mut self, limit: Vector3<f64>) {
        (**self).set_linear_lower_limit(limit);
    }

    fn set_linear_upper_limit(&mut self, limit: Vector3<f64>) {
        (**self).set_linear_upper_limit(limit);
    }

    fn set_angular_lower_limit(&mut self, limit: Vector3<f64>) {
        (**self).set_angular_lower_limit(limit);
    }

    fn set_angular_upper_limit(&mut self, limit: Vector3<f64>) {
        (**self).set_angular_upper_limit(limit);
    }
}

impl<H: SpringConstraintHandle + ?Sized> SpringConstraintHandle for Box<H> {
    fn enable_spring(&mut self, index: usize, on: bool) {
        (**self).enable_spring(index, on);
    }

    fn set_stiffness(&mut self, index: usize, stiffness: f64) {
        (**self).set_stiffness(index, stiffness);
    }

    fn set_damping(&mut self, index: usize, damping: f64) {
        (**self).set_damping(index, damping);
    }

    fn set_equilibrium_point(&mut self) {
        (**self).set_equilibrium_point();
    }

    fn set_axis_equilibrium_point(&mut self, index: usize) {
        (**self).set_axis_equilibrium_point(index);
    }
}

/// A spring constraint handle with no solver attached.
///
/// Stores whatever it is told. The "current" relative pose is whatever was
/// last passed to [`set_current_offsets`](Self::set_current_offsets), and
/// equilibrium capture copies it.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessConstraint {
    frame_a: JointFrame,
    frame_b: JointFrame,
    linear_lower_limit: Vector3<f64>,
    linear_upper_limit: Vector3<f64>,
    angular_lower_limit: Vector3<f64>,
    angular_upper_limit: Vector3<f64>,
    spring_enabled: [bool; DOF_COUNT],
    stiffness: [f64; DOF_COUNT],
    damping: [f64; DOF_COUNT],
    current_offsets: [f64; DOF_COUNT],
    equilibrium: [f64; DOF_COUNT],
}

impl HeadlessConstraint {
    /// Create a handle with identity frames, locked limits and no springs.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_a: JointFrame::default(),
            frame_b: JointFrame::default(),
            linear_lower_limit: Vector3::zeros(),
            linear_upper_limit: Vector3::zeros(),
            angular_lower_limit: Vector3::zeros(),
            angular_upper_limit: Vector3::zeros(),
            spring_enabled: [false; DOF_COUNT],
            stiffness: [0.0; DOF_COUNT],
            damping: [1.0; DOF_COUNT],
            current_offsets: [0.0; DOF_COUNT],
            equilibrium: [0.0; DOF_COUNT],
        }
    }

    /// Set the current relative displacement per DOF (meters, then radians).
    pub fn set_current_offsets(&mut self, offsets: [f64; DOF_COUNT]) {
        self.current_offsets = offsets;
    }

    /// Frame on body A.
    #[must_use]
    pub fn frame_a(&self) -> &JointFrame {
        &self.frame_a
    }

    /// Frame on body B.
    #[must_use]
    pub fn frame_b(&self) -> &JointFrame {
        &self.frame_b
    }

    /// Translation limits as `(lower, upper)`.
    #[must_use]
    pub fn linear_limits(&self) -> (Vector3<f64>, Vector3<f64>) {
        (self.linear_lower_limit, self.linear_upper_limit)
    }

    /// Rotation limits as `(lower, upper)`.
    #[must_use]
    pub fn angular_limits(&self) -> (Vector3<f64>, Vector3<f64>) {
        (self.angular_lower_limit, self.angular_upper_limit)
    }

    /// Spring on/off flags per DOF.
    #[must_use]
    pub fn spring_enabled(&self) -> &[bool; DOF_COUNT] {
        &self.spring_enabled
    }

    /// Spring stiffness per DOF.
    #[must_use]
    pub fn stiffness(&self) -> &[f64; DOF_COUNT] {
        &self.stiffness
    }

    /// Spring damping per DOF.
    #[must_use]
    pub fn damping(&self) -> &[f64; DOF_COUNT] {
        &self.damping
    }

    /// Rest point per DOF.
    #[must_use]
    pub fn equilibrium(&self) -> &[f64; DOF_COUNT] {
        &self.equilibrium
    }
}

impl Default for HeadlessConstraint {
    fn default() -> Self {
        Self::new()
    }
}

impl SixDofConstraintHandle for HeadlessConstraint {
    fn set_frames(&mut self, frame_a: &JointFrame, frame_b: &JointFrame) {
        self.frame_a = *frame_a;
        self.frame_b = *frame_b;
    }

    fn set_linear_lower_limit(&mut self, limit: Vector3<f64>) {
        self.linear_lower_limit = limit;
    }

    fn set_linear_upper_limit(&mut self, limit: Vector3<f64>) {
        self.linear_upper_limit = limit;
    }

    fn set_angular_lower_limit(&mut self, limit: Vector3<f64>) {
        self.angular_lower_limit = limit;
    }

    fn set_angular_upper_limit(&mut self, limit: Vector3<f64>) {
        self.angular_upper_limit = limit;
    }
}

impl SpringConstraintHandle for HeadlessConstraint {
    fn enable_spring(&mut self, index: usize, on: bool) {
        self.spring_enabled[index] = on;
    }

    fn set_stiffness(&mut self, index: usize, stiffness: f64) {
        self.stiffness[index] = stiffness;
    }

    fn set_damping(&mut self, index: usize, damping: f64) {
        self.damping[index] = damping;
    }

    fn set_equilibrium_point(&mut self) {
        self.equilibrium = self.current_offsets;
    }

    fn set_axis_equilibrium_point(&mut self, index: usize) {
        self.equilibrium[index] = self.current_offsets[index];
    }
}
