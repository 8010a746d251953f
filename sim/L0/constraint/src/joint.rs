//! Six-DOF joint linking two rigid bodies.
//!
//! [`SixDofJoint`] caches the joint's frames and per-axis limits and forwards
//! every change to its [`SixDofConstraintHandle`]. The cached values are
//! always the last values the handle received, so saving a joint never has to
//! query the physics engine.

use nalgebra::Vector3;
use tracing::{debug, trace};

use crate::capsule::{InputCapsule, OutputCapsule, Savable};
use crate::error::Result;
use crate::handle::SixDofConstraintHandle;
use crate::types::{BodyId, DOF_COUNT, JointFrame};

/// Trait for joints linking two bodies.
pub trait Joint {
    /// First linked body.
    fn body_a(&self) -> BodyId;

    /// Second linked body.
    fn body_b(&self) -> BodyId;

    /// Joint frame in body A's local space.
    fn frame_a(&self) -> &JointFrame;

    /// Joint frame in body B's local space.
    fn frame_b(&self) -> &JointFrame;

    /// Number of degrees of freedom the joint addresses.
    fn dof(&self) -> usize;
}

/// A generic six-DOF joint.
///
/// Each translational and rotational axis can be limited independently.
/// Limits follow the usual convention of the underlying solvers:
///
/// - `lower == upper` locks the axis
/// - `lower < upper` limits the axis to that range
/// - `lower > upper` leaves the axis free
///
/// New joints start with all limits at zero, i.e. fully locked.
///
/// The joint does not own the simulation side of the constraint; `H` is
/// whatever gives access to it. Use `&mut H` to borrow a handle owned
/// elsewhere.
#[derive(Debug, Clone)]
pub struct SixDofJoint<H> {
    body_a: BodyId,
    body_b: BodyId,
    frame_a: JointFrame,
    frame_b: JointFrame,
    /// Whether linear limits are expressed in body A's frame.
    use_linear_reference_frame_a: bool,
    collision_between_linked_bodies: bool,
    linear_lower_limit: Vector3<f64>,
    linear_upper_limit: Vector3<f64>,
    angular_lower_limit: Vector3<f64>,
    angular_upper_limit: Vector3<f64>,
    handle: H,
}

impl<H: SixDofConstraintHandle> SixDofJoint<H> {
    /// Bind a joint to an already-created constraint handle.
    ///
    /// Nothing is forwarded: the handle is assumed to have been created for
    /// these bodies with identity frames.
    #[must_use]
    pub fn new(body_a: BodyId, body_b: BodyId, handle: H) -> Self {
        Self {
            body_a,
            body_b,
            frame_a: JointFrame::default(),
            frame_b: JointFrame::default(),
            use_linear_reference_frame_a: true,
            collision_between_linked_bodies: true,
            linear_lower_limit: Vector3::zeros(),
            linear_upper_limit: Vector3::zeros(),
            angular_lower_limit: Vector3::zeros(),
            angular_upper_limit: Vector3::zeros(),
            handle,
        }
    }

    /// Set both joint frames.
    #[must_use]
    pub fn with_frames(mut self, frame_a: JointFrame, frame_b: JointFrame) -> Self {
        self.set_frames(frame_a, frame_b);
        self
    }

    /// Choose whether linear limits are measured in body A's frame.
    #[must_use]
    pub fn with_linear_reference_frame_a(mut self, use_frame_a: bool) -> Self {
        self.use_linear_reference_frame_a = use_frame_a;
        self
    }

    /// Replace both joint frames.
    pub fn set_frames(&mut self, frame_a: JointFrame, frame_b: JointFrame) {
        self.frame_a = frame_a;
        self.frame_b = frame_b;
        trace!(body_a = %self.body_a, body_b = %self.body_b, "forwarding joint frames");
        self.handle.set_frames(&self.frame_a, &self.frame_b);
    }

    /// Set the lower translation limit.
    pub fn set_linear_lower_limit(&mut self, limit: Vector3<f64>) {
        self.linear_lower_limit = limit;
        trace!(?limit, "forwarding linear lower limit");
        self.handle.set_linear_lower_limit(limit);
    }

    /// Set the upper translation limit.
    pub fn set_linear_upper_limit(&mut self, limit: Vector3<f64>) {
        self.linear_upper_limit = limit;
        trace!(?limit, "forwarding linear upper limit");
        self.handle.set_linear_upper_limit(limit);
    }

    /// Set the lower rotation limit in radians.
    pub fn set_angular_lower_limit(&mut self, limit: Vector3<f64>) {
        self.angular_lower_limit = limit;
        trace!(?limit, "forwarding angular lower limit");
        self.handle.set_angular_lower_limit(limit);
    }

    /// Set the upper rotation limit in radians.
    pub fn set_angular_upper_limit(&mut self, limit: Vector3<f64>) {
        self.angular_upper_limit = limit;
        trace!(?limit, "forwarding angular upper limit");
        self.handle.set_angular_upper_limit(limit);
    }

    /// Allow or forbid collisions between the two linked bodies.
    ///
    /// This is a flag for whoever adds the joint to a world; it is not a
    /// property of the constraint itself and is not forwarded.
    pub fn set_collision_between_linked_bodies(&mut self, enabled: bool) {
        self.collision_between_linked_bodies = enabled;
    }

    /// Whether linear limits are measured in body A's frame.
    #[must_use]
    pub fn uses_linear_reference_frame_a(&self) -> bool {
        self.use_linear_reference_frame_a
    }

    /// Whether the linked bodies collide with each other.
    #[must_use]
    pub fn is_collision_between_linked_bodies(&self) -> bool {
        self.collision_between_linked_bodies
    }

    /// Lower translation limit.
    #[must_use]
    pub fn linear_lower_limit(&self) -> Vector3<f64> {
        self.linear_lower_limit
    }

    /// Upper translation limit.
    #[must_use]
    pub fn linear_upper_limit(&self) -> Vector3<f64> {
        self.linear_upper_limit
    }

    /// Lower rotation limit.
    #[must_use]
    pub fn angular_lower_limit(&self) -> Vector3<f64> {
        self.angular_lower_limit
    }

    /// Upper rotation limit.
    #[must_use]
    pub fn angular_upper_limit(&self) -> Vector3<f64> {
        self.angular_upper_limit
    }

    /// The constraint handle.
    #[must_use]
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Unbind the joint, returning its handle.
    #[must_use]
    pub fn into_handle(self) -> H {
        self.handle
    }

    /// Mutable access for types layered on top of this joint. Writing to the
    /// handle directly would desynchronise the cached state.
    pub(crate) fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }
}

impl<H: SixDofConstraintHandle> Joint for SixDofJoint<H> {
    fn body_a(&self) -> BodyId {
        self.body_a
    }

    fn body_b(&self) -> BodyId {
        self.body_b
    }

    fn frame_a(&self) -> &JointFrame {
        &self.frame_a
    }

    fn frame_b(&self) -> &JointFrame {
        &self.frame_b
    }

    fn dof(&self) -> usize {
        DOF_COUNT
    }
}

impl<H: SixDofConstraintHandle> Savable for SixDofJoint<H> {
    fn save<C: OutputCapsule>(&self, capsule: &mut C) -> Result<()> {
        capsule.write("nodeA", self.body_a)?;
        capsule.write("nodeB", self.body_b)?;
        capsule.write("pivotA", self.frame_a.pivot)?;
        capsule.write("pivotB", self.frame_b.pivot)?;
        capsule.write("rotA", self.frame_a.rotation)?;
        capsule.write("rotB", self.frame_b.rotation)?;
        capsule.write(
            "useLinearReferenceFrameA",
            self.use_linear_reference_frame_a,
        )?;
        capsule.write(
            "collisionBetweenLinkedBodys",
            self.collision_between_linked_bodies,
        )?;
        capsule.write("linearLowerLimit", self.linear_lower_limit)?;
        capsule.write("linearUpperLimit", self.linear_upper_limit)?;
        capsule.write("angularLowerLimit", self.angular_lower_limit)?;
        capsule.write("angularUpperLimit", self.angular_upper_limit)?;
        debug!(body_a = %self.body_a, body_b = %self.body_b, "saved six-dof joint");
        Ok(())
    }

    fn load<C: InputCapsule>(&mut self, capsule: &C) -> Result<()> {
        // Read everything before touching any state so a bad field leaves the
        // joint as it was.
        let body_a = capsule.read("nodeA", self.body_a)?;
        let body_b = capsule.read("nodeB", self.body_b)?;
        let frame_a = JointFrame::new(
            capsule.read("pivotA", self.frame_a.pivot)?,
            capsule.read("rotA", self.frame_a.rotation)?,
        );
        let frame_b = JointFrame::new(
            capsule.read("pivotB", self.frame_b.pivot)?,
            capsule.read("rotB", self.frame_b.rotation)?,
        );
        let use_frame_a = capsule.read(
            "useLinearReferenceFrameA",
            self.use_linear_reference_frame_a,
        )?;
        let collision = capsule.read(
            "collisionBetweenLinkedBodys",
            self.collision_between_linked_bodies,
        )?;
        let linear_lower = capsule.read("linearLowerLimit", self.linear_lower_limit)?;
        let linear_upper = capsule.read("linearUpperLimit", self.linear_upper_limit)?;
        let angular_lower = capsule.read("angularLowerLimit", self.angular_lower_limit)?;
        let angular_upper = capsule.read("angularUpperLimit", self.angular_upper_limit)?;

        self.body_a = body_a;
        self.body_b = body_b;
        self.use_linear_reference_frame_a = use_frame_a;
        self.set_collision_between_linked_bodies(collision);
        self.set_frames(frame_a, frame_b);
        self.set_linear_lower_limit(linear_lower);
        self.set_linear_upper_limit(linear_upper);
        self.set_angular_lower_limit(angular_lower);
        self.set_angular_upper_limit(angular_upper);
        debug!(body_a = %self.body_a, body_b = %self.body_b, "loaded six-dof joint");
        Ok(())
    }
}
