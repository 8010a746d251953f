//! Forwarding behaviour of the spring joint setters.
//!
//! Run with: cargo test -p sim-constraint --test spring_joint

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{Call, RecordingConstraint};
use proptest::prelude::*;
use sim_constraint::{BodyId, DOF_COUNT, Dof, SixDofSpringJoint};

fn recording_joint() -> SixDofSpringJoint<RecordingConstraint> {
    SixDofSpringJoint::new(BodyId::new(0), BodyId::new(1), RecordingConstraint::new())
}

// =============================================================================
// Per-index properties
// =============================================================================

proptest! {
    #[test]
    fn enable_spring_caches_and_forwards(index in 0..DOF_COUNT, on in any::<bool>()) {
        let mut joint = recording_joint();
        joint.enable_spring(index, on);

        prop_assert_eq!(joint.springs().is_spring_enabled(index), on);
        prop_assert_eq!(&joint.handle().calls, &vec![Call::EnableSpring(index, on)]);
    }

    #[test]
    fn stiffness_caches_and_forwards(index in 0..DOF_COUNT, value in -1.0e6..1.0e6f64) {
        let mut joint = recording_joint();
        joint.set_stiffness(index, value);

        prop_assert_eq!(joint.springs().stiffness(index), value);
        prop_assert_eq!(&joint.handle().calls, &vec![Call::Stiffness(index, value)]);
    }

    #[test]
    fn damping_caches_and_forwards(index in 0..DOF_COUNT, value in -1.0e6..1.0e6f64) {
        let mut joint = recording_joint();
        joint.set_damping(index, value);

        prop_assert_eq!(joint.springs().damping(index), value);
        prop_assert_eq!(&joint.handle().calls, &vec![Call::Damping(index, value)]);
    }

    #[test]
    fn setters_leave_other_axes_alone(index in 0..DOF_COUNT, value in 0.0..100.0f64) {
        let mut joint = recording_joint();
        joint.enable_spring(index, true);
        joint.set_stiffness(index, value);

        for other in (0..DOF_COUNT).filter(|&i| i != index) {
            prop_assert!(!joint.springs().is_spring_enabled(other));
            prop_assert_eq!(joint.springs().stiffness(other), -1.0);
        }
    }

    #[test]
    fn cache_matches_handle_after_any_sequence(
        ops in prop::collection::vec((0..DOF_COUNT, 0..3u8, -50.0..50.0f64), 0..40)
    ) {
        let mut joint = recording_joint();
        for (index, kind, value) in ops {
            match kind {
                0 => joint.enable_spring(index, value > 0.0),
                1 => joint.set_stiffness(index, value),
                _ => joint.set_damping(index, value),
            }
        }

        // Only replay what was actually sent; untouched axes keep the
        // handle's own defaults, so compare touched axes through the log.
        let springs = *joint.springs();
        let (enabled, stiffness, damping) = joint.handle().spring_state();
        for call in joint.handle().spring_calls() {
            match call {
                Call::EnableSpring(i, _) => prop_assert_eq!(enabled[i], springs.is_spring_enabled(i)),
                Call::Stiffness(i, _) => prop_assert_eq!(stiffness[i], springs.stiffness(i)),
                Call::Damping(i, _) => prop_assert_eq!(damping[i], springs.damping(i)),
                _ => {}
            }
        }
    }
}

// =============================================================================
// Equilibrium point
// =============================================================================

#[test]
fn equilibrium_only_forwards() {
    let mut joint = recording_joint();
    joint.enable_spring(Dof::RotationY.index(), true);
    joint.set_stiffness(Dof::RotationY.index(), 9.0);
    let before = *joint.springs();

    joint.set_equilibrium_point();
    for dof in Dof::ALL {
        joint.set_axis_equilibrium_point(dof.index());
    }

    assert_eq!(*joint.springs(), before);
    let calls = &joint.handle().calls;
    let per_axis: Vec<Call> = (0..DOF_COUNT).map(Call::EquilibriumAxis).collect();
    assert_eq!(calls[2], Call::EquilibriumAll);
    assert_eq!(&calls[3..], per_axis.as_slice());
}

// =============================================================================
// Contract violations
// =============================================================================

#[test]
fn out_of_range_index_panics_before_forwarding() {
    for index in [DOF_COUNT, DOF_COUNT + 1, usize::MAX] {
        let mut joint = recording_joint();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            joint.enable_spring(index, true);
        }));
        assert!(result.is_err(), "index {index} should panic");
        assert!(joint.handle().calls.is_empty());
        assert_eq!(joint.springs().spring_enabled_all(), &[false; DOF_COUNT]);
    }
}

#[test]
#[should_panic(expected = "DOF index 6 out of range")]
fn out_of_range_stiffness_panics() {
    recording_joint().set_stiffness(6, 1.0);
}

#[test]
#[should_panic(expected = "DOF index 6 out of range")]
fn out_of_range_axis_equilibrium_panics() {
    recording_joint().set_axis_equilibrium_point(6);
}

// =============================================================================
// Borrowed handles
// =============================================================================

#[test]
fn joint_over_borrowed_handle() {
    let mut handle = RecordingConstraint::new();
    {
        let mut joint = SixDofSpringJoint::new(BodyId::new(4), BodyId::new(5), &mut handle);
        joint.enable_spring(0, true);
        joint.set_damping(0, 0.7);
    }
    assert_eq!(
        handle.calls,
        vec![Call::EnableSpring(0, true), Call::Damping(0, 0.7)]
    );
}
