//! Shared test helpers.

#![allow(dead_code)]

use nalgebra::Vector3;
use sim_constraint::{JointFrame, SixDofConstraintHandle, SpringConstraintHandle};

/// One call received by a [`RecordingConstraint`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetFrames(JointFrame, JointFrame),
    LinearLower(Vector3<f64>),
    LinearUpper(Vector3<f64>),
    AngularLower(Vector3<f64>),
    AngularUpper(Vector3<f64>),
    EnableSpring(usize, bool),
    Stiffness(usize, f64),
    Damping(usize, f64),
    EquilibriumAll,
    EquilibriumAxis(usize),
}

/// Handle that logs every call in order.
#[derive(Debug, Default)]
pub struct RecordingConstraint {
    pub calls: Vec<Call>,
}

impl RecordingConstraint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls that touched spring state, in order.
    pub fn spring_calls(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::EnableSpring(..) | Call::Stiffness(..) | Call::Damping(..)
                )
            })
            .cloned()
            .collect()
    }

    /// Final per-axis spring state implied by the call log.
    pub fn spring_state(&self) -> ([bool; 6], [f64; 6], [f64; 6]) {
        let mut enabled = [false; 6];
        let mut stiffness = [0.0; 6];
        let mut damping = [1.0; 6];
        for call in &self.calls {
            match *call {
                Call::EnableSpring(i, on) => enabled[i] = on,
                Call::Stiffness(i, v) => stiffness[i] = v,
                Call::Damping(i, v) => damping[i] = v,
                _ => {}
            }
        }
        (enabled, stiffness, damping)
    }
}

impl SixDofConstraintHandle for RecordingConstraint {
    fn set_frames(&mut self, frame_a: &JointFrame, frame_b: &JointFrame) {
        self.calls.push(Call::SetFrames(*frame_a, *frame_b));
    }

    fn set_linear_lower_limit(&mut self, limit: Vector3<f64>) {
        self.calls.push(Call::LinearLower(limit));
    }

    fn set_linear_upper_limit(&mut self, limit: Vector3<f64>) {
        self.calls.push(Call::LinearUpper(limit));
    }

    fn set_angular_lower_limit(&mut self, limit: Vector3<f64>) {
        self.calls.push(Call::AngularLower(limit));
    }

    fn set_angular_upper_limit(&mut self, limit: Vector3<f64>) {
        self.calls.push(Call::AngularUpper(limit));
    }
}

impl SpringConstraintHandle for RecordingConstraint {
    fn enable_spring(&mut self, index: usize, on: bool) {
        self.calls.push(Call::EnableSpring(index, on));
    }

    fn set_stiffness(&mut self, index: usize, stiffness: f64) {
        self.calls.push(Call::Stiffness(index, stiffness));
    }

    fn set_damping(&mut self, index: usize, damping: f64) {
        self.calls.push(Call::Damping(index, damping));
    }

    fn set_equilibrium_point(&mut self) {
        self.calls.push(Call::EquilibriumAll);
    }

    fn set_axis_equilibrium_point(&mut self, index: usize) {
        self.calls.push(Call::EquilibriumAxis(index));
    }
}
