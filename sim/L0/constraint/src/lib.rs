//! Joint configuration layer over native physics constraints.
//!
//! This crate provides the joint types a simulation builds and persists,
//! while the constraint solving itself stays in the physics engine:
//!
//! - [`SixDofJoint`] - generic six-DOF joint with frames and per-axis limits
//! - [`SixDofSpringJoint`] - six-DOF joint with a spring on every axis
//! - [`SpringSettings`] - declarative spring configuration
//!
//! Joints cache their configuration and forward every change to a constraint
//! handle ([`SixDofConstraintHandle`], [`SpringConstraintHandle`]). The cache
//! is what gets saved, through the named-field capsules in [`capsule`].
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. Physics-engine
//! bindings implement the handle traits; [`HeadlessConstraint`] covers
//! headless use.
//!
//! # Example
//!
//! ```
//! use sim_constraint::{
//!     AxisSpring, BodyId, Dof, HeadlessConstraint, Record, Savable, SixDofSpringJoint,
//!     SpringSettings,
//! };
//!
//! let settings = SpringSettings::default()
//!     .with_axis(Dof::TranslationY, AxisSpring::new(35.0, 0.4));
//!
//! let mut joint =
//!     SixDofSpringJoint::new(BodyId::new(1), BodyId::new(2), HeadlessConstraint::new());
//! joint.apply_settings(&settings);
//!
//! let mut record = Record::new();
//! joint.save(&mut record).unwrap();
//!
//! let mut copy =
//!     SixDofSpringJoint::new(BodyId::new(0), BodyId::new(0), HeadlessConstraint::new());
//! copy.load(&record).unwrap();
//! assert_eq!(copy.settings(), settings);
//! ```
//!
//! # Threading
//!
//! Joints are plain values with no interior locking. Configure a joint from
//! one thread at a time, or from the simulation step that owns it.

#![doc(html_root_url = "https://docs.rs/sim-constraint/0.7.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod capsule;
mod error;
mod handle;
mod joint;
mod settings;
mod spring;
mod types;

pub use capsule::{Field, FieldValue, InputCapsule, OutputCapsule, Record, Savable};
pub use error::{ConstraintError, Result};
pub use handle::{HeadlessConstraint, SixDofConstraintHandle, SpringConstraintHandle};
pub use joint::{Joint, SixDofJoint};
pub use settings::{AxisSpring, SpringSettings};
pub use spring::{SixDofSpringJoint, SpringJointConfig, UNSET};
pub use types::{BodyId, DOF_COUNT, Dof, JointFrame};

// Re-export math types used in joint frames and limits
pub use nalgebra::{Point3, UnitQuaternion, Vector3};
