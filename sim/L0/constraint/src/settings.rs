//! Declarative spring configuration.
//!
//! [`SpringSettings`] describes all six springs of a
//! [`SixDofSpringJoint`](crate::SixDofSpringJoint) at once, so a joint can be
//! configured from code presets or, with the `serde` feature, from a config
//! file. Applying settings goes through the joint's setters.

use crate::error::{ConstraintError, Result};
use crate::spring::UNSET;
use crate::types::{DOF_COUNT, Dof};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Spring configuration for one degree of freedom.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AxisSpring {
    /// Whether the spring is active.
    pub enabled: bool,
    /// Spring stiffness (N/m or Nm/rad). `-1.0` means unset.
    pub stiffness: f64,
    /// Spring damping. `-1.0` means unset.
    pub damping: f64,
}

impl AxisSpring {
    /// An enabled spring with the given stiffness and damping.
    #[must_use]
    pub fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            enabled: true,
            stiffness,
            damping,
        }
    }

    /// A disabled spring with unset stiffness and damping.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            stiffness: UNSET,
            damping: UNSET,
        }
    }
}

impl Default for AxisSpring {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Spring configuration for all six degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpringSettings {
    /// Per-axis springs in [`Dof`] index order.
    pub axes: [AxisSpring; DOF_COUNT],
}

impl SpringSettings {
    /// Set the spring on one DOF.
    #[must_use]
    pub fn with_axis(mut self, dof: Dof, spring: AxisSpring) -> Self {
        self.axes[dof.index()] = spring;
        self
    }

    /// Set the same spring on all three translational DOF.
    #[must_use]
    pub fn with_linear(mut self, spring: AxisSpring) -> Self {
        for dof in Dof::ALL.into_iter().filter(|d| d.is_linear()) {
            self.axes[dof.index()] = spring;
        }
        self
    }

    /// Set the same spring on all three rotational DOF.
    #[must_use]
    pub fn with_angular(mut self, spring: AxisSpring) -> Self {
        for dof in Dof::ALL.into_iter().filter(|d| d.is_angular()) {
            self.axes[dof.index()] = spring;
        }
        self
    }

    /// Spring on one DOF.
    #[must_use]
    pub fn axis(&self, dof: Dof) -> &AxisSpring {
        &self.axes[dof.index()]
    }

    /// Number of enabled springs.
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.axes.iter().filter(|a| a.enabled).count()
    }

    /// Validate the configuration.
    ///
    /// Negative stiffness and damping are accepted (`-1.0` is the unset
    /// sentinel); NaN and infinite values are not.
    pub fn validate(&self) -> Result<()> {
        for (dof, axis) in Dof::ALL.iter().zip(&self.axes) {
            if !axis.stiffness.is_finite() {
                return Err(ConstraintError::invalid_config(format!(
                    "{dof:?} stiffness must be finite, got {}",
                    axis.stiffness
                )));
            }
            if !axis.damping.is_finite() {
                return Err(ConstraintError::invalid_config(format!(
                    "{dof:?} damping must be finite, got {}",
                    axis.damping
                )));
            }
        }
        Ok(())
    }
}
