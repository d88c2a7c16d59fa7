//! Parameters for support generation.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::error::{SupportError, SupportResult};

/// Parameters for support generation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportParams {
    /// Printable overhang angle in radians, in `[0, π/2]`. A face is flagged
    /// as an overhang when the angle between its outward normal and straight
    /// down is at most π/2 − `overhang_angle`, so larger values flag fewer
    /// faces. Default: π/4 (45 degrees)
    pub overhang_angle: f64,

    /// Half-angle of the support cones in radians, in `(0, π/2)`. Controls
    /// how far sideways struts may lean while descending. Default: π/4
    /// (45 degrees), matching the overhang angle.
    pub cone_half_angle: f64,

    /// Grid spacing for overhang sample thinning, in mesh length units.
    /// The raw per-face sampling grid is ten times finer. Default: 1.0
    pub sample_spacing: f64,

    /// Maximum cost a merge candidate may have before the point being
    /// connected is discarded as unsupportable. The build plate always
    /// offers a finite candidate, so the default never discards anything.
    /// Default: `f64::INFINITY`
    pub merge_threshold: f64,
}

impl Default for SupportParams {
    fn default() -> Self {
        Self {
            overhang_angle: FRAC_PI_4, // 45 degrees
            cone_half_angle: FRAC_PI_4,
            sample_spacing: 1.0,
            merge_threshold: f64::INFINITY,
        }
    }
}

impl SupportParams {
    /// Create params for a given printable overhang angle, with the cone
    /// half-angle matched to it.
    #[must_use]
    pub fn with_overhang_angle(angle: f64) -> Self {
        Self {
            overhang_angle: angle,
            cone_half_angle: angle,
            ..Default::default()
        }
    }

    /// Set the cone half-angle independently of the overhang angle.
    #[must_use]
    pub const fn with_cone_half_angle(mut self, angle: f64) -> Self {
        self.cone_half_angle = angle;
        self
    }

    /// Set the sample spacing.
    #[must_use]
    pub const fn with_sample_spacing(mut self, spacing: f64) -> Self {
        self.sample_spacing = spacing;
        self
    }

    /// Set the merge cost threshold.
    #[must_use]
    pub const fn with_merge_threshold(mut self, threshold: f64) -> Self {
        self.merge_threshold = threshold;
        self
    }

    /// Tangent of the cone half-angle. Finite and positive for validated
    /// params.
    pub(crate) fn tan_half_angle(&self) -> f64 {
        self.cone_half_angle.tan()
    }

    /// Check that every field is in range.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::InvalidParameter`] naming the first offending
    /// field.
    pub fn validate(&self) -> SupportResult<()> {
        if !self.overhang_angle.is_finite()
            || self.overhang_angle < 0.0
            || self.overhang_angle > FRAC_PI_2
        {
            return Err(SupportError::InvalidParameter {
                name: "overhang_angle",
                value: self.overhang_angle,
                requirement: "in [0, pi/2]",
            });
        }

        if !self.cone_half_angle.is_finite()
            || self.cone_half_angle <= 0.0
            || self.cone_half_angle >= FRAC_PI_2
        {
            return Err(SupportError::InvalidParameter {
                name: "cone_half_angle",
                value: self.cone_half_angle,
                requirement: "in (0, pi/2)",
            });
        }

        if !self.sample_spacing.is_finite() || self.sample_spacing <= 0.0 {
            return Err(SupportError::InvalidParameter {
                name: "sample_spacing",
                value: self.sample_spacing,
                requirement: "finite and positive",
            });
        }

        if self.merge_threshold.is_nan() || self.merge_threshold < 0.0 {
            return Err(SupportError::InvalidParameter {
                name: "merge_threshold",
                value: self.merge_threshold,
                requirement: "non-negative (infinity allowed)",
            });
        }

        Ok(())
    }
}
