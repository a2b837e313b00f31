//! Blending of wheel friction coefficients with the supporting surface's material.

use std::fmt;
use std::sync::Arc;

use crate::core::types::MixingMode;

/// Strategy combining a wheel coefficient with the material coefficient.
pub trait FrictionBlender: Send + Sync {
    fn blend(&self, wheel_coefficient: f32, material_coefficient: f32, is_kinetic: bool) -> f32;
}

impl FrictionBlender for MixingMode {
    fn blend(&self, wheel_coefficient: f32, material_coefficient: f32, _is_kinetic: bool) -> f32 {
        self.combine(wheel_coefficient, material_coefficient)
    }
}

impl<F> FrictionBlender for F
where
    F: Fn(f32, f32, bool) -> f32 + Send + Sync,
{
    fn blend(&self, wheel_coefficient: f32, material_coefficient: f32, is_kinetic: bool) -> f32 {
        self(wheel_coefficient, material_coefficient, is_kinetic)
    }
}

/// Shared handle to a blending strategy, cheap to clone between wheels.
#[derive(Clone)]
pub struct SharedBlender(Arc<dyn FrictionBlender>);

impl SharedBlender {
    pub fn new(blender: impl FrictionBlender + 'static) -> Self {
        Self(Arc::new(blender))
    }

    /// Blends and clamps the result so a custom strategy can never yield a
    /// negative coefficient.
    pub fn blend(&self, wheel_coefficient: f32, material_coefficient: f32, is_kinetic: bool) -> f32 {
        self.0
            .blend(wheel_coefficient, material_coefficient, is_kinetic)
            .max(0.0)
    }
}

impl Default for SharedBlender {
    /// Multiplies the two coefficients.
    fn default() -> Self {
        Self::new(MixingMode::Multiply)
    }
}

impl fmt::Debug for SharedBlender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedBlender")
    }
}

/// Coefficient a braking wheel uses: static below `threshold` (strictly), kinetic otherwise.
pub fn braking_coefficient(
    blender: &SharedBlender,
    speed: f32,
    threshold: f32,
    kinetic: (f32, f32),
    static_: (f32, f32),
) -> f32 {
    if speed.abs() < threshold {
        blender.blend(static_.0, static_.1, false)
    } else {
        blender.blend(kinetic.0, kinetic.1, true)
    }
}
