use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Linear and angular velocity of a rigid body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

impl Velocity {
    pub fn new(linear: Vec3, angular: Vec3) -> Self {
        Self { linear, angular }
    }
}

/// Mass and inertia tensor data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MassProperties {
    pub mass: f32,
    pub inertia: Mat3,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self {
            mass: 1.0,
            inertia: Mat3::IDENTITY,
        }
    }
}

/// Friction and bounciness of a contact, already blended from both materials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionProperties {
    pub kinetic_friction: f32,
    pub static_friction: f32,
    pub bounciness: f32,
}

impl Default for InteractionProperties {
    fn default() -> Self {
        Material::default().interaction_with(&Material::default())
    }
}

/// Surface coefficients of a single body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub static_friction: f32,
    pub kinetic_friction: f32,
    pub bounciness: f32,
    /// How this material mixes its coefficients with another material.
    pub mixing: MixingMode,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            static_friction: 0.6,
            kinetic_friction: 0.3,
            bounciness: 0.0,
            mixing: MixingMode::Average,
        }
    }
}

impl Material {
    pub fn rubber() -> Self {
        Self {
            static_friction: 1.2,
            kinetic_friction: 1.0,
            bounciness: 0.6,
            mixing: MixingMode::Average,
        }
    }

    pub fn asphalt() -> Self {
        Self {
            static_friction: 0.9,
            kinetic_friction: 0.7,
            bounciness: 0.05,
            mixing: MixingMode::Average,
        }
    }

    pub fn ice() -> Self {
        Self {
            static_friction: 0.05,
            kinetic_friction: 0.03,
            bounciness: 0.05,
            mixing: MixingMode::Min,
        }
    }

    /// Blends two materials. A non-average mode on either side wins.
    pub fn interaction_with(&self, other: &Self) -> InteractionProperties {
        let mode = self.mixing.resolve(other.mixing);
        InteractionProperties {
            kinetic_friction: mode.combine(self.kinetic_friction, other.kinetic_friction),
            static_friction: mode.combine(self.static_friction, other.static_friction),
            bounciness: mode.combine(self.bounciness, other.bounciness),
        }
    }
}

/// Rule combining two non-negative coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MixingMode {
    #[default]
    Average,
    Min,
    Max,
    Multiply,
    GeometricMean,
}

impl MixingMode {
    pub fn combine(self, a: f32, b: f32) -> f32 {
        match self {
            MixingMode::Average => 0.5 * (a + b),
            MixingMode::Min => a.min(b),
            MixingMode::Max => a.max(b),
            MixingMode::Multiply => a * b,
            MixingMode::GeometricMean => (a * b).max(0.0).sqrt(),
        }
    }

    fn resolve(self, other: MixingMode) -> MixingMode {
        if matches!(self, MixingMode::Average) {
            other
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixing_modes_combine_expected_values() {
        assert!((MixingMode::Average.combine(0.6, 0.2) - 0.4).abs() < 1e-5);
        assert!((MixingMode::Min.combine(0.6, 0.2) - 0.2).abs() < 1e-5);
        assert!((MixingMode::Max.combine(0.6, 0.2) - 0.6).abs() < 1e-5);
        assert!((MixingMode::Multiply.combine(0.6, 0.2) - 0.12).abs() < 1e-5);

        let expected = (0.6_f32 * 0.2_f32).sqrt();
        assert!((MixingMode::GeometricMean.combine(0.6, 0.2) - expected).abs() < 1e-5);
    }

    #[test]
    fn non_average_mode_takes_precedence() {
        let pair = Material::rubber().interaction_with(&Material::ice());
        assert!((pair.static_friction - 0.05).abs() < 1e-6);
        assert!((pair.kinetic_friction - 0.03).abs() < 1e-6);

        let mirrored = Material::ice().interaction_with(&Material::rubber());
        assert_eq!(pair, mirrored);
    }
}
