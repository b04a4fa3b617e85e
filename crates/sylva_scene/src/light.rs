use glam::Vec3;
use std::borrow::Cow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    Directional,
    Point {
        range: f32,
    },
    /// Cone angles are in radians, measured from the spot direction.
    Spot {
        range: f32,
        inner_cone: f32,
        outer_cone: f32,
    },
}

/// Punctual light resource. Direction and position come from the bound node.
#[derive(Debug, Clone)]
pub struct Light {
    pub uuid: Uuid,
    pub name: Cow<'static, str>,
    /// Linear RGB
    pub color: Vec3,
    /// Candela for point/spot lights, lux for directional lights
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    fn with_kind(kind: LightKind, color: Vec3, intensity: f32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: Cow::Borrowed("Light"),
            color,
            intensity,
            kind,
        }
    }

    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self::with_kind(LightKind::Directional, color, intensity)
    }

    #[must_use]
    pub fn new_point(color: Vec3, intensity: f32, range: f32) -> Self {
        Self::with_kind(LightKind::Point { range }, color, intensity)
    }

    #[must_use]
    pub fn new_spot(color: Vec3, intensity: f32, range: f32, inner_cone: f32, outer_cone: f32) -> Self {
        Self::with_kind(
            LightKind::Spot {
                range,
                inner_cone,
                outer_cone,
            },
            color,
            intensity,
        )
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Range of a point or spot light. A non-positive range means unlimited.
    #[must_use]
    pub fn range(&self) -> Option<f32> {
        match self.kind {
            LightKind::Directional => None,
            LightKind::Point { range } | LightKind::Spot { range, .. } => (range > 0.0).then_some(range),
        }
    }
}
