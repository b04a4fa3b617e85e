use std::borrow::Cow;
use sylva_core::Color;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AlphaMode {
    #[default]
    Opaque,
    /// Alpha test with the given cutoff.
    Mask(f32),
    Blend,
}

/// Metallic-roughness PBR material.
///
/// Texture bindings are not part of the host model; only the factors are
/// exported.
#[derive(Debug, Clone)]
pub struct Material {
    pub uuid: Uuid,
    pub name: Cow<'static, str>,

    pub base_color: Color,
    pub metallic: f32,
    pub roughness: f32,
    /// Linear RGB emissive factor
    pub emissive: [f32; 3],

    pub alpha_mode: AlphaMode,
    pub double_sided: bool,
}

impl Material {
    #[must_use]
    pub fn new(base_color: Color) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: Cow::Borrowed("Material"),
            base_color,
            metallic: 0.0,
            roughness: 1.0,
            emissive: [0.0; 3],
            alpha_mode: AlphaMode::Opaque,
            double_sided: false,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_metallic_roughness(mut self, metallic: f32, roughness: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_emissive(mut self, emissive: [f32; 3]) -> Self {
        self.emissive = emissive;
        self
    }

    #[must_use]
    pub fn with_alpha_mode(mut self, alpha_mode: AlphaMode) -> Self {
        self.alpha_mode = alpha_mode;
        self
    }

    #[must_use]
    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Color::WHITE)
    }
}
