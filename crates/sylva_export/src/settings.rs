//! Export Settings
//!
//! Inclusion policy for a single export run.
//!
//! ```rust,ignore
//! let settings = ExportSettings::default()
//!     .with_included_layers(LayerMask::NONE.with(0).with(3))
//!     .with_export_disabled_components(true);
//! ```

use std::fmt;

/// Tag marking nodes that only exist in authoring tools.
pub const EDITOR_ONLY_TAG: &str = "EditorOnly";

/// Bit set over the 32 node layers.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn single(layer: u8) -> Self {
        Self::NONE.with(layer)
    }

    /// Adds `layer`. Layers outside `0..32` are ignored.
    #[inline]
    #[must_use]
    pub const fn with(self, layer: u8) -> Self {
        if layer < 32 { Self(self.0 | (1 << layer)) } else { self }
    }

    #[inline]
    #[must_use]
    pub const fn without(self, layer: u8) -> Self {
        if layer < 32 { Self(self.0 & !(1 << layer)) } else { self }
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, layer: u8) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Debug for LayerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerMask({:#034b})", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    /// Export nodes that are inactive in the hierarchy. When off, inactive
    /// nodes are transparent: skipped, with their children promoted.
    pub export_inactive: bool,
    /// Export renderers, cameras and lights whose component is disabled.
    pub export_disabled_components: bool,
    /// Layers whose nodes carry their own features.
    pub included_layers: LayerMask,
    /// Nodes carrying this tag are transparent. `None` disables the check.
    pub excluded_tag: Option<String>,
    /// Write node names.
    pub export_names: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            export_inactive: false,
            export_disabled_components: false,
            included_layers: LayerMask::ALL,
            excluded_tag: Some(EDITOR_ONLY_TAG.to_string()),
            export_names: true,
        }
    }
}

impl ExportSettings {
    #[must_use]
    pub fn with_export_inactive(mut self, value: bool) -> Self {
        self.export_inactive = value;
        self
    }

    #[must_use]
    pub fn with_export_disabled_components(mut self, value: bool) -> Self {
        self.export_disabled_components = value;
        self
    }

    #[must_use]
    pub fn with_included_layers(mut self, layers: LayerMask) -> Self {
        self.included_layers = layers;
        self
    }

    #[must_use]
    pub fn with_excluded_tag(mut self, tag: Option<&str>) -> Self {
        self.excluded_tag = tag.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_export_names(mut self, value: bool) -> Self {
        self.export_names = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_mask_bits() {
        let mask = LayerMask::NONE.with(0).with(31);
        assert!(mask.contains(0));
        assert!(mask.contains(31));
        assert!(!mask.contains(5));
        assert!(!mask.contains(40));
        assert!(!mask.without(0).contains(0));
        assert_eq!(LayerMask::single(40), LayerMask::NONE);
    }
}
