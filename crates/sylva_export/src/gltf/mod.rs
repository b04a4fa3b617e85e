//! glTF 2.0 document writer for [`sylva_scene::Scene`] exports.
//!
//! Writes a single `.gltf` JSON file with the binary buffer embedded as a
//! data URI. Lights use `KHR_lights_punctual`; node behaviors are stored in
//! `extras` as `{"components": [...]}`.

pub mod document;
mod writer;

pub use writer::{GltfWriter, GltfWriterSettings};
