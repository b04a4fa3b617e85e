//! Foundational types shared by the Sylva crates:
//!
//! - [`value`]: the generic, format-agnostic value tree and [`ToValue`]
//! - [`behavior`]: the capability interface behaviors implement to be exported
//! - [`color`]: linear RGBA color

pub mod behavior;
pub mod color;
pub mod value;

pub use behavior::{Behavior, Field, FieldAccess, FieldRef};
pub use color::Color;
pub use value::{ToValue, Value, ValueMap};
