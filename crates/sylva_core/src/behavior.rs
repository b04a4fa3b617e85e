//! Behavior Capability Interface
//!
//! Behaviors are typed state attached to scene nodes (gameplay scripts,
//! metadata components, ...). The exporter never inspects their types; each
//! behavior enumerates its own fields through [`Behavior::fields`], tagging
//! every field with a [`FieldAccess`] level so the exporter can apply its
//! inclusion policy.
//!
//! # Declaring a behavior
//!
//! ```rust,ignore
//! use sylva_core::impl_behavior;
//!
//! struct Health {
//!     pub health: i32,
//!     pub name: String,
//!     regen_timer: f32,
//! }
//!
//! impl_behavior!(Health {
//!     Public health,
//!     Public name,
//!     Private regen_timer,
//! });
//! ```

use std::fmt;

use crate::value::{ToValue, Value};

/// Visibility of a behavior field, as seen by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldAccess {
    /// Visible outside the owning type.
    Public,
    /// Internal, but explicitly marked for serialization.
    Serialized,
    /// Internal state that is never exported.
    Private,
}

impl FieldAccess {
    /// Returns `true` for fields that participate in serialization.
    #[inline]
    #[must_use]
    pub const fn is_serializable(self) -> bool {
        matches!(self, Self::Public | Self::Serialized)
    }
}

/// Borrowed view of a field's current value.
#[derive(Clone, Copy)]
pub enum FieldRef<'a> {
    /// A value with a known conversion.
    Value(&'a dyn ToValue),
    /// A value of unrecognized shape; exported as its `Debug` rendering.
    Opaque(&'a dyn fmt::Debug),
}

impl FieldRef<'_> {
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            FieldRef::Value(v) => v.to_value(),
            FieldRef::Opaque(v) => Value::Text(format!("{v:?}")),
        }
    }
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Value(v) => write!(f, "Value({})", v.to_value()),
            FieldRef::Opaque(v) => write!(f, "Opaque({v:?})"),
        }
    }
}

/// One named field of a behavior instance.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub name: &'a str,
    pub access: FieldAccess,
    pub value: FieldRef<'a>,
}

impl<'a> Field<'a> {
    #[inline]
    #[must_use]
    pub fn new(name: &'a str, access: FieldAccess, value: &'a dyn ToValue) -> Self {
        Self {
            name,
            access,
            value: FieldRef::Value(value),
        }
    }

    #[inline]
    #[must_use]
    pub fn public(name: &'a str, value: &'a dyn ToValue) -> Self {
        Self::new(name, FieldAccess::Public, value)
    }

    #[inline]
    #[must_use]
    pub fn serialized(name: &'a str, value: &'a dyn ToValue) -> Self {
        Self::new(name, FieldAccess::Serialized, value)
    }

    #[inline]
    #[must_use]
    pub fn private(name: &'a str, value: &'a dyn ToValue) -> Self {
        Self::new(name, FieldAccess::Private, value)
    }

    /// A field whose type has no [`ToValue`] conversion.
    #[inline]
    #[must_use]
    pub fn opaque(name: &'a str, access: FieldAccess, value: &'a dyn fmt::Debug) -> Self {
        Self {
            name,
            access,
            value: FieldRef::Opaque(value),
        }
    }
}

/// Typed state attached to a scene node.
pub trait Behavior {
    /// Fully-qualified type name written next to the exported fields.
    fn type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// All instance fields in declaration order, private ones included.
    fn fields(&self) -> Vec<Field<'_>>;
}

impl fmt::Debug for dyn Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("type_name", &self.type_name())
            .finish_non_exhaustive()
    }
}

/// Implements [`Behavior`] for a struct by listing its fields with their
/// [`FieldAccess`] level. Every listed field must implement
/// [`ToValue`](crate::value::ToValue).
///
/// An optional `as "Name"` overrides the reported type name.
#[macro_export]
macro_rules! impl_behavior {
    ($t:ty as $name:literal { $($access:ident $field:ident),* $(,)? }) => {
        impl $crate::behavior::Behavior for $t {
            fn type_name(&self) -> &str {
                $name
            }

            fn fields(&self) -> ::std::vec::Vec<$crate::behavior::Field<'_>> {
                ::std::vec![
                    $(
                        $crate::behavior::Field::new(
                            ::std::stringify!($field),
                            $crate::behavior::FieldAccess::$access,
                            &self.$field,
                        )
                    ),*
                ]
            }
        }
    };
    ($t:ty { $($access:ident $field:ident),* $(,)? }) => {
        impl $crate::behavior::Behavior for $t {
            fn fields(&self) -> ::std::vec::Vec<$crate::behavior::Field<'_>> {
                ::std::vec![
                    $(
                        $crate::behavior::Field::new(
                            ::std::stringify!($field),
                            $crate::behavior::FieldAccess::$access,
                            &self.$field,
                        )
                    ),*
                ]
            }
        }
    };
}
