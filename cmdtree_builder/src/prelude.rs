//! Traits which, typically, may be imported without concern: `use cmdtree::prelude::*`.

use crate::argument::{Argument, ArgumentError};

/// Typed access to an [`Argument`] whose value is a `T`.
// Needs to be imported in order to use the typed setters/getters on the argument kinds.
pub trait TypedArgument<T>: Argument {
    /// Get a copy of the current value.
    fn get(&self) -> T;

    /// Get a copy of the default value.
    fn default_value(&self) -> T;

    /// Validate `value` and take it as the current value.
    fn set(&mut self, value: T) -> Result<(), ArgumentError>;
}
