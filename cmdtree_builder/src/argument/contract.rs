use std::any::Any;
use std::sync::Arc;
use thiserror::Error;

/// A named setting's value holder, as seen by the parser.
///
/// The parser never knows the concrete kind of an argument.
/// It only sets it from text, copies it, and hands it over to a [`Context`](./struct.Context.html).
/// Typed access goes through [`TypedArgument`](./prelude/trait.TypedArgument.html) or [`Context::get`](./struct.Context.html#method.get).
///
/// Implementations must keep their value valid: a failed `set_*` leaves the previous value in place.
pub trait Argument: Any + Send + Sync + std::fmt::Debug {
    /// Parse `text` and take it as the current value.
    ///
    /// Fails with [`ArgumentError::InvalidFormat`] when `text` is not a valid representation of the underlying type,
    /// or with [`ArgumentError::InvalidValue`] when it is, but the value is rejected (bounds, custom validation, etc).
    fn set_from_text(&mut self, text: &str) -> Result<(), ArgumentError>;

    /// Take the current value of `other`, which must be the same kind of argument.
    fn set_from(&mut self, other: &dyn Argument) -> Result<(), ArgumentError>;

    /// Restore the default value.
    fn reset(&mut self);

    /// Produce an independent copy of this argument, value and declaration alike.
    fn clone_boxed(&self) -> Box<dyn Argument>;

    /// The display name of this kind of argument (ex: `i64`, `string`).
    fn kind(&self) -> &'static str;

    /// Whether a quoted string token may be used to set this argument.
    fn accepts_string(&self) -> bool {
        false
    }

    /// The current value, type-erased.
    fn value_any(&self) -> &dyn Any;

    /// Render the current value for display.
    fn render(&self) -> String;

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Argument {
    /// Downcast to the concrete argument kind `A`.
    pub fn downcast_ref<A: Argument>(&self) -> Option<&A> {
        self.as_any().downcast_ref::<A>()
    }

    /// Mutably downcast to the concrete argument kind `A`.
    pub fn downcast_mut<A: Argument>(&mut self) -> Option<&mut A> {
        self.as_any_mut().downcast_mut::<A>()
    }
}

impl Clone for Box<dyn Argument> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// The error raised when an argument rejects its input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArgumentError {
    /// The input could not be read as the underlying type.
    #[error("cannot convert '{token}' to {kind}: {reason}.")]
    InvalidFormat {
        /// The rejected input.
        token: String,
        /// The argument kind.
        kind: &'static str,
        /// Why the conversion failed.
        reason: String,
    },

    /// The input was read, but the value is not allowed.
    #[error("invalid value '{token}': {message}.")]
    InvalidValue {
        /// The rejected input.
        token: String,
        /// Why the value is not allowed.
        message: String,
    },

    /// A select argument was declared without any options.
    #[error("a select argument requires at least one option.")]
    NoOptions,

    /// An argument was set from a different kind of argument.
    #[error("cannot set {expected} from {actual}.")]
    KindMismatch {
        /// The kind being set.
        expected: &'static str,
        /// The kind provided.
        actual: &'static str,
    },
}

impl ArgumentError {
    pub(crate) fn invalid_value(token: impl ToString, message: impl Into<String>) -> Self {
        ArgumentError::InvalidValue {
            token: token.to_string(),
            message: message.into(),
        }
    }
}

/// A custom validation rule for the value of an argument.
/// Returns `Some(message)` to reject the value.
pub struct Validator<T: ?Sized>(Arc<dyn Fn(&T) -> Option<String> + Send + Sync>);

impl<T: ?Sized> Validator<T> {
    /// Wrap a validation function.
    pub fn new(check: impl Fn(&T) -> Option<String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(check))
    }

    pub(crate) fn check(&self, value: &T) -> Option<String> {
        (self.0)(value)
    }
}

impl<T: ?Sized> Clone for Validator<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> std::fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator{..}").finish()
    }
}

/// Downcast `other` into the same kind as the argument being set.
pub(crate) fn same_kind<'o, A: Argument>(
    expected: &'static str,
    other: &'o dyn Argument,
) -> Result<&'o A, ArgumentError> {
    other
        .downcast_ref::<A>()
        .ok_or_else(|| ArgumentError::KindMismatch {
            expected,
            actual: other.kind(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::{BoolArgument, LongArgument, StringArgument};

    #[test]
    fn boxed_clone_is_independent() {
        let original: Box<dyn Argument> = Box::new(LongArgument::new(3));
        let mut copy = original.clone();
        copy.set_from_text("7").unwrap();

        assert_eq!(original.render(), "3");
        assert_eq!(copy.render(), "7");
    }

    #[test]
    fn downcast() {
        let mut argument: Box<dyn Argument> = Box::new(BoolArgument::new(false));

        assert!(argument.downcast_ref::<BoolArgument>().is_some());
        assert!(argument.downcast_ref::<LongArgument>().is_none());
        argument
            .downcast_mut::<BoolArgument>()
            .unwrap()
            .set_from_text("true")
            .unwrap();
        assert_eq!(argument.render(), "true");
    }

    #[test]
    fn same_kind_mismatch() {
        let other = StringArgument::new();
        let result = same_kind::<LongArgument>("i64", &other);

        assert_eq!(
            result.unwrap_err(),
            ArgumentError::KindMismatch {
                expected: "i64",
                actual: "string",
            }
        );
    }

    #[test]
    fn validator() {
        let validator = Validator::new(|value: &i64| {
            if value % 2 == 0 {
                None
            } else {
                Some("must be even".to_string())
            }
        });
        let copy = validator.clone();

        assert_eq!(validator.check(&2), None);
        assert_eq!(copy.check(&3), Some("must be even".to_string()));
    }

    #[test]
    fn display() {
        let error = ArgumentError::InvalidFormat {
            token: "abc".to_string(),
            kind: "i64",
            reason: "invalid digit found in string".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "cannot convert 'abc' to i64: invalid digit found in string."
        );

        let error = ArgumentError::invalid_value(11, "too big");
        assert_eq!(error.to_string(), "invalid value '11': too big.");
    }
}
