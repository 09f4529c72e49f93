use std::collections::HashMap;
use thiserror::Error;

use crate::argument::{Argument, ArgumentError};

/// The error raised by [`Context`] operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContextError {
    /// No argument is stored under the name.
    #[error("the context key '{0}' was not found.")]
    KeyNotFound(String),

    /// An argument is already stored under the name.
    #[error("the context key '{0}' already exists.")]
    KeyDuplicate(String),

    /// The context is locked against new entries.
    #[error("cannot add '{0}' to a locked context.")]
    Locked(String),

    /// The stored argument is not of the requested kind.
    #[error("the context key '{name}' holds {actual}, not {expected}.")]
    TypeMismatch {
        /// The context key.
        name: String,
        /// The requested type.
        expected: &'static str,
        /// The stored argument kind.
        actual: &'static str,
    },

    /// The index is past the end of the context.
    #[error("index {index} is out of range for a context of length {length}.")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The number of entries.
        length: usize,
    },

    /// The stored argument rejected a new value.
    #[error("cannot set '{name}': {source}")]
    Argument {
        /// The context key.
        name: String,
        /// The argument's error.
        #[source]
        source: ArgumentError,
    },
}

/// An insertion ordered store of named arguments.
///
/// A `Context` is what parsing produces and what a command's callback receives.
/// It always owns its arguments: anything added is copied in, so no two contexts share storage.
///
/// ### Example
/// ```
/// # use cmdtree_builder as cmdtree;
/// use cmdtree::{Context, LongArgument, StringArgument};
///
/// let mut context = Context::default();
/// context.add("count", &LongArgument::new(3)).unwrap();
/// context.add("name", &StringArgument::new()).unwrap();
/// context.set_text("name", "Ada").unwrap();
///
/// assert_eq!(context.value::<i64>("count").unwrap(), 3);
/// assert_eq!(context.value::<String>("name").unwrap(), "Ada");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: Vec<(String, Box<dyn Argument>)>,
    indices: HashMap<String, usize>,
    locked: bool,
}

impl Context {
    /// Add a copy of `argument` under `name`.
    /// Fails if the context is locked, or `name` is already present.
    pub fn add(&mut self, name: impl Into<String>, argument: &dyn Argument) -> Result<(), ContextError> {
        self.add_boxed(name, argument.clone_boxed())
    }

    /// Add an owned `argument` under `name`.
    /// Fails if the context is locked, or `name` is already present.
    pub fn add_boxed(
        &mut self,
        name: impl Into<String>,
        argument: Box<dyn Argument>,
    ) -> Result<(), ContextError> {
        let name = name.into();
        self.check_add(&name)?;
        self.indices.insert(name.clone(), self.entries.len());
        self.entries.push((name, argument));
        Ok(())
    }

    /// Set the argument under `name` to the value of `argument`.
    ///
    /// An existing entry keeps its own declaration (bounds, validation) and takes `argument`'s value; this is allowed on a locked context.
    /// A missing entry is an error, unless `allow_add_new` is set, in which case a copy of `argument` is added (which a locked context refuses).
    pub fn set(
        &mut self,
        name: impl Into<String>,
        argument: &dyn Argument,
        allow_add_new: bool,
    ) -> Result<(), ContextError> {
        let name = name.into();

        match self.indices.get(&name) {
            Some(index) => self.entries[*index]
                .1
                .set_from(argument)
                .map_err(|source| ContextError::Argument { name, source }),
            None if allow_add_new => self.add(name, argument),
            None => Err(ContextError::KeyNotFound(name)),
        }
    }

    /// Set the existing argument under `name` from text.
    pub fn set_text(&mut self, name: &str, text: &str) -> Result<(), ContextError> {
        self.argument_mut(name)?
            .set_from_text(text)
            .map_err(|source| ContextError::Argument {
                name: name.to_string(),
                source,
            })
    }

    /// Add copies of every entry of `other`.
    ///
    /// The merge is all-or-nothing: if any name already exists (or this context is locked), nothing is added.
    pub fn merge(&mut self, other: &Context) -> Result<(), ContextError> {
        for (name, _) in &other.entries {
            self.check_add(name)?;
        }

        for (name, argument) in &other.entries {
            self.add(name.clone(), argument.as_ref())?;
        }

        Ok(())
    }

    /// [`Context::set`] every entry of `other`.
    ///
    /// The update is all-or-nothing: every entry is validated on a scratch copy before this context changes.
    pub fn set_all(&mut self, other: &Context, allow_add_new: bool) -> Result<(), ContextError> {
        let mut scratch = self.clone();

        for (name, argument) in &other.entries {
            scratch.set(name.clone(), argument.as_ref(), allow_add_new)?;
        }

        *self = scratch;
        Ok(())
    }

    /// Get the argument under `name` as the concrete kind `A`.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::{prelude::*, BoolArgument, Context, ContextError, LongArgument};
    ///
    /// let mut context = Context::default();
    /// context.add("verbose", &BoolArgument::new(true)).unwrap();
    ///
    /// assert!(context.get::<BoolArgument>("verbose").unwrap().get());
    /// assert!(matches!(
    ///     context.get::<LongArgument>("verbose"),
    ///     Err(ContextError::TypeMismatch { .. })
    /// ));
    /// ```
    pub fn get<A: Argument>(&self, name: &str) -> Result<&A, ContextError> {
        let argument = self.argument(name)?;
        argument
            .downcast_ref::<A>()
            .ok_or_else(|| ContextError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<A>(),
                actual: argument.kind(),
            })
    }

    /// Mutably get the argument under `name` as the concrete kind `A`.
    pub fn get_mut<A: Argument>(&mut self, name: &str) -> Result<&mut A, ContextError> {
        let argument = self.argument_mut(name)?;
        let actual = argument.kind();
        argument
            .downcast_mut::<A>()
            .ok_or_else(|| ContextError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<A>(),
                actual,
            })
    }

    /// Get a copy of the current value under `name`, as the value type `T`.
    pub fn value<T: Clone + 'static>(&self, name: &str) -> Result<T, ContextError> {
        let argument = self.argument(name)?;
        argument
            .value_any()
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| ContextError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>(),
                actual: argument.kind(),
            })
    }

    /// Get the argument under `name`, without regard to its kind.
    pub fn argument(&self, name: &str) -> Result<&dyn Argument, ContextError> {
        match self.indices.get(name) {
            Some(index) => Ok(self.entries[*index].1.as_ref()),
            None => Err(ContextError::KeyNotFound(name.to_string())),
        }
    }

    fn argument_mut(&mut self, name: &str) -> Result<&mut dyn Argument, ContextError> {
        match self.indices.get(name) {
            Some(index) => Ok(self.entries[*index].1.as_mut()),
            None => Err(ContextError::KeyNotFound(name.to_string())),
        }
    }

    /// Get the entry at `index`, in insertion order.
    pub fn get_at(&self, index: usize) -> Result<(&str, &dyn Argument), ContextError> {
        match self.entries.get(index) {
            Some((name, argument)) => Ok((name.as_str(), argument.as_ref())),
            None => Err(ContextError::OutOfRange {
                index,
                length: self.entries.len(),
            }),
        }
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Argument)> {
        self.entries
            .iter()
            .map(|(name, argument)| (name.as_str(), argument.as_ref()))
    }

    /// Whether an argument is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Refuse any further new entries.
    /// Existing entries may still be set.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Whether the context refuses new entries.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn check_add(&self, name: &str) -> Result<(), ContextError> {
        if self.locked {
            Err(ContextError::Locked(name.to_string()))
        } else if self.indices.contains_key(name) {
            Err(ContextError::KeyDuplicate(name.to_string()))
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.entries
                .iter()
                .map(|(name, argument)| format!("{name}: {}", argument.render()))
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}
