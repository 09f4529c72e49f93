use std::any::Any;
use std::fmt::{Debug, Display};

use crate::argument::contract::*;
use crate::prelude::TypedArgument;

fn describe<T: Display>(options: &[T]) -> String {
    format!(
        "expected one of {{{}}}",
        options
            .iter()
            .map(|o| o.to_string())
            .collect::<Vec<String>>()
            .join(", ")
    )
}

/// An argument whose value is exactly one of a fixed list of options.
///
/// Text input selects the option whose [`std::fmt::Display`] matches exactly.
#[derive(Debug, Clone)]
pub struct SingleSelectArgument<T> {
    options: Vec<T>,
    index: usize,
    default_index: usize,
}

impl<T: Display + PartialEq> SingleSelectArgument<T> {
    /// Create a single select argument, defaulting to the first option.
    /// Fails if `options` is empty.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::{prelude::*, Argument, SingleSelectArgument};
    ///
    /// let mut profile = SingleSelectArgument::new(vec!["debug", "release"]).unwrap();
    /// profile.set_from_text("release").unwrap();
    /// assert_eq!(profile.get(), "release");
    /// ```
    pub fn new(options: Vec<T>) -> Result<Self, ArgumentError> {
        if options.is_empty() {
            return Err(ArgumentError::NoOptions);
        }

        Ok(Self {
            options,
            index: 0,
            default_index: 0,
        })
    }

    /// Declare the default option.
    /// A `default` which is not amongst the options leaves the default unchanged.
    pub fn with_default(mut self, default: T) -> Self {
        if let Some(index) = self.options.iter().position(|o| o == &default) {
            self.index = index;
            self.default_index = index;
        }

        self
    }

    /// The available options.
    pub fn options(&self) -> &[T] {
        &self.options
    }

    /// The index of the selected option.
    pub fn index(&self) -> usize {
        self.index
    }

    fn position(&self, value: &T) -> Result<usize, ArgumentError> {
        self.options
            .iter()
            .position(|o| o == value)
            .ok_or_else(|| ArgumentError::invalid_value(value, describe(&self.options)))
    }
}

impl<T> Argument for SingleSelectArgument<T>
where
    T: Display + PartialEq + Clone + Debug + Send + Sync + 'static,
{
    fn set_from_text(&mut self, text: &str) -> Result<(), ArgumentError> {
        self.index = self
            .options
            .iter()
            .position(|o| o.to_string() == text)
            .ok_or_else(|| ArgumentError::invalid_value(text, describe(&self.options)))?;
        Ok(())
    }

    fn set_from(&mut self, other: &dyn Argument) -> Result<(), ArgumentError> {
        let other = same_kind::<Self>(self.kind(), other)?;
        self.index = self.position(&other.options[other.index])?;
        Ok(())
    }

    fn reset(&mut self) {
        self.index = self.default_index;
    }

    fn clone_boxed(&self) -> Box<dyn Argument> {
        Box::new(self.clone())
    }

    fn kind(&self) -> &'static str {
        "single-select"
    }

    fn accepts_string(&self) -> bool {
        true
    }

    fn value_any(&self) -> &dyn Any {
        &self.options[self.index]
    }

    fn render(&self) -> String {
        format!("{:?}", self.options[self.index].to_string())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T> TypedArgument<T> for SingleSelectArgument<T>
where
    T: Display + PartialEq + Clone + Debug + Send + Sync + 'static,
{
    fn get(&self) -> T {
        self.options[self.index].clone()
    }

    fn default_value(&self) -> T {
        self.options[self.default_index].clone()
    }

    fn set(&mut self, value: T) -> Result<(), ArgumentError> {
        self.index = self.position(&value)?;
        Ok(())
    }
}

/// An argument whose value is any subset of a fixed list of options.
///
/// Text input is a comma separated list of options (ex: `red,blue`).
/// Selections are kept in the order of the options, and duplicates collapse.
#[derive(Debug, Clone)]
pub struct MultiSelectArgument<T> {
    options: Vec<T>,
    value: Vec<T>,
    default: Vec<T>,
}

impl<T: Display + PartialEq + Clone> MultiSelectArgument<T> {
    /// Create a multi select argument, defaulting to nothing selected.
    pub fn new(options: Vec<T>) -> Self {
        Self {
            options,
            value: Vec::default(),
            default: Vec::default(),
        }
    }

    /// Declare the default selection.
    /// Values which are not amongst the options are dropped.
    pub fn with_default(mut self, default: Vec<T>) -> Self {
        let selected: Vec<bool> = self.options.iter().map(|o| default.contains(o)).collect();
        self.default = self.collect(&selected);
        self.value = self.default.clone();
        self
    }

    /// The available options.
    pub fn options(&self) -> &[T] {
        &self.options
    }

    fn collect(&self, selected: &[bool]) -> Vec<T> {
        self.options
            .iter()
            .zip(selected)
            .filter(|(_, s)| **s)
            .map(|(o, _)| o.clone())
            .collect()
    }

    fn select<'v>(
        &self,
        values: impl Iterator<Item = &'v T>,
    ) -> Result<Vec<T>, ArgumentError>
    where
        T: 'v,
    {
        let mut selected = vec![false; self.options.len()];

        for value in values {
            match self.options.iter().position(|o| o == value) {
                Some(index) => selected[index] = true,
                None => {
                    return Err(ArgumentError::invalid_value(
                        value,
                        describe(&self.options),
                    ));
                }
            }
        }

        Ok(self.collect(&selected))
    }
}

impl<T> Argument for MultiSelectArgument<T>
where
    T: Display + PartialEq + Clone + Debug + Send + Sync + 'static,
{
    fn set_from_text(&mut self, text: &str) -> Result<(), ArgumentError> {
        let mut selected = vec![false; self.options.len()];

        for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match self.options.iter().position(|o| o.to_string() == part) {
                Some(index) => selected[index] = true,
                None => {
                    return Err(ArgumentError::invalid_value(
                        part,
                        describe(&self.options),
                    ));
                }
            }
        }

        self.value = self.collect(&selected);
        Ok(())
    }

    fn set_from(&mut self, other: &dyn Argument) -> Result<(), ArgumentError> {
        let other = same_kind::<Self>(self.kind(), other)?;
        self.value = self.select(other.value.iter())?;
        Ok(())
    }

    fn reset(&mut self) {
        self.value = self.default.clone();
    }

    fn clone_boxed(&self) -> Box<dyn Argument> {
        Box::new(self.clone())
    }

    fn kind(&self) -> &'static str {
        "multi-select"
    }

    fn accepts_string(&self) -> bool {
        true
    }

    fn value_any(&self) -> &dyn Any {
        &self.value
    }

    fn render(&self) -> String {
        format!(
            "[{}]",
            self.value
                .iter()
                .map(|v| format!("{:?}", v.to_string()))
                .collect::<Vec<String>>()
                .join(", ")
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T> TypedArgument<Vec<T>> for MultiSelectArgument<T>
where
    T: Display + PartialEq + Clone + Debug + Send + Sync + 'static,
{
    fn get(&self) -> Vec<T> {
        self.value.clone()
    }

    fn default_value(&self) -> Vec<T> {
        self.default.clone()
    }

    fn set(&mut self, value: Vec<T>) -> Result<(), ArgumentError> {
        self.value = self.select(value.iter())?;
        Ok(())
    }
}
