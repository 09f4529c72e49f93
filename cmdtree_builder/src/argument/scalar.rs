use std::any::Any;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::str::FromStr;

use crate::argument::contract::*;
use crate::prelude::TypedArgument;

/// A boolean argument, read case-insensitively from `true` or `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoolArgument {
    value: bool,
    default: bool,
}

impl BoolArgument {
    /// Create a boolean argument.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::{prelude::*, Argument, BoolArgument};
    ///
    /// let mut verbose = BoolArgument::new(false);
    /// verbose.set_from_text("TRUE").unwrap();
    /// assert!(verbose.get());
    /// ```
    pub fn new(default: bool) -> Self {
        Self {
            value: default,
            default,
        }
    }
}

impl Argument for BoolArgument {
    fn set_from_text(&mut self, text: &str) -> Result<(), ArgumentError> {
        self.value = match text.to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                return Err(ArgumentError::InvalidFormat {
                    token: text.to_string(),
                    kind: "bool",
                    reason: "expected 'true' or 'false'".to_string(),
                });
            }
        };
        Ok(())
    }

    fn set_from(&mut self, other: &dyn Argument) -> Result<(), ArgumentError> {
        self.value = same_kind::<Self>(self.kind(), other)?.value;
        Ok(())
    }

    fn reset(&mut self) {
        self.value = self.default;
    }

    fn clone_boxed(&self) -> Box<dyn Argument> {
        Box::new(self.clone())
    }

    fn kind(&self) -> &'static str {
        "bool"
    }

    fn value_any(&self) -> &dyn Any {
        &self.value
    }

    fn render(&self) -> String {
        self.value.to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl TypedArgument<bool> for BoolArgument {
    fn get(&self) -> bool {
        self.value
    }

    fn default_value(&self) -> bool {
        self.default
    }

    fn set(&mut self, value: bool) -> Result<(), ArgumentError> {
        self.value = value;
        Ok(())
    }
}

/// A numeric argument, optionally bounded (inclusive) and custom validated.
///
/// Works for any primitive `T` which converts via [`std::str::FromStr`].
/// The common primitives have aliases: [`IntegerArgument`], [`LongArgument`], [`ULongArgument`], [`FloatArgument`], [`DoubleArgument`].
#[derive(Debug, Clone)]
pub struct NumberArgument<T> {
    value: T,
    default: T,
    min: Option<T>,
    max: Option<T>,
    validator: Option<Validator<T>>,
}

/// A 32 bit signed integer argument.
pub type IntegerArgument = NumberArgument<i32>;
/// A 64 bit signed integer argument.
pub type LongArgument = NumberArgument<i64>;
/// A 64 bit unsigned integer argument.
pub type ULongArgument = NumberArgument<u64>;
/// A 32 bit floating point argument.
pub type FloatArgument = NumberArgument<f32>;
/// A 64 bit floating point argument.
pub type DoubleArgument = NumberArgument<f64>;

impl<T: PartialOrd + Copy> NumberArgument<T> {
    /// Create an unbounded numeric argument.
    pub fn new(default: T) -> Self {
        Self {
            value: default,
            default,
            min: None,
            max: None,
            validator: None,
        }
    }

    /// Create a numeric argument bounded to `[min, max]`.
    /// Reversed bounds are swapped, and the default is clamped into the bounds.
    /// A default which compares to neither bound (ex: `NaN`) is replaced by `min`.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::{prelude::*, Argument, ArgumentError, LongArgument};
    ///
    /// let mut count = LongArgument::bounded(10, 0, 20);
    /// assert_eq!(count.get(), 10);
    /// assert!(matches!(count.set_from_text("11"), Err(ArgumentError::InvalidValue { .. })));
    /// ```
    pub fn bounded(min: T, max: T, default: T) -> Self {
        let (min, max) = if max < min { (max, min) } else { (min, max) };
        let default = match (default.partial_cmp(&min), default.partial_cmp(&max)) {
            (Some(Ordering::Less), _) | (None, _) | (_, None) => min,
            (_, Some(Ordering::Greater)) => max,
            _ => default,
        };

        Self {
            value: default,
            default,
            min: Some(min),
            max: Some(max),
            validator: None,
        }
    }

    /// Add a custom validation rule, applied to every value set after construction.
    /// Returning `Some(message)` rejects the value.
    ///
    /// Fails if the rule rejects the default.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::IntegerArgument;
    ///
    /// let even = |value: &i32| (value % 2 != 0).then(|| "must be even".to_string());
    /// assert!(IntegerArgument::new(2).validate_with(even).is_ok());
    /// assert!(IntegerArgument::new(3).validate_with(even).is_err());
    /// ```
    pub fn validate_with(
        mut self,
        check: impl Fn(&T) -> Option<String> + Send + Sync + 'static,
    ) -> Result<Self, ArgumentError>
    where
        T: Display,
    {
        self.validator.replace(Validator::new(check));
        self.check(self.default)?;
        Ok(self)
    }

    /// The inclusive lower bound.
    pub fn min(&self) -> Option<T> {
        self.min
    }

    /// The inclusive upper bound.
    pub fn max(&self) -> Option<T> {
        self.max
    }
}

impl<T: PartialOrd + Copy + Default> Default for NumberArgument<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: PartialOrd + Copy + Display> NumberArgument<T> {
    fn check(&self, value: T) -> Result<(), ArgumentError> {
        if let Some(min) = self.min {
            if matches!(value.partial_cmp(&min), Some(Ordering::Less) | None) {
                return Err(ArgumentError::invalid_value(
                    value,
                    format!("less than the smallest allowed value ({min})"),
                ));
            }
        }

        if let Some(max) = self.max {
            if matches!(value.partial_cmp(&max), Some(Ordering::Greater) | None) {
                return Err(ArgumentError::invalid_value(
                    value,
                    format!("greater than the greatest allowed value ({max})"),
                ));
            }
        }

        match self.validator.as_ref().and_then(|v| v.check(&value)) {
            Some(message) => Err(ArgumentError::invalid_value(value, message)),
            None => Ok(()),
        }
    }
}

impl<T> Argument for NumberArgument<T>
where
    T: FromStr + PartialOrd + Copy + Display + Debug + Send + Sync + 'static,
    <T as FromStr>::Err: Display,
{
    fn set_from_text(&mut self, text: &str) -> Result<(), ArgumentError> {
        let value = T::from_str(text).map_err(|error| ArgumentError::InvalidFormat {
            token: text.to_string(),
            kind: std::any::type_name::<T>(),
            reason: error.to_string(),
        })?;
        self.set(value)
    }

    fn set_from(&mut self, other: &dyn Argument) -> Result<(), ArgumentError> {
        let value = same_kind::<Self>(self.kind(), other)?.value;
        self.set(value)
    }

    fn reset(&mut self) {
        self.value = self.default;
    }

    fn clone_boxed(&self) -> Box<dyn Argument> {
        Box::new(self.clone())
    }

    fn kind(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn value_any(&self) -> &dyn Any {
        &self.value
    }

    fn render(&self) -> String {
        self.value.to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T> TypedArgument<T> for NumberArgument<T>
where
    T: FromStr + PartialOrd + Copy + Display + Debug + Send + Sync + 'static,
    <T as FromStr>::Err: Display,
{
    fn get(&self) -> T {
        self.value
    }

    fn default_value(&self) -> T {
        self.default
    }

    fn set(&mut self, value: T) -> Result<(), ArgumentError> {
        self.check(value)?;
        self.value = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{thread_rng, Rng};
    use rstest::rstest;

    #[rstest]
    #[case("true", true)]
    #[case("false", false)]
    #[case("TRUE", true)]
    #[case("False", false)]
    fn bool_set_from_text(#[case] text: &str, #[case] expected: bool) {
        let mut argument = BoolArgument::new(!expected);
        argument.set_from_text(text).unwrap();
        assert_eq!(argument.get(), expected);
    }

    #[rstest]
    #[case("yes")]
    #[case("1")]
    #[case("")]
    fn bool_invalid_format(#[case] text: &str) {
        let mut argument = BoolArgument::new(true);
        assert_matches!(
            argument.set_from_text(text),
            Err(ArgumentError::InvalidFormat { kind: "bool", .. })
        );
        assert!(argument.get());
    }

    #[test]
    fn bool_reset() {
        let mut argument = BoolArgument::new(true);
        argument.set(false).unwrap();
        argument.reset();
        assert!(argument.get());
        assert!(argument.default_value());
    }

    #[rstest]
    #[case(0, 10, 5, 5)]
    #[case(0, 10, -5, 0)]
    #[case(0, 10, 15, 10)]
    #[case(10, 0, 15, 10)]
    #[case(10, 0, 3, 3)]
    fn number_bounded_default(
        #[case] min: i64,
        #[case] max: i64,
        #[case] default: i64,
        #[case] expected: i64,
    ) {
        let argument = LongArgument::bounded(min, max, default);
        assert_eq!(argument.get(), expected);
        assert_eq!(argument.default_value(), expected);
        assert_eq!(argument.min(), Some(std::cmp::min(min, max)));
        assert_eq!(argument.max(), Some(std::cmp::max(min, max)));
    }

    #[rstest]
    #[case("abc")]
    #[case("1.5")]
    #[case("")]
    #[case("99999999999999999999999")]
    fn number_invalid_format(#[case] text: &str) {
        let mut argument = LongArgument::bounded(0, 10, 4);
        assert_matches!(
            argument.set_from_text(text),
            Err(ArgumentError::InvalidFormat { kind: "i64", .. })
        );
        assert_eq!(argument.get(), 4);
    }

    #[rstest]
    #[case("11")]
    #[case("-1")]
    fn number_out_of_bounds(#[case] text: &str) {
        let mut argument = LongArgument::bounded(0, 10, 4);
        assert_matches!(
            argument.set_from_text(text),
            Err(ArgumentError::InvalidValue { .. })
        );
        assert_eq!(argument.get(), 4);
    }

    fn even(value: &i32) -> Option<String> {
        if value % 2 == 0 {
            None
        } else {
            Some("must be even".to_string())
        }
    }

    #[test]
    fn number_custom_validation() {
        let mut argument = IntegerArgument::new(0).validate_with(even).unwrap();

        argument.set_from_text("4").unwrap();
        assert_eq!(argument.get(), 4);
        assert_eq!(
            argument.set_from_text("5").unwrap_err(),
            ArgumentError::InvalidValue {
                token: "5".to_string(),
                message: "must be even".to_string(),
            }
        );
        assert_eq!(argument.get(), 4);
    }

    #[test]
    fn number_custom_validation_default() {
        assert_eq!(
            IntegerArgument::new(3).validate_with(even).unwrap_err(),
            ArgumentError::InvalidValue {
                token: "3".to_string(),
                message: "must be even".to_string(),
            }
        );
        assert_matches!(
            IntegerArgument::bounded(0, 10, 20).validate_with(|value| {
                (*value == 10).then(|| "must not be the maximum".to_string())
            }),
            Err(ArgumentError::InvalidValue { .. })
        );
    }

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(f64::INFINITY, 1.0)]
    #[case(f64::NEG_INFINITY, 0.0)]
    #[case(0.75, 0.75)]
    fn number_float_bounded_default(#[case] default: f64, #[case] expected: f64) {
        let argument = DoubleArgument::bounded(0.0, 1.0, default);
        assert_eq!(argument.get(), expected);
        assert_eq!(argument.default_value(), expected);
    }

    #[test]
    fn number_float_bounds() {
        let mut argument = DoubleArgument::bounded(0.0, 1.0, 0.5);
        argument.set_from_text("0.25").unwrap();
        assert_eq!(argument.get(), 0.25);
        assert_matches!(
            argument.set_from_text("1.5"),
            Err(ArgumentError::InvalidValue { .. })
        );
        assert_matches!(
            argument.set_from_text("NaN"),
            Err(ArgumentError::InvalidValue { .. })
        );
        assert_eq!(argument.get(), 0.25);
    }

    #[test]
    fn number_set_from() {
        let mut argument = LongArgument::bounded(0, 10, 0);
        let mut other = LongArgument::new(0);
        other.set(7).unwrap();
        argument.set_from(&other).unwrap();
        assert_eq!(argument.get(), 7);

        // The bounds of the target apply.
        other.set(70).unwrap();
        assert_matches!(
            argument.set_from(&other),
            Err(ArgumentError::InvalidValue { .. })
        );

        assert_matches!(
            argument.set_from(&ULongArgument::new(1)),
            Err(ArgumentError::KindMismatch {
                expected: "i64",
                actual: "u64",
            })
        );
    }

    #[test]
    fn number_round_trip() {
        for _ in 0..100 {
            let value: i64 = thread_rng().gen_range(-1000..=1000);
            let mut from_text = LongArgument::bounded(-1000, 1000, 0);
            let mut from_value = LongArgument::bounded(-1000, 1000, 0);
            from_text.set_from_text(&value.to_string()).unwrap();
            from_value.set(value).unwrap();
            assert_eq!(from_text.get(), from_value.get());
        }
    }

    #[test]
    fn number_reset_idempotent() {
        for _ in 0..100 {
            let default: u64 = thread_rng().gen_range(10..=20);
            let mut argument = ULongArgument::bounded(10, 20, default);

            for _ in 0..thread_rng().gen_range(0..5) {
                let _ = argument.set(thread_rng().gen_range(0..=30));
            }

            argument.reset();
            assert_eq!(argument.get(), default);
            argument.reset();
            assert_eq!(argument.get(), default);
        }
    }
}
