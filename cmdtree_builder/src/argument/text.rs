use std::any::Any;
use std::path::{Path, PathBuf};

use crate::argument::contract::*;
use crate::model::{PathKind, StringFeatures};
use crate::prelude::TypedArgument;

/// A free text argument, restricted by length and character classes.
///
/// Lengths count characters, not bytes.
/// The empty default is never validated, so it may be used as an "unset" marker even with a minimum length.
#[derive(Debug, Clone)]
pub struct StringArgument {
    value: String,
    default: String,
    min_length: usize,
    max_length: usize,
    features: StringFeatures,
    validator: Option<Validator<str>>,
}

impl Default for StringArgument {
    fn default() -> Self {
        Self::new()
    }
}

impl StringArgument {
    /// Create an unrestricted string argument with an empty default.
    pub fn new() -> Self {
        Self {
            value: String::default(),
            default: String::default(),
            min_length: 0,
            max_length: usize::MAX,
            features: StringFeatures::all(),
            validator: None,
        }
    }

    /// Restrict the length to `[min, max]` characters.
    /// Reversed bounds are swapped.
    ///
    /// Fails if a (non-empty) default is already declared, and falls outside the new length.
    pub fn length(mut self, min: usize, max: usize) -> Result<Self, ArgumentError> {
        self.min_length = std::cmp::min(min, max);
        self.max_length = std::cmp::max(min, max);
        self.check_default()
    }

    /// Restrict the allowed character classes.
    ///
    /// Fails if a (non-empty) default is already declared, and uses a class no longer allowed.
    pub fn features(mut self, features: StringFeatures) -> Result<Self, ArgumentError> {
        self.features = features;
        self.check_default()
    }

    /// Add a custom validation rule.
    /// Returning `Some(message)` rejects the value.
    ///
    /// Fails if a (non-empty) default is already declared, and the rule rejects it.
    pub fn validate_with(
        mut self,
        check: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Result<Self, ArgumentError> {
        self.validator.replace(Validator::new(check));
        self.check_default()
    }

    /// Declare the default value, validated against the restrictions configured so far.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::{prelude::*, StringArgument};
    ///
    /// let name = StringArgument::new().length(1, 16)?.with_default("world")?;
    /// assert_eq!(name.get(), "world");
    /// assert!(StringArgument::new().length(1, 3)?.with_default("world").is_err());
    /// # Ok::<(), cmdtree::ArgumentError>(())
    /// ```
    pub fn with_default(mut self, default: impl Into<String>) -> Result<Self, ArgumentError> {
        let default = default.into();

        if !default.is_empty() {
            self.check(&default)?;
        }

        self.value = default.clone();
        self.default = default;
        Ok(self)
    }

    fn check_default(self) -> Result<Self, ArgumentError> {
        if !self.default.is_empty() {
            self.check(&self.default)?;
        }

        Ok(self)
    }

    fn check(&self, value: &str) -> Result<(), ArgumentError> {
        let length = value.chars().count();

        if length < self.min_length {
            return Err(ArgumentError::invalid_value(
                value,
                format!("shorter than the smallest allowed length ({})", self.min_length),
            ));
        }

        if length > self.max_length {
            return Err(ArgumentError::invalid_value(
                value,
                format!("longer than the greatest allowed length ({})", self.max_length),
            ));
        }

        if let Some(c) = self.features.first_rejected(value) {
            return Err(ArgumentError::invalid_value(
                value,
                format!("character {c:?} is not allowed"),
            ));
        }

        match self.validator.as_ref().and_then(|v| v.check(value)) {
            Some(message) => Err(ArgumentError::invalid_value(value, message)),
            None => Ok(()),
        }
    }
}

impl Argument for StringArgument {
    fn set_from_text(&mut self, text: &str) -> Result<(), ArgumentError> {
        self.set(text.to_string())
    }

    fn set_from(&mut self, other: &dyn Argument) -> Result<(), ArgumentError> {
        let value = same_kind::<Self>(self.kind(), other)?.value.clone();
        self.set(value)
    }

    fn reset(&mut self) {
        self.value = self.default.clone();
    }

    fn clone_boxed(&self) -> Box<dyn Argument> {
        Box::new(self.clone())
    }

    fn kind(&self) -> &'static str {
        "string"
    }

    fn accepts_string(&self) -> bool {
        true
    }

    fn value_any(&self) -> &dyn Any {
        &self.value
    }

    fn render(&self) -> String {
        format!("{:?}", self.value)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl TypedArgument<String> for StringArgument {
    fn get(&self) -> String {
        self.value.clone()
    }

    fn default_value(&self) -> String {
        self.default.clone()
    }

    fn set(&mut self, value: String) -> Result<(), ArgumentError> {
        self.check(&value)?;
        self.value = value;
        Ok(())
    }
}

/// A filesystem path argument.
///
/// Only the checks requested are applied:
/// * `must_exist` requires the path to be present on the filesystem.
/// * [`PathKind`] requires a file or directory.
/// When the path does not exist, the kind is judged by whether it has an extension.
#[derive(Debug, Clone)]
pub struct PathArgument {
    value: PathBuf,
    default: PathBuf,
    must_exist: bool,
    path_kind: PathKind,
}

impl Default for PathArgument {
    fn default() -> Self {
        Self::new()
    }
}

impl PathArgument {
    /// Create an unchecked path argument, defaulting to `.`.
    pub fn new() -> Self {
        Self {
            value: PathBuf::from("."),
            default: PathBuf::from("."),
            must_exist: false,
            path_kind: PathKind::Any,
        }
    }

    /// Require values to exist on the filesystem.
    pub fn must_exist(mut self) -> Self {
        self.must_exist = true;
        self
    }

    /// Require values to point to a kind of path.
    pub fn path_kind(mut self, path_kind: PathKind) -> Self {
        self.path_kind = path_kind;
        self
    }

    /// Declare the default value.
    /// Defaults are not checked, since the filesystem may change between declaration and use.
    pub fn with_default(mut self, default: impl Into<PathBuf>) -> Self {
        self.default = default.into();
        self.value = self.default.clone();
        self
    }

    fn check(&self, path: &Path) -> Result<(), ArgumentError> {
        let display = path.display();

        if path.as_os_str().is_empty() {
            return Err(ArgumentError::invalid_value(display, "path is empty"));
        }

        let metadata = std::fs::metadata(path).ok();

        if self.must_exist && metadata.is_none() {
            return Err(ArgumentError::invalid_value(display, "path does not exist"));
        }

        let is_file = match &metadata {
            Some(m) => m.is_file(),
            None => path.extension().is_some(),
        };

        match self.path_kind {
            PathKind::File if !is_file => Err(ArgumentError::invalid_value(
                display,
                "path must point to a file",
            )),
            PathKind::Directory if is_file => Err(ArgumentError::invalid_value(
                display,
                "path must point to a directory",
            )),
            _ => Ok(()),
        }
    }
}

impl Argument for PathArgument {
    fn set_from_text(&mut self, text: &str) -> Result<(), ArgumentError> {
        self.set(PathBuf::from(text))
    }

    fn set_from(&mut self, other: &dyn Argument) -> Result<(), ArgumentError> {
        let value = same_kind::<Self>(self.kind(), other)?.value.clone();
        self.set(value)
    }

    fn reset(&mut self) {
        self.value = self.default.clone();
    }

    fn clone_boxed(&self) -> Box<dyn Argument> {
        Box::new(self.clone())
    }

    fn kind(&self) -> &'static str {
        "path"
    }

    fn accepts_string(&self) -> bool {
        true
    }

    fn value_any(&self) -> &dyn Any {
        &self.value
    }

    fn render(&self) -> String {
        format!("{:?}", self.value.display().to_string())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl TypedArgument<PathBuf> for PathArgument {
    fn get(&self) -> PathBuf {
        self.value.clone()
    }

    fn default_value(&self) -> PathBuf {
        self.default.clone()
    }

    fn set(&mut self, value: PathBuf) -> Result<(), ArgumentError> {
        self.check(&value)?;
        self.value = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn string_unrestricted() {
        let mut argument = StringArgument::new();
        argument.set_from_text("Ada Lovelace").unwrap();
        assert_eq!(argument.get(), "Ada Lovelace");
        assert_eq!(argument.render(), "\"Ada Lovelace\"");
        argument.reset();
        assert_eq!(argument.get(), "");
    }

    #[rstest]
    #[case("ab", true)]
    #[case("abcd", true)]
    #[case("a", false)]
    #[case("abcde", false)]
    #[case("ééé", true)]
    fn string_length(#[case] text: &str, #[case] expected_ok: bool) {
        let mut argument = StringArgument::new().length(4, 2).unwrap();
        let result = argument.set_from_text(text);

        if expected_ok {
            result.unwrap();
            assert_eq!(argument.get(), text);
        } else {
            assert_matches!(result, Err(ArgumentError::InvalidValue { .. }));
            assert_eq!(argument.get(), "");
        }
    }

    #[test]
    fn string_features() {
        let mut argument = StringArgument::new()
            .features(StringFeatures::alphanumeric())
            .unwrap();
        argument.set_from_text("abc123").unwrap();
        assert_eq!(
            argument.set_from_text("abc 123").unwrap_err(),
            ArgumentError::InvalidValue {
                token: "abc 123".to_string(),
                message: "character ' ' is not allowed".to_string(),
            }
        );
        assert_eq!(argument.get(), "abc123");
    }

    fn not_comment(value: &str) -> Option<String> {
        if value.starts_with('#') {
            Some("must not be a comment".to_string())
        } else {
            None
        }
    }

    #[test]
    fn string_custom_validation() {
        let mut argument = StringArgument::new().validate_with(not_comment).unwrap();

        argument.set_from_text("value").unwrap();
        assert_matches!(
            argument.set_from_text("#value"),
            Err(ArgumentError::InvalidValue { .. })
        );
    }

    #[test]
    fn string_default() {
        let mut argument = StringArgument::new()
            .length(0, 8)
            .unwrap()
            .with_default("main")
            .unwrap();
        argument.set_from_text("develop").unwrap();
        argument.reset();
        assert_eq!(argument.get(), "main");
        assert_eq!(argument.default_value(), "main");

        assert_matches!(
            StringArgument::new().length(0, 2).unwrap().with_default("main"),
            Err(ArgumentError::InvalidValue { .. })
        );
    }

    #[test]
    fn string_default_restricted_later() {
        let argument = StringArgument::new().with_default("abcdef").unwrap();
        assert_eq!(
            argument.clone().length(0, 3).unwrap_err(),
            ArgumentError::InvalidValue {
                token: "abcdef".to_string(),
                message: "longer than the greatest allowed length (3)".to_string(),
            }
        );
        assert_matches!(
            argument.clone().features(StringFeatures {
                lower: false,
                ..StringFeatures::all()
            }),
            Err(ArgumentError::InvalidValue { .. })
        );
        assert_matches!(
            StringArgument::new()
                .with_default("#main")
                .unwrap()
                .validate_with(not_comment),
            Err(ArgumentError::InvalidValue { .. })
        );

        // The empty default is exempt.
        let argument = StringArgument::new().length(1, 3).unwrap();
        assert_eq!(argument.get(), "");
        assert_eq!(argument.length(2, 4).unwrap().get(), "");
    }

    #[test]
    fn string_set_from() {
        let mut argument = StringArgument::new().length(0, 3).unwrap();
        let mut other = StringArgument::new();
        other.set_from_text("abc").unwrap();
        argument.set_from(&other).unwrap();
        assert_eq!(argument.get(), "abc");

        other.set_from_text("abcdef").unwrap();
        assert_matches!(
            argument.set_from(&other),
            Err(ArgumentError::InvalidValue { .. })
        );
        assert_matches!(
            argument.set_from(&PathArgument::new()),
            Err(ArgumentError::KindMismatch { .. })
        );
    }

    #[test]
    fn path_unchecked() {
        let mut argument = PathArgument::new();
        argument.set_from_text("does/not/exist.txt").unwrap();
        assert_eq!(argument.get(), PathBuf::from("does/not/exist.txt"));
        argument.reset();
        assert_eq!(argument.get(), PathBuf::from("."));
        assert_matches!(
            argument.set_from_text(""),
            Err(ArgumentError::InvalidValue { .. })
        );
    }

    #[test]
    fn path_must_exist() {
        let manifest = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let mut argument = PathArgument::new().must_exist();
        argument.set(manifest.clone()).unwrap();
        assert_eq!(argument.get(), manifest);
        assert_matches!(
            argument.set_from_text("does/not/exist.txt"),
            Err(ArgumentError::InvalidValue { .. })
        );
    }

    #[rstest]
    #[case(PathKind::File, "Cargo.toml", true)]
    #[case(PathKind::File, "src", false)]
    #[case(PathKind::Directory, "src", true)]
    #[case(PathKind::Directory, "Cargo.toml", false)]
    #[case(PathKind::File, "missing.txt", true)]
    #[case(PathKind::Directory, "missing.txt", false)]
    #[case(PathKind::Any, "src", true)]
    fn path_kinds(#[case] path_kind: PathKind, #[case] relative: &str, #[case] expected_ok: bool) {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(relative);
        let mut argument = PathArgument::new().path_kind(path_kind);
        assert_eq!(argument.set(path).is_ok(), expected_ok);
    }
}
