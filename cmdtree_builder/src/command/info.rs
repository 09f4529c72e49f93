use crate::argument::Argument;
use crate::command::{BuildError, CommandNode};
use crate::model::{is_identifier, is_shortcut};

fn check_name(element: &'static str, name: String) -> Result<String, BuildError> {
    if is_identifier(&name) {
        Ok(name)
    } else {
        Err(BuildError::InvalidName { element, name })
    }
}

fn check_shortcut(shortcut: Option<char>) -> Result<Option<char>, BuildError> {
    match shortcut {
        Some(s) if !is_shortcut(s) => Err(BuildError::InvalidShortcut(s)),
        _ => Ok(shortcut),
    }
}

/// The declaration of a positional argument.
///
/// ### Example
/// ```
/// # use cmdtree_builder as cmdtree;
/// use cmdtree::{ArgumentInfo, LongArgument};
///
/// let info = ArgumentInfo::new("count", LongArgument::new(1))
///     .unwrap()
///     .description("How many times to repeat.");
/// assert_eq!(info.to_string(), "<count: i64>");
/// ```
#[derive(Debug, Clone)]
pub struct ArgumentInfo {
    name: String,
    description: Option<String>,
    argument: Box<dyn Argument>,
}

impl ArgumentInfo {
    /// Declare the positional argument `name`.
    /// Fails if `name` is not a valid identifier.
    pub fn new(name: impl Into<String>, argument: impl Argument) -> Result<Self, BuildError> {
        Ok(Self {
            name: check_name("argument", name.into())?,
            description: None,
            argument: Box::new(argument),
        })
    }

    /// Document the argument.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// The argument's name, which is also its context key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The documentation, if any.
    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The declared argument, holding its default value.
    pub fn argument(&self) -> &dyn Argument {
        self.argument.as_ref()
    }
}

impl std::fmt::Display for ArgumentInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}: {}>", self.name, self.argument.kind())
    }
}

/// The declaration of a flag: a named option which takes a value (ex: `--output out.txt`).
#[derive(Debug, Clone)]
pub struct FlagInfo {
    name: String,
    shortcut: Option<char>,
    required: bool,
    description: Option<String>,
    argument: Box<dyn Argument>,
}

impl FlagInfo {
    /// Declare the optional flag `name`, with an optional single character `shortcut`.
    /// Fails if `name` is not a valid identifier, or `shortcut` is not a letter/digit.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::{FlagInfo, StringArgument};
    ///
    /// let info = FlagInfo::new("output", Some('o'), StringArgument::new()).unwrap();
    /// assert_eq!(info.to_string(), "[--output | -o <output: string>]");
    /// assert_eq!(info.required().to_string(), "--output | -o <output: string>");
    /// ```
    pub fn new(
        name: impl Into<String>,
        shortcut: Option<char>,
        argument: impl Argument,
    ) -> Result<Self, BuildError> {
        Ok(Self {
            name: check_name("flag", name.into())?,
            shortcut: check_shortcut(shortcut)?,
            required: false,
            description: None,
            argument: Box::new(argument),
        })
    }

    /// Require the flag to be present on the command line.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Document the flag.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// The flag's name, which is also its context key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The single character alias, if any.
    pub fn shortcut(&self) -> Option<char> {
        self.shortcut
    }

    /// Whether the flag must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The documentation, if any.
    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The declared argument, holding its default value.
    pub fn argument(&self) -> &dyn Argument {
        self.argument.as_ref()
    }
}

impl std::fmt::Display for FlagInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flag = match self.shortcut {
            Some(s) => format!("--{} | -{s}", self.name),
            None => format!("--{}", self.name),
        };
        let usage = format!("{flag} <{}: {}>", self.name, self.argument.kind());

        if self.required {
            write!(f, "{usage}")
        } else {
            write!(f, "[{usage}]")
        }
    }
}

/// The declaration of a switch: a named option which is either present or absent (ex: `--verbose`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchInfo {
    name: String,
    shortcut: Option<char>,
    description: Option<String>,
}

impl SwitchInfo {
    /// Declare the switch `name`, with an optional single character `shortcut`.
    /// Fails if `name` is not a valid identifier, or `shortcut` is not a letter/digit.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::SwitchInfo;
    ///
    /// let info = SwitchInfo::new("verbose", Some('v')).unwrap();
    /// assert_eq!(info.to_string(), "[--verbose | -v]");
    /// assert!(SwitchInfo::new("verbose", Some('!')).is_err());
    /// ```
    pub fn new(name: impl Into<String>, shortcut: Option<char>) -> Result<Self, BuildError> {
        Ok(Self {
            name: check_name("switch", name.into())?,
            shortcut: check_shortcut(shortcut)?,
            description: None,
        })
    }

    /// Document the switch.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// The switch's name, which is also its context key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The single character alias, if any.
    pub fn shortcut(&self) -> Option<char> {
        self.shortcut
    }

    /// The documentation, if any.
    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl std::fmt::Display for SwitchInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.shortcut {
            Some(s) => write!(f, "[--{} | -{s}]", self.name),
            None => write!(f, "[--{}]", self.name),
        }
    }
}

/// A named child of a branch-point.
/// The empty name declares the default node, chosen when no sibling's name matches.
pub struct NodeInfo<R> {
    name: String,
    node: CommandNode<R>,
}

impl<R> std::fmt::Debug for NodeInfo<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeInfo")
            .field("name", &self.name)
            .field("node", &self.node)
            .finish()
    }
}

impl<R> NodeInfo<R> {
    /// Name a built `node`.
    /// Fails if `name` is neither empty nor a valid identifier, or if the node's own build failed.
    pub fn new(name: impl Into<String>, mut node: CommandNode<R>) -> Result<Self, BuildError> {
        let name = name.into();

        if !name.is_empty() && !is_identifier(&name) {
            return Err(BuildError::InvalidName {
                element: "node",
                name,
            });
        }

        if let Some(error) = node.take_deferred_error() {
            return Err(error);
        }

        Ok(Self { name, node })
    }

    /// The literal which selects this node (empty for the default node).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the default node.
    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }

    /// The named node.
    pub fn node(&self) -> &CommandNode<R> {
        &self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::{BoolArgument, LongArgument, StringArgument};
    use rstest::rstest;

    #[test]
    fn argument_info() {
        let info = ArgumentInfo::new("count", LongArgument::new(2))
            .unwrap()
            .description("abc");

        assert_eq!(info.name(), "count");
        assert_eq!(info.get_description(), Some("abc"));
        assert_eq!(info.argument().render(), "2");
        assert_eq!(info.to_string(), "<count: i64>");
    }

    #[rstest]
    #[case("")]
    #[case("1st")]
    #[case("with space")]
    #[case("--name")]
    fn invalid_names(#[case] name: &str) {
        assert_eq!(
            ArgumentInfo::new(name, BoolArgument::new(false)).unwrap_err(),
            BuildError::InvalidName {
                element: "argument",
                name: name.to_string(),
            }
        );
        assert_eq!(
            FlagInfo::new(name, None, BoolArgument::new(false)).unwrap_err(),
            BuildError::InvalidName {
                element: "flag",
                name: name.to_string(),
            }
        );
        assert_eq!(
            SwitchInfo::new(name, None).unwrap_err(),
            BuildError::InvalidName {
                element: "switch",
                name: name.to_string(),
            }
        );
    }

    #[rstest]
    #[case('-')]
    #[case(' ')]
    #[case('=')]
    fn invalid_shortcuts(#[case] shortcut: char) {
        assert_eq!(
            FlagInfo::new("output", Some(shortcut), StringArgument::new()).unwrap_err(),
            BuildError::InvalidShortcut(shortcut)
        );
        assert_eq!(
            SwitchInfo::new("verbose", Some(shortcut)).unwrap_err(),
            BuildError::InvalidShortcut(shortcut)
        );
    }

    #[rstest]
    #[case(None, false, "[--output <output: string>]")]
    #[case(Some('o'), false, "[--output | -o <output: string>]")]
    #[case(None, true, "--output <output: string>")]
    #[case(Some('o'), true, "--output | -o <output: string>")]
    fn flag_display(#[case] shortcut: Option<char>, #[case] required: bool, #[case] expected: &str) {
        let mut info = FlagInfo::new("output", shortcut, StringArgument::new()).unwrap();

        if required {
            info = info.required();
        }

        assert_eq!(info.is_required(), required);
        assert_eq!(info.shortcut(), shortcut);
        assert_eq!(info.to_string(), expected);
    }

    #[test]
    fn switch_display() {
        assert_eq!(SwitchInfo::new("dry-run", None).unwrap().to_string(), "[--dry-run]");
        assert_eq!(
            SwitchInfo::new("verbose", Some('v')).unwrap().to_string(),
            "[--verbose | -v]"
        );
    }

    #[test]
    fn node_info() {
        let info = NodeInfo::new("build", CommandNode::<()>::default()).unwrap();
        assert_eq!(info.name(), "build");
        assert!(!info.is_default());

        let info = NodeInfo::new("", CommandNode::<()>::default()).unwrap();
        assert!(info.is_default());

        assert_eq!(
            NodeInfo::new("two words", CommandNode::<()>::default()).unwrap_err(),
            BuildError::InvalidName {
                element: "node",
                name: "two words".to_string(),
            }
        );
    }

    #[test]
    fn node_info_deferred_error() {
        let node = CommandNode::<()>::default().arg("1st", BoolArgument::new(false));
        assert_matches!(
            NodeInfo::new("build", node),
            Err(BuildError::InvalidName { element: "argument", .. })
        );
    }
}
