use crate::argument::Argument;
use crate::command::{ArgumentInfo, BuildError, CommandSyntax, FlagInfo, NodeInfo, SwitchInfo, SyntaxElement};
use crate::context::Context;
use crate::parser::{CommandError, CommandParser};

/// The callback which turns a parsed [`Context`] into a command's result.
pub type ResultBuilder<R> = Box<dyn Fn(Context) -> R + Send + Sync>;

/// One node of a command grammar.
///
/// A node declares positional arguments, branch-points into child nodes, flags, and switches.
/// A node which may end a command attaches a result builder via [`CommandNode::executes`].
///
/// Declarations are checked as they are made.
/// The first invalid declaration is remembered and raised when the node is registered/named (see [`NodeInfo::new`]), so a broken node is never reachable.
///
/// ### Example
/// ```
/// # use cmdtree_builder as cmdtree;
/// use cmdtree::{CommandNode, LongArgument};
///
/// let node = CommandNode::default()
///     .arg("count", LongArgument::new(1))
///     .switch("verbose", Some('v'))
///     .executes(|context| context.value::<i64>("count").unwrap() * 2);
///
/// let context = node.parse("21 -v").unwrap();
/// assert!(context.value::<bool>("verbose").unwrap());
/// assert_eq!(node.execute(context).unwrap(), 42);
/// ```
pub struct CommandNode<R> {
    syntax: CommandSyntax<R>,
    description: Option<String>,
    result_builder: Option<ResultBuilder<R>>,
    deferred_error: Option<BuildError>,
}

impl<R> Default for CommandNode<R> {
    fn default() -> Self {
        Self {
            syntax: CommandSyntax::default(),
            description: None,
            result_builder: None,
            deferred_error: None,
        }
    }
}

impl<R> std::fmt::Debug for CommandNode<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandNode")
            .field("syntax", &self.syntax)
            .field("executes", &self.result_builder.is_some())
            .finish()
    }
}

impl<R> CommandNode<R> {
    /// *Available using 'unit_test' crate feature only.*</br></br>
    /// Build a [`CommandNode`] for testing a node supplier in isolation.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::{CommandNode, StringArgument};
    ///
    /// // Function under test.
    /// fn greet(node: CommandNode<String>) -> CommandNode<String> {
    ///     node.arg("name", StringArgument::new())
    ///         .executes(|context| format!("Hello, {}!", context.value::<String>("name").unwrap()))
    /// }
    ///
    /// # #[cfg(feature = "unit_test")]
    /// # {
    /// let node = greet(CommandNode::test_dummy());
    /// let context = node.parse("Ada").unwrap();
    /// assert_eq!(node.execute(context).unwrap(), "Hello, Ada!");
    /// # }
    /// ```
    #[cfg(feature = "unit_test")]
    pub fn test_dummy() -> Self {
        Self::default()
    }

    fn defer(&mut self, error: BuildError) {
        if self.deferred_error.is_none() {
            self.deferred_error.replace(error);
        }
    }

    pub(crate) fn take_deferred_error(&mut self) -> Option<BuildError> {
        self.deferred_error.take()
    }

    /// Document the node.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// The documentation, if any.
    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Append a positional argument.
    /// The argument's current value is the default held by the declaration; parsing always works on a copy.
    pub fn arg(self, name: impl Into<String>, argument: impl Argument) -> Self {
        match ArgumentInfo::new(name, argument) {
            Ok(info) => self.arg_info(info),
            Err(error) => self.with_error(error),
        }
    }

    /// Append a declared positional argument.
    pub fn arg_info(mut self, info: ArgumentInfo) -> Self {
        self.syntax.push_element(SyntaxElement::Argument(info));
        self
    }

    /// Declare an optional flag, which takes its argument's default value when absent.
    pub fn flag(self, name: impl Into<String>, shortcut: Option<char>, argument: impl Argument) -> Self {
        match FlagInfo::new(name, shortcut, argument) {
            Ok(info) => self.flag_info(info),
            Err(error) => self.with_error(error),
        }
    }

    /// Declare a flag which must be present.
    pub fn required_flag(
        self,
        name: impl Into<String>,
        shortcut: Option<char>,
        argument: impl Argument,
    ) -> Self {
        match FlagInfo::new(name, shortcut, argument) {
            Ok(info) => self.flag_info(info.required()),
            Err(error) => self.with_error(error),
        }
    }

    /// Declare a flag.
    pub fn flag_info(mut self, info: FlagInfo) -> Self {
        self.syntax.push_flag(info);
        self
    }

    /// Declare a switch.
    /// Every switch appears in the parsed context as a [`BoolArgument`](./struct.BoolArgument.html), `true` only when present.
    pub fn switch(self, name: impl Into<String>, shortcut: Option<char>) -> Self {
        match SwitchInfo::new(name, shortcut) {
            Ok(info) => self.switch_info(info),
            Err(error) => self.with_error(error),
        }
    }

    /// Declare a switch.
    pub fn switch_info(mut self, info: SwitchInfo) -> Self {
        self.syntax.push_switch(info);
        self
    }

    /// Append a branch-point, whose child nodes are declared on a fresh [`CommandNodeCollection`].
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::CommandNode;
    ///
    /// let node = CommandNode::default().nodes(|collection| {
    ///     collection
    ///         .node("release", |n| n.executes(|_| "release"))
    ///         .node("", |n| n.executes(|_| "debug"))
    /// });
    ///
    /// assert_eq!(node.syntax().to_string(), "{release | ..}");
    /// ```
    pub fn nodes(
        mut self,
        supplier: impl FnOnce(CommandNodeCollection<R>) -> CommandNodeCollection<R>,
    ) -> Self {
        match supplier(CommandNodeCollection::default()).finish() {
            Ok(element) => {
                self.syntax.push_element(element);
                self
            }
            Err(error) => self.with_error(error),
        }
    }

    /// Attach the result builder, invoked with the parsed context when a command ends at this node.
    /// If repeated, only the final result builder applies.
    pub fn executes(mut self, result_builder: impl Fn(Context) -> R + Send + Sync + 'static) -> Self {
        self.result_builder.replace(Box::new(result_builder));
        self
    }

    /// The node's grammar.
    pub fn syntax(&self) -> &CommandSyntax<R> {
        &self.syntax
    }

    /// Whether a result builder is attached.
    pub fn is_executable(&self) -> bool {
        self.result_builder.is_some()
    }

    /// Invoke the result builder.
    pub fn execute(&self, context: Context) -> Result<R, CommandError> {
        self.execute_at(context, &[])
    }

    pub(crate) fn execute_at(&self, context: Context, path: &[String]) -> Result<R, CommandError> {
        match &self.result_builder {
            Some(result_builder) => Ok(result_builder(context)),
            None => Err(CommandError::NoResultBuilder {
                path: path.join(" "),
            }),
        }
    }

    /// Parse `input` against this node's grammar directly (there is no leading command literal).
    ///
    /// Fails with [`CommandError::Build`] if the node was declared incorrectly.
    pub fn parse(&self, input: &str) -> Result<Context, CommandError> {
        if let Some(error) = &self.deferred_error {
            return Err(CommandError::Build(error.clone()));
        }

        self.syntax.validate(Vec::default())?;
        let parsed = CommandParser::new(input).parse_node(self)?;
        Ok(parsed.into_context())
    }

    fn with_error(mut self, error: BuildError) -> Self {
        self.defer(error);
        self
    }
}

/// The child nodes of a branch-point, under construction.
///
/// Names must be unique, and there may be at most one default (empty named) node.
/// Whether a default node is allowed at all is chosen at creation; collections handed out by [`CommandNode::nodes`] allow one.
pub struct CommandNodeCollection<R> {
    nodes: Vec<NodeInfo<R>>,
    allow_default: bool,
    deferred_error: Option<BuildError>,
}

impl<R> Default for CommandNodeCollection<R> {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<R> CommandNodeCollection<R> {
    /// Create an empty collection.
    pub fn new(allow_default: bool) -> Self {
        Self {
            nodes: Vec::default(),
            allow_default,
            deferred_error: None,
        }
    }

    /// Add the child node `name`, declared by `supplier`.
    /// The empty name adds the default node.
    pub fn node(
        self,
        name: impl Into<String>,
        supplier: impl FnOnce(CommandNode<R>) -> CommandNode<R>,
    ) -> Self {
        match NodeInfo::new(name, supplier(CommandNode::default())) {
            Ok(info) => self.node_info(info),
            Err(error) => self.with_error(error),
        }
    }

    /// Add a named child node.
    pub fn node_info(mut self, info: NodeInfo<R>) -> Self {
        if let Err(error) = self.insert(info) {
            self.defer(error);
        }

        self
    }

    /// Whether a default node may be added.
    pub fn allows_default(&self) -> bool {
        self.allow_default
    }

    /// The nodes added so far.
    pub fn nodes(&self) -> &[NodeInfo<R>] {
        &self.nodes
    }

    pub(crate) fn insert(&mut self, info: NodeInfo<R>) -> Result<(), BuildError> {
        if info.is_default() {
            if !self.allow_default {
                return Err(BuildError::DefaultNotAllowed);
            }

            if self.nodes.iter().any(|n| n.is_default()) {
                return Err(BuildError::DuplicateDefaultNode);
            }
        } else if self.nodes.iter().any(|n| n.name() == info.name()) {
            return Err(BuildError::DuplicateNode(info.name().to_string()));
        }

        self.nodes.push(info);
        Ok(())
    }

    pub(crate) fn finish(self) -> Result<SyntaxElement<R>, BuildError> {
        match self.deferred_error {
            Some(error) => Err(error),
            None => SyntaxElement::branch(self.nodes),
        }
    }

    fn defer(&mut self, error: BuildError) {
        if self.deferred_error.is_none() {
            self.deferred_error.replace(error);
        }
    }

    fn with_error(mut self, error: BuildError) -> Self {
        self.defer(error);
        self
    }
}

impl<R> std::fmt::Debug for CommandNodeCollection<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandNodeCollection")
            .field("nodes", &self.nodes)
            .field("allow_default", &self.allow_default)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::{LongArgument, StringArgument};

    #[test]
    fn collection_duplicates() {
        let collection = CommandNodeCollection::<()>::default()
            .node("build", |n| n)
            .node("test", |n| n)
            .node("build", |n| n);
        assert_eq!(
            collection.finish().unwrap_err(),
            BuildError::DuplicateNode("build".to_string())
        );

        let collection = CommandNodeCollection::<()>::default()
            .node("", |n| n)
            .node("test", |n| n)
            .node("", |n| n);
        assert_eq!(collection.finish().unwrap_err(), BuildError::DuplicateDefaultNode);
    }

    #[test]
    fn collection_default_not_allowed() {
        let collection = CommandNodeCollection::<()>::new(false).node("", |n| n);
        assert!(!collection.allows_default());
        assert_eq!(collection.finish().unwrap_err(), BuildError::DefaultNotAllowed);
    }

    #[test]
    fn collection_keeps_first_error() {
        let collection = CommandNodeCollection::<()>::default()
            .node("bad name", |n| n)
            .node("a", |n| n)
            .node("a", |n| n);
        assert_matches!(collection.finish(), Err(BuildError::InvalidName { .. }));
    }

    #[test]
    fn collection_empty() {
        assert_eq!(
            CommandNodeCollection::<()>::default().finish().unwrap_err(),
            BuildError::EmptyBranch
        );

        let mut node = CommandNode::<()>::default().nodes(|c| c);
        assert!(node.syntax().elements().is_empty());
        assert_eq!(node.take_deferred_error(), Some(BuildError::EmptyBranch));
    }

    #[test]
    fn nodes_forward_child_errors() {
        let mut node = CommandNode::<()>::default()
            .arg("name", StringArgument::new())
            .nodes(|c| c.node("a", |n| n.switch("verbose", Some('?'))));

        assert_eq!(node.syntax().elements().len(), 1);
        assert_eq!(
            node.take_deferred_error(),
            Some(BuildError::InvalidShortcut('?'))
        );
    }

    #[test]
    fn execute() {
        let node = CommandNode::default()
            .arg("count", LongArgument::new(1))
            .executes(|context| context.value::<i64>("count").unwrap() + 1);
        assert!(node.is_executable());

        let mut context = Context::default();
        context.add("count", &LongArgument::new(4)).unwrap();
        assert_eq!(node.execute(context).unwrap(), 5);
    }

    #[test]
    fn execute_without_result_builder() {
        let node = CommandNode::<u32>::default().description("Nothing to see.");
        assert!(!node.is_executable());
        assert_eq!(node.get_description(), Some("Nothing to see."));
        assert_matches!(
            node.execute(Context::default()),
            Err(CommandError::NoResultBuilder { .. })
        );
    }

    #[test]
    fn parse() {
        let node = CommandNode::<()>::default()
            .arg("name", StringArgument::new())
            .flag("count", Some('c'), LongArgument::new(1));

        let context = node.parse("'Ada Lovelace' -c 3").unwrap();
        assert_eq!(context.value::<String>("name").unwrap(), "Ada Lovelace");
        assert_eq!(context.value::<i64>("count").unwrap(), 3);
    }

    #[test]
    fn parse_invalid_node() {
        let node = CommandNode::<()>::default().flag("bad name", None, LongArgument::new(1));
        assert_matches!(
            node.parse("1"),
            Err(CommandError::Build(BuildError::InvalidName { .. }))
        );

        let node = CommandNode::<()>::default()
            .arg("count", LongArgument::new(1))
            .switch("count", None);
        assert_matches!(
            node.parse("1"),
            Err(CommandError::Build(BuildError::DuplicateName { .. }))
        );
    }
}
