use crate::command::{BuildError, CommandNode, CommandNodeCollection, NodeInfo};
use crate::parser::{
    CommandError, CommandParser, ConsoleInterface, ErrorContext, ParsedCommand, UserInterface,
};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The registry of root commands, and the entry point for parsing and executing console input.
///
/// Every input line starts with the name of a registered root command.
///
/// ### Example
/// ```
/// # use cmdtree_builder as cmdtree;
/// use cmdtree::{CommandDispatcher, StringArgument};
///
/// let dispatcher = CommandDispatcher::new()
///     .register("greet", |node| {
///         node.arg("name", StringArgument::new())
///             .executes(|context| format!("Hello, {}!", context.value::<String>("name").unwrap()))
///     })
///     .unwrap();
///
/// assert_eq!(dispatcher.execute("greet \"Ada Lovelace\"").unwrap(), "Hello, Ada Lovelace!");
/// ```
pub struct CommandDispatcher<R> {
    commands: CommandNodeCollection<R>,
}

impl<R> std::fmt::Debug for CommandDispatcher<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("commands", &self.commands)
            .finish()
    }
}

impl<R> Default for CommandDispatcher<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> CommandDispatcher<R> {
    /// Create a dispatcher without any commands.
    pub fn new() -> Self {
        Self {
            commands: CommandNodeCollection::new(false),
        }
    }

    /// Register the root command `name`, declared by `supplier`.
    ///
    /// This finalizes the command's grammar and checks it for errors (ex: a repeated name on some command path).
    /// A failed registration leaves nothing behind.
    pub fn register(
        mut self,
        name: impl Into<String>,
        supplier: impl FnOnce(CommandNode<R>) -> CommandNode<R>,
    ) -> Result<Self, BuildError> {
        let name = name.into();
        let info = NodeInfo::new(name.clone(), supplier(CommandNode::default()))?;
        info.node().syntax().validate(vec![name])?;
        self.commands.insert(info)?;

        #[cfg(feature = "tracing_debug")]
        {
            let info = self
                .commands
                .nodes()
                .last()
                .expect("internal error - registered command must be present");
            debug!("Registered command '{}': {}", info.name(), info.node().syntax());
        }

        Ok(self)
    }

    /// The registered root commands, in registration order.
    pub fn commands(&self) -> &[NodeInfo<R>] {
        self.commands.nodes()
    }

    /// Parse `input` into a [`ParsedCommand`], without executing it.
    ///
    /// ### Example
    /// ```
    /// # use cmdtree_builder as cmdtree;
    /// use cmdtree::{CommandDispatcher, LongArgument};
    ///
    /// let dispatcher: CommandDispatcher<()> = CommandDispatcher::new()
    ///     .register("build", |node| {
    ///         node.nodes(|c| c.node("release", |n| n).node("debug", |n| n))
    ///             .flag("jobs", Some('j'), LongArgument::new(1))
    ///     })
    ///     .unwrap();
    ///
    /// let parsed = dispatcher.parse("build release -j 8").unwrap();
    /// assert_eq!(parsed.path(), ["build", "release"]);
    /// assert_eq!(parsed.context().value::<i64>("jobs").unwrap(), 8);
    /// ```
    pub fn parse<'g>(&'g self, input: &str) -> Result<ParsedCommand<'g, R>, CommandError> {
        Ok(CommandParser::new(input).parse_commands(self.commands.nodes())?)
    }

    /// Parse `input`, and execute the resolved command.
    pub fn execute(&self, input: &str) -> Result<R, CommandError> {
        let parsed = self.parse(input)?;

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Executing '{}' with {}.", parsed.path().join(" "), parsed.context());
        }

        parsed.execute()
    }

    /// Parse `input`, and execute the resolved command.
    /// If an error is encountered, reports it on the console (with the position in `input` where applicable) and returns the exit code `1`.
    pub fn run(&self, input: &str) -> Result<R, i32> {
        self.run_with_interface(input, &ConsoleInterface::default())
    }

    pub(crate) fn run_with_interface(
        &self,
        input: &str,
        user_interface: &(impl UserInterface + ?Sized),
    ) -> Result<R, i32> {
        match self.execute(input) {
            Ok(result) => Ok(result),
            Err(error) => {
                let offset = error.offset();
                user_interface.print_error(error);

                if let Some(offset) = offset {
                    user_interface.print_error_context(ErrorContext::new(input, offset));
                }

                Err(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::{LongArgument, StringArgument};
    use crate::parser::util::InMemoryInterface;
    use crate::parser::ParseError;
    use crate::test::assert_contains;

    fn dispatcher() -> CommandDispatcher<String> {
        CommandDispatcher::new()
            .register("greet", |node| {
                node.arg("name", StringArgument::new())
                    .executes(|context| context.value::<String>("name").unwrap())
            })
            .unwrap()
            .register("count", |node| {
                node.arg("count", LongArgument::bounded(0, 10, 0))
                    .executes(|context| context.value::<i64>("count").unwrap().to_string())
            })
            .unwrap()
    }

    #[test]
    fn register() {
        let dispatcher = dispatcher();
        let names: Vec<&str> = dispatcher.commands().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["greet", "count"]);
    }

    #[test]
    fn register_duplicate() {
        let result = dispatcher().register("greet", |node| node);
        assert_eq!(
            result.unwrap_err(),
            BuildError::DuplicateNode("greet".to_string())
        );
    }

    #[test]
    fn register_default() {
        let result = CommandDispatcher::<()>::new().register("", |node| node);
        assert_eq!(result.unwrap_err(), BuildError::DefaultNotAllowed);
    }

    #[test]
    fn register_invalid() {
        let result = CommandDispatcher::<()>::new()
            .register("build", |node| node.nodes(|c| c.node("x", |n| n).node("x", |n| n)));
        assert_eq!(result.unwrap_err(), BuildError::DuplicateNode("x".to_string()));

        let result = CommandDispatcher::<()>::new().register("build", |node| {
            node.switch("verbose", Some('v'))
                .nodes(|c| c.node("release", |n| n.switch("verbose", None)))
        });
        assert_eq!(
            result.unwrap_err(),
            BuildError::DuplicateName {
                name: "verbose".to_string(),
                path: "build release".to_string(),
            }
        );
    }

    #[test]
    fn execute() {
        let dispatcher = dispatcher();
        assert_eq!(dispatcher.execute("greet Ada").unwrap(), "Ada");
        assert_eq!(dispatcher.execute("count 7").unwrap(), "7");
    }

    #[test]
    fn execute_unknown_command() {
        assert_matches!(
            dispatcher().execute("shout Ada"),
            Err(CommandError::Parse(ParseError::UnresolvableLiteral { offset: 0, .. }))
        );
    }

    #[test]
    fn execute_without_result_builder() {
        let dispatcher = CommandDispatcher::<u8>::new()
            .register("build", |node| node.nodes(|c| c.node("release", |n| n)))
            .unwrap();

        assert_eq!(
            dispatcher.execute("build release").unwrap_err(),
            CommandError::NoResultBuilder {
                path: "build release".to_string(),
            }
        );
    }

    #[test]
    fn run() {
        let interface = InMemoryInterface::default();
        let result = dispatcher().run_with_interface("greet Ada", &interface);
        assert_eq!(result.unwrap(), "Ada");

        let (error, error_context) = interface.consume();
        assert_eq!(error, None);
        assert_eq!(error_context, None);
    }

    #[test]
    fn run_error() {
        let interface = InMemoryInterface::default();
        let result = dispatcher().run_with_interface("count 11", &interface);
        assert_eq!(result.unwrap_err(), 1);

        let (error, error_context) = interface.consume();
        assert_contains!(error.unwrap(), "invalid value '11'");
        assert_eq!(
            error_context.unwrap().to_string(),
            "count 11\n      ^"
        );
    }

    #[test]
    fn run_error_without_position() {
        let dispatcher = CommandDispatcher::<u8>::new()
            .register("build", |node| node)
            .unwrap();
        let interface = InMemoryInterface::default();
        assert_eq!(dispatcher.run_with_interface("build", &interface).unwrap_err(), 1);

        let (error, error_context) = interface.consume();
        assert_contains!(error.unwrap(), "no result builder");
        assert_eq!(error_context, None);
    }
}
