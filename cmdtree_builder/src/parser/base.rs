use std::collections::HashSet;
use thiserror::Error;

use crate::argument::{Argument, ArgumentError, BoolArgument};
use crate::command::{
    branch_usage, BuildError, CommandNode, CommandSyntax, FlagInfo, NodeInfo, SwitchInfo,
    SyntaxElement,
};
use crate::context::Context;
use crate::parser::token::{unquote, Token, TokenKind, Tokenizer};
use crate::prelude::TypedArgument;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The error raised when input does not fit the command grammar.
/// Every variant carries the byte offset in the input where the problem was found.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The input ended while a token was still expected.
    #[error("expected {expected}, found end of input at position {offset}.")]
    EndOfInput {
        /// What was expected.
        expected: String,
        /// The input length.
        offset: usize,
    },

    /// A token of the wrong kind appeared (ex: an option where an argument belongs).
    #[error("expected {expected}, found '{found}' at position {offset}.")]
    UnexpectedToken {
        /// What was expected.
        expected: String,
        /// The token as it appears in the input.
        found: String,
        /// The token's offset.
        offset: usize,
    },

    /// A literal matched none of the nodes at a branch-point, and there is no default node.
    #[error("expected {expected}, found unknown literal '{literal}' at position {offset}.")]
    UnresolvableLiteral {
        /// The unmatched literal.
        literal: String,
        /// The literals which would have matched.
        expected: String,
        /// The literal's offset.
        offset: usize,
    },

    /// An argument or flag rejected its value.
    #[error("invalid '{name}' at position {offset}: {source}")]
    Argument {
        /// The argument's name.
        name: String,
        /// The value's offset.
        offset: usize,
        /// The argument's error (format vs. value).
        #[source]
        source: ArgumentError,
    },

    /// An option names no flag or switch visible on the command path.
    #[error("unknown option '{option}' at position {offset}.")]
    UnknownOption {
        /// The option as it appears in the input.
        option: String,
        /// The option's offset.
        offset: usize,
    },

    /// A flag or switch appeared more than once.
    #[error("option '{option}' is repeated at position {offset}.")]
    DuplicateOption {
        /// The flag or switch name.
        option: String,
        /// The repeat's offset.
        offset: usize,
    },

    /// A required flag never appeared.
    #[error("expected required flag {flag}, found end of input at position {offset}.")]
    MissingFlag {
        /// The flag's usage.
        flag: String,
        /// The input length.
        offset: usize,
    },
}

impl ParseError {
    /// The byte offset in the input where the problem was found.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::EndOfInput { offset, .. }
            | ParseError::UnexpectedToken { offset, .. }
            | ParseError::UnresolvableLiteral { offset, .. }
            | ParseError::Argument { offset, .. }
            | ParseError::UnknownOption { offset, .. }
            | ParseError::DuplicateOption { offset, .. }
            | ParseError::MissingFlag { offset, .. } => *offset,
        }
    }

    fn unexpected(expected: impl Into<String>, token: &Token) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: token.text.clone(),
            offset: token.offset,
        }
    }
}

/// The error raised when parsing or executing a command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The grammar was declared incorrectly.
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// The input does not fit the grammar.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The input resolved to a node without a result builder.
    #[error("the command '{path}' has no result builder.")]
    NoResultBuilder {
        /// The literals leading to the node.
        path: String,
    },
}

impl CommandError {
    /// The byte offset in the input where the problem was found, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            CommandError::Parse(error) => Some(error.offset()),
            _ => None,
        }
    }
}

/// The result of parsing: the populated [`Context`], and the node the input resolved to.
pub struct ParsedCommand<'g, R> {
    context: Context,
    leaf: &'g CommandNode<R>,
    path: Vec<String>,
}

impl<'g, R> ParsedCommand<'g, R> {
    /// The parsed values.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Take the parsed values.
    pub fn into_context(self) -> Context {
        self.context
    }

    /// The node the input resolved to.
    pub fn leaf(&self) -> &'g CommandNode<R> {
        self.leaf
    }

    /// The literals consumed at each branch-point, in order.
    /// A literal which selected a default node appears as written.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Invoke the resolved node's result builder with the parsed values.
    pub fn execute(self) -> Result<R, CommandError> {
        self.leaf.execute_at(self.context, &self.path)
    }
}

impl<'g, R> std::fmt::Debug for ParsedCommand<'g, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedCommand")
            .field("context", &self.context)
            .field("path", &self.path)
            .finish()
    }
}

// Everything accumulated while walking one input.
struct Session<'g, R> {
    context: Context,
    flags: Vec<&'g FlagInfo>,
    switches: Vec<&'g SwitchInfo>,
    path: Vec<String>,
    leaf: Option<&'g CommandNode<R>>,
}

impl<'g, R> Session<'g, R> {
    fn new(leaf: Option<&'g CommandNode<R>>) -> Self {
        Self {
            context: Context::default(),
            flags: Vec::default(),
            switches: Vec::default(),
            path: Vec::default(),
            leaf,
        }
    }

    fn insert(&mut self, name: &str, argument: Box<dyn Argument>) {
        self.context
            .add_boxed(name, argument)
            .expect("internal error - context keys must be unique along a validated command path");
    }

    fn flag(&self, matches: impl Fn(&FlagInfo) -> bool) -> Option<&'g FlagInfo> {
        self.flags.iter().copied().find(|f| matches(*f))
    }

    fn switch(&self, matches: impl Fn(&SwitchInfo) -> bool) -> Option<&'g SwitchInfo> {
        self.switches.iter().copied().find(|s| matches(*s))
    }

    // The tokenizer reads `-1` as a negative number.
    // Amongst the options, it is a shortcut whenever a visible flag or switch declares that digit.
    fn is_digit_shortcut(&self, token: &Token) -> bool {
        if token.kind != TokenKind::Etc {
            return false;
        }

        match token.text.strip_prefix('-').and_then(|rest| rest.chars().next()) {
            Some(digit) if digit.is_ascii_digit() => {
                self.flag(|f| f.shortcut() == Some(digit)).is_some()
                    || self.switch(|s| s.shortcut() == Some(digit)).is_some()
            }
            _ => false,
        }
    }

    fn finish(self) -> ParsedCommand<'g, R> {
        ParsedCommand {
            context: self.context,
            leaf: self
                .leaf
                .expect("internal error - a resolved command must have a leaf node"),
            path: self.path,
        }
    }
}

fn split_inline(body: &str) -> (&str, Option<&str>) {
    match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    }
}

/// A single-use parser of one input line against a command grammar.
///
/// Parsing walks the grammar's positional elements in order.
/// An argument slot consumes one token as its value.
/// A branch-point consumes one literal, and continues into the child node of the same name (or else, the default node).
/// The flags and switches declared along the way are then resolved from the remaining tokens, in any order:
/// `--name value`, `--name=value`, `-n value`, `-n=value`, and combined switch shortcuts (ex: `-xvf out.txt`, where only the final shortcut may take a value).
///
/// The resulting [`Context`] holds every argument on the path, every visible flag (its default when absent), and every visible switch (as a [`BoolArgument`]).
///
/// ### Example
/// ```
/// # use cmdtree_builder as cmdtree;
/// use cmdtree::{CommandNode, CommandParser, LongArgument, StringArgument};
///
/// let node: CommandNode<()> = CommandNode::default()
///     .arg("name", StringArgument::new())
///     .flag("count", Some('c'), LongArgument::new(1))
///     .switch("loud", Some('l'));
///
/// let context = CommandParser::new("Ada --count=3").parse(node.syntax()).unwrap();
/// assert_eq!(context.value::<String>("name").unwrap(), "Ada");
/// assert_eq!(context.value::<i64>("count").unwrap(), 3);
/// assert!(!context.value::<bool>("loud").unwrap());
/// ```
#[derive(Debug)]
pub struct CommandParser<'i> {
    tokenizer: Tokenizer<'i>,
}

impl<'i> CommandParser<'i> {
    /// Create a parser for `input`.
    pub fn new(input: &'i str) -> Self {
        Self {
            tokenizer: Tokenizer::new(input),
        }
    }

    /// Parse the input against `syntax`.
    ///
    /// Fails with [`CommandError::Build`] if the syntax repeats a name or shortcut on some path, or with [`CommandError::Parse`] if the input does not fit.
    pub fn parse<R>(mut self, syntax: &CommandSyntax<R>) -> Result<Context, CommandError> {
        syntax.validate(Vec::default())?;
        let mut session = Session::new(None);
        self.walk(syntax, &mut session)?;
        self.resolve_options(&mut session)?;
        Ok(session.context)
    }

    pub(crate) fn parse_node<'g, R>(
        mut self,
        node: &'g CommandNode<R>,
    ) -> Result<ParsedCommand<'g, R>, ParseError> {
        let mut session = Session::new(Some(node));
        self.walk(node.syntax(), &mut session)?;
        self.resolve_options(&mut session)?;
        Ok(session.finish())
    }

    pub(crate) fn parse_commands<'g, R>(
        mut self,
        commands: &'g [NodeInfo<R>],
    ) -> Result<ParsedCommand<'g, R>, ParseError> {
        let mut session = Session::new(None);
        self.branch(commands, &mut session)?;
        self.resolve_options(&mut session)?;
        Ok(session.finish())
    }

    fn walk<'g, R>(
        &mut self,
        syntax: &'g CommandSyntax<R>,
        session: &mut Session<'g, R>,
    ) -> Result<(), ParseError> {
        session.flags.extend(syntax.flags());
        session.switches.extend(syntax.switches());

        for element in syntax.elements() {
            match element {
                SyntaxElement::Argument(info) => {
                    let expected = info.to_string();
                    let token = self.tokenizer.read_next(&expected)?;

                    match token.kind {
                        TokenKind::Flag => return Err(ParseError::unexpected(expected, &token)),
                        TokenKind::String if !info.argument().accepts_string() => {
                            return Err(ParseError::unexpected(expected, &token));
                        }
                        _ => {}
                    }

                    let argument = set_value(info.name(), info.argument(), &token)?;
                    session.insert(info.name(), argument);
                }
                SyntaxElement::Branch(nodes) => self.branch(nodes, session)?,
            }
        }

        Ok(())
    }

    fn branch<'g, R>(
        &mut self,
        nodes: &'g [NodeInfo<R>],
        session: &mut Session<'g, R>,
    ) -> Result<(), ParseError> {
        let expected = branch_usage(nodes);
        let token = self.tokenizer.read_next(&expected)?;

        if token.kind != TokenKind::Etc {
            return Err(ParseError::unexpected(expected, &token));
        }

        let selected = match nodes
            .iter()
            .find(|info| !info.is_default() && info.name() == token.value)
        {
            Some(info) => info,
            None => match nodes.iter().find(|info| info.is_default()) {
                Some(info) => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Literal '{}' falls back to the default node.", token.value);
                    }

                    info
                }
                None => {
                    return Err(ParseError::UnresolvableLiteral {
                        literal: token.value,
                        expected,
                        offset: token.offset,
                    });
                }
            },
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Resolved '{}' at {}.", token.value, token.offset);
        }

        session.path.push(token.value);
        session.leaf.replace(selected.node());
        self.walk(selected.node().syntax(), session)
    }

    fn resolve_options<R>(&mut self, session: &mut Session<'_, R>) -> Result<(), ParseError> {
        let mut seen: HashSet<String> = HashSet::default();

        while !self.tokenizer.is_end() {
            let token = self.tokenizer.read_next("an option")?;

            if token.kind != TokenKind::Flag && !session.is_digit_shortcut(&token) {
                return Err(ParseError::unexpected("an option", &token));
            }

            self.option(&token, session, &mut seen)?;
        }

        for flag in &session.flags.clone() {
            if seen.contains(flag.name()) {
                continue;
            }

            if flag.is_required() {
                return Err(ParseError::MissingFlag {
                    flag: flag.to_string(),
                    offset: self.tokenizer.input().len(),
                });
            }

            session.insert(flag.name(), flag.argument().clone_boxed());
        }

        for switch in &session.switches.clone() {
            let mut argument = BoolArgument::new(false);
            argument
                .set(seen.contains(switch.name()))
                .expect("internal error - a bool argument accepts any bool");
            session.insert(switch.name(), Box::new(argument));
        }

        Ok(())
    }

    fn option<R>(
        &mut self,
        token: &Token,
        session: &mut Session<'_, R>,
        seen: &mut HashSet<String>,
    ) -> Result<(), ParseError> {
        let unknown = |option: String| ParseError::UnknownOption {
            option,
            offset: token.offset,
        };

        if let Some(body) = token.text.strip_prefix("--") {
            let (name, inline) = split_inline(body);

            if let Some(flag) = session.flag(|f| f.name() == name) {
                self.flag(flag, inline, token, session, seen)
            } else if let Some(switch) = session.switch(|s| s.name() == name) {
                Self::switch(switch, inline, token, seen)
            } else {
                Err(unknown(token.text.clone()))
            }
        } else {
            let (shortcuts, inline) = split_inline(&token.text[1..]);
            let count = shortcuts.chars().count();

            if count == 0 {
                return Err(unknown(token.text.clone()));
            }

            for (i, shortcut) in shortcuts.chars().enumerate() {
                let last = i + 1 == count;

                if let Some(switch) = session.switch(|s| s.shortcut() == Some(shortcut)) {
                    Self::switch(switch, inline.filter(|_| last), token, seen)?;
                } else if let Some(flag) = session.flag(|f| f.shortcut() == Some(shortcut)) {
                    if !last {
                        return Err(ParseError::UnexpectedToken {
                            expected: format!("{flag} last amongst the shortcuts"),
                            found: token.text.clone(),
                            offset: token.offset,
                        });
                    }

                    self.flag(flag, inline, token, session, seen)?;
                } else {
                    return Err(unknown(format!("-{shortcut}")));
                }
            }

            Ok(())
        }
    }

    fn flag<R>(
        &mut self,
        flag: &FlagInfo,
        inline: Option<&str>,
        token: &Token,
        session: &mut Session<'_, R>,
        seen: &mut HashSet<String>,
    ) -> Result<(), ParseError> {
        mark_seen(flag.name(), token, seen)?;
        let expected = flag.to_string();

        let value = match inline {
            Some(raw) => {
                let (kind, value) = match unquote(raw) {
                    Some(value) => (TokenKind::String, value),
                    None => (TokenKind::Etc, raw),
                };
                Token {
                    kind,
                    text: raw.to_string(),
                    value: value.to_string(),
                    offset: token.offset + token.text.len() - raw.len(),
                }
            }
            None => self.tokenizer.read_next(&expected)?,
        };

        match value.kind {
            TokenKind::Flag => return Err(ParseError::unexpected(expected, &value)),
            TokenKind::String if !flag.argument().accepts_string() => {
                return Err(ParseError::unexpected(expected, &value));
            }
            _ => {}
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Flag '{}' takes '{}'.", flag.name(), value.value);
        }

        let argument = set_value(flag.name(), flag.argument(), &value)?;
        session.insert(flag.name(), argument);
        Ok(())
    }

    fn switch(
        switch: &SwitchInfo,
        inline: Option<&str>,
        token: &Token,
        seen: &mut HashSet<String>,
    ) -> Result<(), ParseError> {
        if inline.is_some() {
            return Err(ParseError::unexpected(switch.to_string(), token));
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Switch '{}' is present.", switch.name());
        }

        mark_seen(switch.name(), token, seen)
    }
}

fn mark_seen(name: &str, token: &Token, seen: &mut HashSet<String>) -> Result<(), ParseError> {
    if seen.insert(name.to_string()) {
        Ok(())
    } else {
        Err(ParseError::DuplicateOption {
            option: name.to_string(),
            offset: token.offset,
        })
    }
}

// Set a fresh copy of the declared argument, leaving the declaration untouched.
fn set_value(
    name: &str,
    declared: &dyn Argument,
    token: &Token,
) -> Result<Box<dyn Argument>, ParseError> {
    let mut argument = declared.clone_boxed();
    argument
        .set_from_text(&token.value)
        .map_err(|source| ParseError::Argument {
            name: name.to_string(),
            offset: token.offset,
            source,
        })?;
    Ok(argument)
}
