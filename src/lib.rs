//! `cmdtree` is a typed command tree for interactive consoles.
//!
//! Declare the verbs of your console once, as a tree of command nodes.
//! `cmdtree` parses each input line against that tree into a typed [`Context`], and dispatches it to the callback of the node the input resolved to.
//!
//! `cmdtree` is not a process argument parser: each input is a single line of text (ex: a line typed into a game or tool console), which `cmdtree` tokenizes itself.
//!
//! **Design concerns**:
//! * The grammar is built once, and then only read; parsing never mutates it.
//! It may be shared across threads (`CommandDispatcher<R>: Send + Sync`).
//! * Every parse starts from a fresh [`Context`], holding independent copies of the declared arguments.
//! * Declaration mistakes are caught at build time (ex: two nodes with the same name, a repeated flag shortcut along a command path).
//! * Input mistakes are reported with the position in the input where they were found.
//!
//! # Usage
//! Start with a [`CommandDispatcher`], and `register` a root command per verb.
//! Each root command is declared on a [`CommandNode`] by chaining:
//! * [`CommandNode::arg`]: a positional argument.
//! * [`CommandNode::nodes`]: a branch-point into named child nodes.
//! * [`CommandNode::flag`] / [`CommandNode::required_flag`]: a named option taking a value.
//! * [`CommandNode::switch`]: a named option without a value.
//! * [`CommandNode::executes`]: the callback invoked with the parsed [`Context`].
//!
//! ```no_run
#![doc = include_str!("../demos/greeter.rs")]
//! ```
//!
//! ```console
//! $ greeter 'greet "Ada Lovelace"'
//! Hello, Ada Lovelace!
//!
//! $ greeter 'greet Ada -st 2'
//! HELLO, ADA!
//! HELLO, ADA!
//!
//! $ greeter 'greet Ada --times 11'
//! Parse error: invalid 'times' at position 18: invalid value '11': greater than the greatest allowed value (10).
//! greet Ada --times 11
//!                   ^
//! ```
//!
//! ### Arguments
//! Values are held by [`Argument`] kinds, each of which parses and validates its own text form:
//! * [`BoolArgument`]: `true` or `false`.
//! * [`NumberArgument`]: any primitive number, optionally bounded (see [`LongArgument`], [`DoubleArgument`], etc).
//! * [`StringArgument`]: text, optionally restricted by length and [`StringFeatures`].
//! * [`PathArgument`]: a filesystem path, optionally required to exist as a [`PathKind`].
//! * [`SingleSelectArgument`] / [`MultiSelectArgument`]: one (or several, comma separated) of a fixed list of options.
//!
//! The declared argument is a template: it defines the kind, the default, and the validation.
//! Parsing sets a copy of it into the [`Context`], where the callback reads it back by name.
//!
//! ```
//! use cmdtree::{prelude::*, CommandDispatcher, Context, LongArgument};
//!
//! let dispatcher = CommandDispatcher::new()
//!     .register("add", |node| {
//!         node.arg("a", LongArgument::new(0))
//!             .arg("b", LongArgument::new(0))
//!             .executes(|context: Context| {
//!                 let a: i64 = context.value("a").unwrap();
//!                 let b = context.get::<LongArgument>("b").unwrap().get();
//!                 a + b
//!             })
//!     })
//!     .unwrap();
//!
//! assert_eq!(dispatcher.execute("add 40 2").unwrap(), 42);
//! assert_eq!(dispatcher.execute("add -1 1").unwrap(), 0);
//! ```
//!
//! ### Branches
//! A branch-point consumes one literal, and continues into the child node of that name.
//! A child named `""` is the *default* node: any literal which matches no other child falls back to it.
//! Without a default node, an unknown literal is a parse error.
//!
//! ```no_run
#![doc = include_str!("../demos/build_console.rs")]
//! ```
//!
//! ```console
//! build release x86 -j 8
//! Building x86 (release) with 8 job(s).
//! build nightly arm
//! Building arm (debug) with 1 job(s).
//! build release
//! Parse error: expected <target: single-select>, found end of input at position 13.
//! build release
//!              ^
//! deploy x86
//! Parse error: expected {build | clean | echo}, found unknown literal 'deploy' at position 0.
//! deploy x86
//! ^
//! ```
//!
//! # Input Semantics
//! * Tokens are separated by whitespace.
//! A token starting with a quote (`"` or `'`) runs to the matching quote, whitespace included.
//! An unterminated quote is a parse error.
//! * Quoted tokens only fill text-like arguments (ex: strings and paths), and never select a branch.
//! * Positional elements (arguments and branch-points) are matched in declaration order.
//! * Flags and switches follow the positional elements, in any order.
//! Only the flags and switches declared along the resolved command path are visible.
//! * A flag takes its value as `--name value`, `--name=value`, `-n value`, or `-n=value`.
//! * Multiple shortcuts may be combined into a single option.
//! For example, `-abc` is equivalent to `-a -b -c`.
//! Only the final shortcut in the combination may be a flag that takes a value (ex: `-vj 8`).
//! * A `-` followed by a digit or `.` is a negative number, not an option.
//! The exception is amongst the options, where `-1` is a shortcut if a visible flag or switch declares `1`.
//! * An option may appear at most once.
//! * A flag that does not appear holds its default; a switch holds `true` exactly when it appears.
//!
//! # Features
//! * `unit_test`: For features that help with unit testing.
//! * `tracing_debug`: Emit `tracing` debug events while building, parsing and dispatching.
pub use cmdtree_builder::*;
