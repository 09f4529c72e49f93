//! Builder module for `cmdtree`.
//! See [documentation root](https://docs.rs/cmdtree/latest/cmdtree/index.html) for full details.
#![deny(missing_docs)]
mod argument;
mod command;
mod context;
mod model;
mod parser;
#[allow(missing_docs)]
pub mod prelude;

pub use argument::*;
pub use command::*;
pub use context::*;
pub use model::*;
pub use parser::{CommandError, CommandParser, ParseError, ParsedCommand};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
