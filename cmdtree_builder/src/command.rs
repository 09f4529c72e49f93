mod dispatcher;
mod error;
mod info;
mod node;
mod syntax;

pub use dispatcher::*;
pub use error::*;
pub use info::*;
pub use node::*;
pub use syntax::*;
