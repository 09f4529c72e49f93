mod base;
mod interface;
mod token;

pub use base::*;
pub(crate) use interface::*;
