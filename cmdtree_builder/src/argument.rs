mod contract;
mod scalar;
mod select;
mod text;

pub use contract::*;
pub use scalar::*;
pub use select::*;
pub use text::*;
