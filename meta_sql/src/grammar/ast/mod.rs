pub mod display;
pub mod nodes;

pub use nodes::*;
