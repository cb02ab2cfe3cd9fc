pub mod definition;
pub mod graph;
pub mod units;

pub use definition::*;
pub use graph::*;
pub use units::*;
