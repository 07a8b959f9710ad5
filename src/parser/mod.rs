pub mod catalog;
pub mod row;
pub mod uwp;

pub use catalog::*;
pub use row::*;
pub use uwp::*;
