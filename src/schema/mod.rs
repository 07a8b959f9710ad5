pub mod dependencies;
pub mod reference;
pub mod tables;
pub mod types;

pub use dependencies::*;
pub use reference::*;
pub use tables::*;
pub use types::*;
