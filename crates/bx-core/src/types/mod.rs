//! Core data types: enums, order request structs, and symbol helpers.

pub mod enums;
pub mod symbol;
pub mod trading;

pub use enums::*;
pub use symbol::*;
pub use trading::*;
