pub mod used_column;
pub use used_column::*;

pub mod expression_scanner;
pub use expression_scanner::*;
