pub mod source_text;
pub use source_text::*;

pub mod operation_kind;
pub use operation_kind::*;

pub mod synthesized_unit;
pub use synthesized_unit::*;

pub mod transformation;
pub use transformation::*;

pub mod code_synthesizer;
pub use code_synthesizer::*;
