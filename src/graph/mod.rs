pub mod node_handle;
pub use node_handle::*;

pub mod node_kind;
pub use node_kind::*;

pub mod pipeline_node;
pub use pipeline_node::*;

pub mod pipeline;
pub use pipeline::*;
