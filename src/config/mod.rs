pub mod jit_config;
pub use jit_config::*;
