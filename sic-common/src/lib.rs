//! Shader IR Compiler - Common Types and Utilities
//! 
//! This crate contains shared identifiers, the shader stage enumeration,
//! and error definitions used across all components of the shader compiler.

pub mod error;
pub mod types;

pub use error::{IrError, Result};
pub use types::*;
