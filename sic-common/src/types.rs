//! Common types used throughout the compiler
//!
//! This module defines the arena handles shared by the IR and the passes,
//! and the shader pipeline stages a translation unit can belong to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IrError;

/// Handle of an operand in a function's operand table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperandId(pub u32);

/// Handle of an operation in a function's operation table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(pub u32);

/// Basic block identifier
pub type BlockId = u32;

/// Number of storage buffers that can be bound to a single shader stage
pub const STORAGE_MAX_COUNT: u32 = 16;

impl OperandId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl OperationId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for OperandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op{}", self.0)
    }
}

/// Shader pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderStage {
    Vertex,
    TessellationControl,
    TessellationEvaluation,
    Geometry,
    Fragment,
    Compute,
}

impl ShaderStage {
    /// Every stage, in pipeline order
    pub const ALL: [ShaderStage; 6] = [
        ShaderStage::Vertex,
        ShaderStage::TessellationControl,
        ShaderStage::TessellationEvaluation,
        ShaderStage::Geometry,
        ShaderStage::Fragment,
        ShaderStage::Compute,
    ];

    /// Short name used on the command line and in IR dumps
    pub fn short_name(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::TessellationControl => "tess-control",
            ShaderStage::TessellationEvaluation => "tess-eval",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "compute",
        }
    }

    /// Compute shaders run outside the graphics pipeline
    pub fn is_graphics(&self) -> bool {
        !matches!(self, ShaderStage::Compute)
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl FromStr for ShaderStage {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stage = match s.to_ascii_lowercase().as_str() {
            "vertex" | "vert" => ShaderStage::Vertex,
            "tess-control" | "tessellation-control" | "tessellation_control" | "tesc" => {
                ShaderStage::TessellationControl
            }
            "tess-eval" | "tessellation-evaluation" | "tessellation_evaluation" | "tese" => {
                ShaderStage::TessellationEvaluation
            }
            "geometry" | "geom" => ShaderStage::Geometry,
            "fragment" | "frag" => ShaderStage::Fragment,
            "compute" | "comp" => ShaderStage::Compute,
            _ => return Err(IrError::UnknownStage(s.to_string())),
        };
        Ok(stage)
    }
}
