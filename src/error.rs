// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for mesh operations

use crate::geometry::{TriangleId, VertexId};
use thiserror::Error;

/// Errors raised by the mesh engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// A vector operation received operands of the wrong dimensionality.
    #[error("dimension mismatch in {operation}: expected {expected}, found {found}")]
    Dimension {
        operation: &'static str,
        expected: usize,
        found: usize,
    },

    /// A triangle references a vertex that is not live in the mesh.
    #[error("triangle {triangle} references missing vertex {vertex}")]
    IndexOutOfRange {
        triangle: TriangleId,
        vertex: VertexId,
    },

    /// A dense index points past the end of the vertex list.
    #[error("vertex index {index} out of range for {len} vertices")]
    DenseIndexOutOfRange { index: usize, len: usize },

    /// Scalar division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A handle refers to a removed (or never allocated) element.
    #[error("stale handle: {0}")]
    StaleHandle(String),

    /// Vertex removal attempted while triangles still reference it.
    #[error("vertex {vertex} is still referenced by {triangles} triangle(s)")]
    VertexInUse { vertex: VertexId, triangles: usize },

    /// Snapshot written by an unknown format or version.
    #[error("unsupported snapshot {format} version {version}")]
    UnsupportedSnapshot { format: String, version: u32 },

    /// Malformed mesh file contents.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Result type for mesh operations.
pub type MeshResult<T> = std::result::Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::DivisionByZero;
        assert_eq!(format!("{err}"), "division by zero");

        let err = MeshError::Dimension {
            operation: "cross",
            expected: 3,
            found: 2,
        };
        assert!(format!("{err}").contains("cross"));
        assert!(format!("{err}").contains('2'));

        let err = MeshError::Parse {
            line: 7,
            message: "bad face".into(),
        };
        assert_eq!(format!("{err}"), "parse error on line 7: bad face");
    }
}
