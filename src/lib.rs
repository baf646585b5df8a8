// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! trimm - triangle mesh engine
//!
//! Vertices and triangles are stored behind generation-checked handles.
//! Mutations are cheap and leave the derived topology and geometry stale
//! until [`TriangleMesh::rebuild`] recomputes it in one pass. Includes
//! subdivision, vertex-normal strategies, analytics, and OFF/OBJ/STL and
//! snapshot file support.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod utils;

pub use config::TrimmConfig;
pub use error::{MeshError, MeshResult};
pub use geometry::{
    MeshEvent, NormalStrategy, Primitive, RebuildOptions, TriangleId, TriangleMesh, VertexId,
};
pub use io::{load_mesh, save_mesh};
