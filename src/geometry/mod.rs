// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation and operations

pub mod analytics;
mod bbox;
mod edge;
mod events;
mod handle;
mod mesh;
mod normals;
mod primitives;
mod render;
mod subdivision;
mod triangle;
pub mod vector;
mod vertex;

pub use analytics::{analyze, validate_mesh, GeometryStats, MeshValidation};
pub use bbox::BoundingBox;
pub use edge::{Edge, EdgeKey};
pub use events::{ListenerId, Listeners, MeshEvent};
pub use handle::{Arena, Handle};
pub use mesh::{RebuildOptions, TriangleMesh};
pub use normals::{NormalStrategy, UnknownStrategy};
pub use primitives::Primitive;
pub use render::{RenderArrays, Shading};
pub use triangle::{is_triangle, Triangle, TriangleGeometry, COLLINEAR_ANGLE_THRESHOLD};
pub use vector::VectorExt;
pub use vertex::Vertex;

/// Handle to a vertex slot in a [`TriangleMesh`]
pub type VertexId = Handle<Vertex>;

/// Handle to a triangle slot in a [`TriangleMesh`]
pub type TriangleId = Handle<Triangle>;
