// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Undirected mesh edges

use super::{TriangleId, VertexId};

/// Canonical key of an undirected edge: the vertex pair stored as `(min, max)`
///
/// The key is purely topological. Edge length is an attribute of [`Edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    a: VertexId,
    b: VertexId,
}

impl EdgeKey {
    pub fn new(v0: VertexId, v1: VertexId) -> Self {
        if v0 <= v1 {
            Self { a: v0, b: v1 }
        } else {
            Self { a: v1, b: v0 }
        }
    }

    /// Smaller endpoint
    pub fn a(&self) -> VertexId {
        self.a
    }

    /// Larger endpoint
    pub fn b(&self) -> VertexId {
        self.b
    }

    pub fn vertices(&self) -> [VertexId; 2] {
        [self.a, self.b]
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.a == vertex || self.b == vertex
    }

    /// True when both endpoints are the same vertex
    pub fn is_loop(&self) -> bool {
        self.a == self.b
    }
}

/// Edge derived by the consistency rebuild
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    key: EdgeKey,
    /// Euclidean length at the last rebuild
    pub length: f64,
    /// Triangles sharing this edge, in rebuild order
    pub incident_triangles: Vec<TriangleId>,
}

impl Edge {
    pub fn new(v0: VertexId, v1: VertexId, length: f64) -> Self {
        Self {
            key: EdgeKey::new(v0, v1),
            length,
            incident_triangles: Vec::new(),
        }
    }

    pub fn key(&self) -> EdgeKey {
        self.key
    }

    pub fn vertices(&self) -> [VertexId; 2] {
        self.key.vertices()
    }

    /// The endpoint opposite `vertex`, if `vertex` is an endpoint
    pub fn other(&self, vertex: VertexId) -> Option<VertexId> {
        if self.key.a == vertex {
            Some(self.key.b)
        } else if self.key.b == vertex {
            Some(self.key.a)
        } else {
            None
        }
    }

    /// Shared by a single triangle
    pub fn is_boundary(&self) -> bool {
        self.incident_triangles.len() == 1
    }

    /// Shared by at most two triangles
    pub fn is_manifold(&self) -> bool {
        self.incident_triangles.len() <= 2
    }
}
