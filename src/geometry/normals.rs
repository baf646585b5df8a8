// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vertex normal strategies
//!
//! Every strategy averages the face normals around a vertex; they differ only
//! in the weight each incident corner contributes.

use super::vector::VectorExt;
use super::{TriangleGeometry, TriangleMesh, VertexId};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Weighting scheme used to turn face normals into vertex normals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalStrategy {
    /// Every incident face counts the same (Gouraud)
    Uniform,
    /// Weighted by the interior angle at the vertex (Thürmer and Wüthrich)
    #[default]
    AngleWeighted,
    /// Weighted by the full triangle area
    AreaWeighted,
    /// Weighted by the vertex's Voronoi share of the triangle
    CornerAreaWeighted,
    /// Sine of the corner angle over the product of the adjacent edge lengths (Max)
    SineEdgeLength,
    /// Reciprocal of the product of the adjacent edge lengths
    EdgeLengthReciprocal,
    /// Reciprocal square root of the product of the adjacent edge lengths
    SqrtEdgeLengthReciprocal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown normal strategy '{0}'")]
pub struct UnknownStrategy(pub String);

impl NormalStrategy {
    pub const ALL: [NormalStrategy; 7] = [
        NormalStrategy::Uniform,
        NormalStrategy::AngleWeighted,
        NormalStrategy::AreaWeighted,
        NormalStrategy::CornerAreaWeighted,
        NormalStrategy::SineEdgeLength,
        NormalStrategy::EdgeLengthReciprocal,
        NormalStrategy::SqrtEdgeLengthReciprocal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::AngleWeighted => "angle-weighted",
            Self::AreaWeighted => "area-weighted",
            Self::CornerAreaWeighted => "corner-area-weighted",
            Self::SineEdgeLength => "sine-edge-length",
            Self::EdgeLengthReciprocal => "edge-length-reciprocal",
            Self::SqrtEdgeLengthReciprocal => "sqrt-edge-length-reciprocal",
        }
    }

    /// Weight of the corner at slot `corner` of a triangle
    pub fn corner_weight(self, geometry: &TriangleGeometry, corner: usize) -> f64 {
        let corner = corner % 3;
        let (l1, l2) = geometry.adjacent_edge_lengths(corner);
        let lengths = l1 * l2;
        match self {
            Self::Uniform => 1.0,
            Self::AngleWeighted => geometry.angles[corner],
            Self::AreaWeighted => geometry.area,
            Self::CornerAreaWeighted => geometry.corner_areas[corner],
            Self::SineEdgeLength if lengths > 0.0 => geometry.angles[corner].sin() / lengths,
            Self::EdgeLengthReciprocal if lengths > 0.0 => 1.0 / lengths,
            Self::SqrtEdgeLengthReciprocal if lengths > 0.0 => 1.0 / lengths.sqrt(),
            Self::SineEdgeLength | Self::EdgeLengthReciprocal | Self::SqrtEdgeLengthReciprocal => 0.0,
        }
    }

    /// Unit normal for every live vertex, from the mesh's derived triangle data
    ///
    /// Vertices without incident triangles get the unit X axis.
    pub fn compute(self, mesh: &TriangleMesh) -> Vec<(VertexId, Vector3<f64>)> {
        mesh.vertices()
            .map(|(id, vertex)| {
                let mut sum = Vector3::zeros();
                for &tid in &vertex.incident_triangles {
                    let Some(triangle) = mesh.triangle(tid) else {
                        continue;
                    };
                    if let Some(corner) = triangle.corner_of(id) {
                        let weight = self.corner_weight(&triangle.geometry, corner);
                        sum += triangle.geometry.normal * weight;
                    }
                }
                (id, sum.normalized_or_x())
            })
            .collect()
    }
}

impl fmt::Display for NormalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NormalStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == wanted)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}
