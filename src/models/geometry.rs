// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometry interchange format.
//!
//! This module defines the boundary representation for loading and saving
//! annotation geometry: a flat vertex sequence with an open/closed flag,
//! optionally carrying multi-polygon sub-groups, plus the shared `id` and
//! `color` fields. Incoming payloads are validated into the [`Geometry`]
//! tagged variant rather than trusted implicitly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when interchange geometry is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("vertex sequence has odd length {0}")]
    OddVertexCount(usize),
    #[error("multi-polygon group {index} has odd length {len}")]
    OddGroupVertexCount { index: usize, len: usize },
}

/// Raw geometry payload as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryData {
    /// Flat coordinate sequence (even indices = x, odd = y).
    #[serde(default)]
    pub vertices: Vec<f64>,
    /// True for a polyline that is not implicitly closed.
    #[serde(default)]
    pub is_opened: bool,
    /// Multi-polygon sub-groups, one flat sequence per disjoint part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mvertices: Option<Vec<Vec<f64>>>,
}

/// A shape's persisted/interchange representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeData {
    pub id: String,
    #[serde(default)]
    pub color: u32,
    pub geometry: GeometryData,
}

impl ShapeData {
    /// Build the interchange record for a single polygon.
    pub fn polygon(id: impl Into<String>, color: u32, vertices: Vec<f64>, is_opened: bool) -> Self {
        Self {
            id: id.into(),
            color,
            geometry: GeometryData {
                vertices,
                is_opened,
                mvertices: None,
            },
        }
    }

    /// Build the interchange record for a multi-polygon.
    pub fn multi_polygon(id: impl Into<String>, color: u32, groups: Vec<Vec<f64>>) -> Self {
        Self {
            id: id.into(),
            color,
            geometry: GeometryData {
                vertices: Vec::new(),
                is_opened: false,
                mvertices: Some(groups),
            },
        }
    }
}

/// Validated geometry, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon { vertices: Vec<f64>, is_opened: bool },
    MultiPolygon { groups: Vec<Vec<f64>> },
}

impl Geometry {
    /// Validate a raw payload into a tagged variant.
    ///
    /// A payload carrying `mvertices` is a multi-polygon; anything else is a
    /// single polygon. Odd-length vertex sequences are rejected.
    pub fn from_data(data: &GeometryData) -> Result<Self, GeometryError> {
        if let Some(groups) = &data.mvertices {
            for (index, group) in groups.iter().enumerate() {
                if group.len() % 2 != 0 {
                    return Err(GeometryError::OddGroupVertexCount {
                        index,
                        len: group.len(),
                    });
                }
            }
            Ok(Geometry::MultiPolygon {
                groups: groups.clone(),
            })
        } else {
            if data.vertices.len() % 2 != 0 {
                return Err(GeometryError::OddVertexCount(data.vertices.len()));
            }
            Ok(Geometry::Polygon {
                vertices: data.vertices.clone(),
                is_opened: data.is_opened,
            })
        }
    }
}

impl TryFrom<&GeometryData> for Geometry {
    type Error = GeometryError;

    fn try_from(data: &GeometryData) -> Result<Self, Self::Error> {
        Geometry::from_data(data)
    }
}
