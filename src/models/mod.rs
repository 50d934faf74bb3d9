// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for shape geometry.

pub mod geometry;

pub use geometry::{Geometry, GeometryData, GeometryError, ShapeData};
