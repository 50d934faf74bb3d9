// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editable shapes mounted into the rendering scene.

pub mod multi_polygon;
pub mod polygon;

pub use multi_polygon::MultiPolygonShape;
pub use polygon::PolygonShape;

use serde::{Deserialize, Serialize};

/// Rendering mode controlling which visual affordances are shown.
///
/// Purely visual: it never gates which mutation operations are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayState {
    /// No decoration.
    #[default]
    None,
    /// Bounding box outline.
    Box,
    /// Contour highlight.
    Contour,
    /// Contour plus draggable node and click-to-insert midnode handles.
    Nodes,
}
