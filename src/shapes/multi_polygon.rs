// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Multi-polygon shape: one logical region split into disjoint parts.
//!
//! Owns an ordered collection of independent [`PolygonShape`] instances,
//! one per vertex-group of the source geometry, and forwards shared visual
//! state (color, display mode, viewport) to each of them. Sub-shape
//! specific edits (dragging a single vertex, inserting a midpoint) act
//! directly on the owning sub-shape; sub-shapes may overlap freely.

use crate::models::ShapeData;
use crate::render::{NodeId, Surface, Viewport};

use super::{DisplayState, PolygonShape};

/// A shape made of disjoint closed polygons, e.g. an object split in the
/// image.
pub struct MultiPolygonShape {
    id: String,
    color: u32,
    state: DisplayState,
    root: NodeId,
    sub_shapes: Vec<PolygonShape>,
}

impl MultiPolygonShape {
    /// Mount a multi-polygon into the scene under `parent`, building one
    /// sub-shape per vertex-group of `data.geometry.mvertices`.
    pub fn new(data: &ShapeData, surface: &mut dyn Surface, parent: Option<NodeId>) -> Self {
        let root = surface.create_node(parent);
        let groups = data.geometry.mvertices.clone().unwrap_or_default();
        let sub_shapes = groups
            .into_iter()
            .map(|vertices| {
                let sub = ShapeData::polygon(data.id.clone(), data.color, vertices, false);
                PolygonShape::new(sub, surface, Some(root))
            })
            .collect();
        Self {
            id: data.id.clone(),
            color: data.color,
            state: DisplayState::None,
            root,
            sub_shapes,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn set_color(&mut self, color: u32) {
        self.color = color;
    }

    pub fn display_state(&self) -> DisplayState {
        self.state
    }

    pub fn set_display_state(&mut self, state: DisplayState) {
        self.state = state;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn sub_shapes(&self) -> &[PolygonShape] {
        &self.sub_shapes
    }

    /// Mutable access for sub-shape specific edits.
    pub fn sub_shapes_mut(&mut self) -> &mut [PolygonShape] {
        &mut self.sub_shapes
    }

    /// Interchange snapshot, regrouping the sub-shapes' vertex sequences.
    pub fn to_data(&self) -> ShapeData {
        ShapeData::multi_polygon(
            self.id.clone(),
            self.color,
            self.sub_shapes
                .iter()
                .map(|s| s.vertices().to_vec())
                .collect(),
        )
    }

    /// Forward shared color and viewport to every sub-shape and redraw.
    ///
    /// Sub-shapes render as contours unless the multi-shape itself is
    /// hidden.
    pub fn draw(&mut self, surface: &mut dyn Surface, viewport: &Viewport) {
        let sub_state = if self.state == DisplayState::None {
            DisplayState::None
        } else {
            DisplayState::Contour
        };
        for shape in &mut self.sub_shapes {
            shape.set_display_state(sub_state);
            shape.set_color(self.color);
            shape.draw(surface, viewport);
        }
    }

    /// Tear down the sub-shapes and the container node.
    pub fn destroy(&mut self, surface: &mut dyn Surface) {
        for shape in &mut self.sub_shapes {
            shape.destroy(surface);
        }
        self.sub_shapes.clear();
        surface.destroy_node(self.root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::RecordingSurface;

    fn two_parts() -> ShapeData {
        ShapeData::multi_polygon(
            "m1",
            0x00ff00,
            vec![
                vec![0.0, 0.0, 0.4, 0.0, 0.4, 0.4],
                vec![0.6, 0.6, 0.9, 0.6, 0.9, 0.9, 0.6, 0.9],
            ],
        )
    }

    #[test]
    fn test_builds_one_sub_shape_per_group() {
        let mut surface = RecordingSurface::new();
        let multi = MultiPolygonShape::new(&two_parts(), &mut surface, None);
        assert_eq!(multi.sub_shapes().len(), 2);
        assert_eq!(multi.sub_shapes()[0].num_points(), 3);
        assert_eq!(multi.sub_shapes()[1].num_points(), 4);
        assert_eq!(multi.sub_shapes()[0].id(), "m1");
    }

    #[test]
    fn test_draw_forwards_state_and_color() {
        let mut surface = RecordingSurface::new();
        let vp = Viewport::new(100.0, 100.0);
        let mut multi = MultiPolygonShape::new(&two_parts(), &mut surface, None);

        multi.set_display_state(DisplayState::Nodes);
        multi.set_color(0x0000ff);
        multi.draw(&mut surface, &vp);
        for sub in multi.sub_shapes() {
            assert_eq!(sub.display_state(), DisplayState::Contour);
            assert_eq!(sub.color(), 0x0000ff);
        }

        multi.set_display_state(DisplayState::None);
        multi.draw(&mut surface, &vp);
        for sub in multi.sub_shapes() {
            assert_eq!(sub.display_state(), DisplayState::None);
        }
    }

    #[test]
    fn test_sub_shape_edit_applies_locally() {
        let mut surface = RecordingSurface::new();
        let vp = Viewport::new(100.0, 100.0);
        let mut multi = MultiPolygonShape::new(&two_parts(), &mut surface, None);

        multi.sub_shapes_mut()[1].insert_mid_node(0);
        multi.draw(&mut surface, &vp);
        assert_eq!(multi.sub_shapes()[0].num_points(), 3);
        assert_eq!(multi.sub_shapes()[1].num_points(), 5);

        let data = multi.to_data();
        let groups = data.geometry.mvertices.unwrap();
        assert_eq!(groups[1].len(), 10);
    }

    #[test]
    fn test_destroy_tears_down_everything() {
        let mut surface = RecordingSurface::new();
        let mut multi = MultiPolygonShape::new(&two_parts(), &mut surface, None);
        assert!(surface.live_count() > 0);
        multi.destroy(&mut surface);
        assert_eq!(surface.live_count(), 0);
    }
}
