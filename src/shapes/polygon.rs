// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Polygon shape: geometry, interactive handles and draw-state derivation.
//!
//! A [`PolygonShape`] owns a flat vertex sequence with an open/closed flag
//! and keeps two arenas of interactive handles in sync with it: one node
//! handle per vertex (dragging) and one midnode handle per edge midpoint
//! (click-to-insert). Handle arenas are resynchronized on every draw, so no
//! draw ever observes a stale handle count.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::models::ShapeData;
use crate::render::{
    Cursor, HitArea, NodeEvent, NodeId, PointerEventKind, Surface, Viewport,
};
use crate::util::geometry;

use super::DisplayState;

/// Handler bound to node or midnode handles; receives the handle's index.
pub type NodeHandler = Rc<dyn Fn(&NodeEvent)>;

/// Half-thickness, in device pixels, of the hit band around an open
/// polyline.
const OPEN_HIT_THICKNESS: f64 = 10.0;

/// An editable (possibly open) polygon mounted into the scene.
pub struct PolygonShape {
    data: ShapeData,
    state: DisplayState,
    root: NodeId,
    area: NodeId,
    box_node: NodeId,
    node_container: NodeId,
    nodes: Vec<NodeId>,
    midnodes: Vec<NodeId>,
    node_listeners: BTreeMap<PointerEventKind, NodeHandler>,
    midnode_listeners: BTreeMap<PointerEventKind, NodeHandler>,
}

impl PolygonShape {
    /// Mount a polygon into the scene under `parent`.
    ///
    /// Assumes `data.geometry.vertices` has even length; incoming payloads
    /// are validated beforehand via [`crate::models::Geometry::from_data`].
    pub fn new(data: ShapeData, surface: &mut dyn Surface, parent: Option<NodeId>) -> Self {
        debug_assert!(data.geometry.vertices.len() % 2 == 0);
        let root = surface.create_node(parent);
        let area = surface.create_node(Some(root));
        let box_node = surface.create_node(Some(root));
        let node_container = surface.create_node(Some(root));
        let mut shape = Self {
            data,
            state: DisplayState::None,
            root,
            area,
            box_node,
            node_container,
            nodes: Vec::new(),
            midnodes: Vec::new(),
            node_listeners: BTreeMap::new(),
            midnode_listeners: BTreeMap::new(),
        };
        shape.create_nodes(surface);
        shape
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub fn color(&self) -> u32 {
        self.data.color
    }

    pub fn set_color(&mut self, color: u32) {
        self.data.color = color;
    }

    pub fn display_state(&self) -> DisplayState {
        self.state
    }

    pub fn set_display_state(&mut self, state: DisplayState) {
        self.state = state;
    }

    /// Is the polygon actually a polyline?
    pub fn is_open(&self) -> bool {
        self.data.geometry.is_opened
    }

    pub fn set_open(&mut self, is_opened: bool) {
        self.data.geometry.is_opened = is_opened;
    }

    pub fn vertices(&self) -> &[f64] {
        &self.data.geometry.vertices
    }

    pub fn num_points(&self) -> usize {
        self.data.geometry.vertices.len() / 2
    }

    /// Last stored point, the live preview point while drawing.
    pub fn last_point(&self) -> Option<(f64, f64)> {
        let v = &self.data.geometry.vertices;
        if v.len() < 2 {
            None
        } else {
            Some((v[v.len() - 2], v[v.len() - 1]))
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn midnodes(&self) -> &[NodeId] {
        &self.midnodes
    }

    /// Interchange snapshot of the shape.
    pub fn to_data(&self) -> ShapeData {
        self.data.clone()
    }

    /// Append a vertex, unless the new point rounds to the same device
    /// pixel as an already stored point.
    ///
    /// The last stored point is excluded from the comparison: while drawing
    /// it is the live preview point that follows the cursor. A rejected
    /// push is a logged no-op.
    pub fn push_node(&mut self, x: f64, y: f64, viewport: &Viewport) {
        let v = &self.data.geometry.vertices;
        let sx = (x * viewport.scale_x).round();
        let sy = (y * viewport.scale_y).round();
        let compare_len = v.len().saturating_sub(2);
        for pair in v[..compare_len].chunks_exact(2) {
            if (pair[0] * viewport.scale_x).round() == sx
                && (pair[1] * viewport.scale_y).round() == sy
            {
                log::warn!("push_node: same location as an existing point, abort");
                return;
            }
        }
        self.data.geometry.vertices.push(x);
        self.data.geometry.vertices.push(y);
    }

    /// Remove the ultimate (`is_last`) or penultimate point.
    pub fn pop_node(&mut self, is_last: bool) {
        let v = &mut self.data.geometry.vertices;
        if is_last {
            if v.len() >= 2 {
                v.truncate(v.len() - 2);
            }
        } else if v.len() >= 4 {
            let at = v.len() - 4;
            v.drain(at..at + 2);
        }
    }

    /// Insert the midpoint of the edge starting at point `idx`.
    pub fn insert_mid_node(&mut self, idx: usize) {
        self.data.geometry.vertices =
            geometry::insert_mid_node(&self.data.geometry.vertices, idx);
    }

    /// Delete point `idx`, shifting subsequent points down.
    pub fn remove_node(&mut self, idx: usize) {
        if idx >= self.num_points() {
            log::warn!("remove_node: index {} out of range, ignored", idx);
            return;
        }
        self.data.geometry.vertices.drain(idx * 2..idx * 2 + 2);
    }

    /// Move point `idx` to a new position.
    pub fn set_node(&mut self, idx: usize, x: f64, y: f64) {
        if idx >= self.num_points() {
            log::warn!("set_node: index {} out of range, ignored", idx);
            return;
        }
        self.data.geometry.vertices[idx * 2] = x;
        self.data.geometry.vertices[idx * 2 + 1] = y;
    }

    /// Replace the whole vertex sequence.
    pub fn set_geometry(&mut self, vertices: Vec<f64>) {
        if vertices.len() % 2 != 0 {
            log::warn!(
                "set_geometry: odd vertex sequence of length {}, ignored",
                vertices.len()
            );
            return;
        }
        self.data.geometry.vertices = vertices;
    }

    /// Geometric validity of the shape.
    ///
    /// An open polyline only needs two points. A closed polygon needs at
    /// least three points, must not self-intersect and its scaled bounding
    /// box must span at least one device pixel on both axes.
    pub fn is_valid(&self, viewport: &Viewport) -> bool {
        let v = &self.data.geometry.vertices;
        if self.is_open() {
            return v.len() > 3;
        }
        if v.len() < 6 {
            return false;
        }
        if !geometry::is_valid(v) {
            return false;
        }
        let b = geometry::bounds(v);
        (b[3] - b[1]) * viewport.scale_y >= 1.0 && (b[2] - b[0]) * viewport.scale_x >= 1.0
    }

    /// Register a handler for a pointer event kind on every node handle.
    pub fn add_node_listener(
        &mut self,
        surface: &mut dyn Surface,
        kind: PointerEventKind,
        handler: NodeHandler,
    ) {
        self.node_listeners.insert(kind, handler);
        self.apply_node_listeners(surface);
    }

    /// Register a handler for a pointer event kind on every midnode handle.
    pub fn add_midnode_listener(
        &mut self,
        surface: &mut dyn Surface,
        kind: PointerEventKind,
        handler: NodeHandler,
    ) {
        self.midnode_listeners.insert(kind, handler);
        self.apply_midnode_listeners(surface);
    }

    /// Drop all node and midnode listeners.
    pub fn remove_node_listeners(&mut self, surface: &mut dyn Surface) {
        self.midnode_listeners.clear();
        self.node_listeners.clear();
        self.apply_midnode_listeners(surface);
        self.apply_node_listeners(surface);
    }

    // Re-application protocol: on every listener-set change, clear all
    // handlers bound on each handle and re-bind the current set, wrapping
    // each handler so the delivered event carries the handle's index.
    fn apply_node_listeners(&self, surface: &mut dyn Surface) {
        for (idx, &node) in self.nodes.iter().enumerate() {
            surface.remove_listeners(node);
            surface.set_interactive(node, false, Cursor::Default);
            for (&kind, handler) in &self.node_listeners {
                surface.set_interactive(node, true, Cursor::Grab);
                let handler = Rc::clone(handler);
                surface.on(
                    node,
                    kind,
                    Rc::new(move |evt| {
                        handler(&NodeEvent {
                            node_idx: idx,
                            pointer: *evt,
                        })
                    }),
                );
            }
        }
    }

    fn apply_midnode_listeners(&self, surface: &mut dyn Surface) {
        for (idx, &node) in self.midnodes.iter().enumerate() {
            surface.remove_listeners(node);
            surface.set_interactive(node, false, Cursor::Default);
            for (&kind, handler) in &self.midnode_listeners {
                surface.set_interactive(node, true, Cursor::Cell);
                let handler = Rc::clone(handler);
                surface.on(
                    node,
                    kind,
                    Rc::new(move |evt| {
                        handler(&NodeEvent {
                            node_idx: idx,
                            pointer: *evt,
                        })
                    }),
                );
            }
        }
    }

    /// One midnode per edge: one per vertex when closed, one fewer when
    /// open.
    fn expected_midnodes(&self) -> usize {
        let n = self.num_points();
        if self.is_open() {
            n.saturating_sub(1)
        } else {
            n
        }
    }

    fn create_nodes(&mut self, surface: &mut dyn Surface) {
        self.nodes = (0..self.num_points())
            .map(|_| surface.create_node(Some(self.node_container)))
            .collect();
        self.midnodes = (0..self.expected_midnodes())
            .map(|_| surface.create_node(Some(self.node_container)))
            .collect();
        self.apply_node_listeners(surface);
        self.apply_midnode_listeners(surface);
    }

    fn delete_nodes(&mut self, surface: &mut dyn Surface) {
        for node in self.nodes.drain(..) {
            surface.destroy_node(node);
        }
        for node in self.midnodes.drain(..) {
            surface.destroy_node(node);
        }
    }

    /// Tear down every scene node owned by the shape.
    pub fn destroy(&mut self, surface: &mut dyn Surface) {
        self.delete_nodes(surface);
        surface.destroy_node(self.node_container);
        surface.destroy_node(self.box_node);
        surface.destroy_node(self.area);
        surface.destroy_node(self.root);
    }

    /// Vertices in rounded device-pixel coordinates.
    fn screen_points(&self, viewport: &Viewport) -> Vec<f64> {
        self.data
            .geometry
            .vertices
            .iter()
            .enumerate()
            .map(|(idx, &c)| {
                if idx % 2 == 0 {
                    (c * viewport.scale_x).round()
                } else {
                    (c * viewport.scale_y).round()
                }
            })
            .collect()
    }

    /// Thickened hit band around an open polyline: the points shifted by
    /// (-th,-th) in order, then by (+th,+th) in reverse order.
    fn open_hit_area(points: &[f64]) -> HitArea {
        let th = OPEN_HIT_THICKNESS;
        let mut out: Vec<f64> = points.iter().map(|c| c - th).collect();
        for pair in points.chunks_exact(2).rev() {
            out.push(pair[0] + th);
            out.push(pair[1] + th);
        }
        HitArea::Polygon { points: out }
    }

    fn outline(&self, surface: &mut dyn Surface, points: &[f64], flat_len: usize) {
        if flat_len == 4 {
            surface.move_to(self.area, points[0], points[1]);
            surface.line_to(self.area, points[2], points[3]);
        } else if flat_len > 4 && self.is_open() {
            // Each intermediate segment drawn individually so an open
            // shape never implicitly closes.
            for i in (0..=flat_len - 4).step_by(2) {
                surface.move_to(self.area, points[i], points[i + 1]);
                surface.line_to(self.area, points[i + 2], points[i + 3]);
            }
        } else if flat_len > 4 {
            surface.draw_polygon(self.area, points);
        }
    }

    /// Recompute and issue the shape's draw calls for the current display
    /// state, resynchronizing handle arenas with the vertex count first.
    pub fn draw(&mut self, surface: &mut dyn Surface, viewport: &Viewport) {
        let flat_len = self.data.geometry.vertices.len();
        let mut points = self.screen_points(viewport);
        if !self.is_open() && flat_len >= 2 {
            // Closes the outline with a last point equal to the first.
            points.push(points[0]);
            points.push(points[1]);
        }

        surface.clear(self.area);
        surface.line_style(self.area, 1.0, self.data.color, 1.0);
        if flat_len == 4 {
            surface.move_to(self.area, points[0], points[1]);
            surface.line_to(self.area, points[2], points[3]);
            if self.is_open() {
                surface.set_hit_area(self.area, Self::open_hit_area(&points));
            }
        } else if flat_len > 4 && self.is_open() {
            for i in (0..=flat_len - 4).step_by(2) {
                surface.move_to(self.area, points[i], points[i + 1]);
                surface.line_to(self.area, points[i + 2], points[i + 3]);
            }
            surface.set_hit_area(self.area, Self::open_hit_area(&points));
        } else if flat_len > 4 {
            surface.begin_fill(self.area, self.data.color, 0.15);
            surface.draw_polygon(self.area, &points);
            surface.end_fill(self.area);
        }
        surface.clear(self.box_node);

        if self.nodes.len() != flat_len / 2 || self.midnodes.len() != self.expected_midnodes() {
            self.delete_nodes(surface);
            self.create_nodes(surface);
        } else {
            for &node in &self.nodes {
                surface.clear(node);
            }
            for &node in &self.midnodes {
                surface.clear(node);
            }
        }

        match self.state {
            DisplayState::Box => {
                self.draw_box(surface, viewport);
            }
            DisplayState::Contour | DisplayState::Nodes => {
                surface.set_visible(self.node_container, true);
                surface.line_style(self.area, 1.0, 0xffffff, 1.0);
                self.outline(surface, &points, flat_len);
                if self.state == DisplayState::Nodes {
                    self.draw_handles(surface, viewport, &points);
                }
            }
            DisplayState::None => {
                surface.set_visible(self.node_container, false);
                surface.set_interactive(self.node_container, false, Cursor::Default);
            }
        }
    }

    fn draw_box(&self, surface: &mut dyn Surface, viewport: &Viewport) {
        let b = geometry::bounds(&self.data.geometry.vertices);
        if b[0] > b[2] {
            return; // no extent
        }
        let x0 = (b[0] * viewport.scale_x).round();
        let y0 = (b[1] * viewport.scale_y).round();
        let x1 = (b[2] * viewport.scale_x).round();
        let y1 = (b[3] * viewport.scale_y).round();
        surface.line_style(self.box_node, 1.0, 0xffffff, 1.0);
        surface.draw_polygon(self.box_node, &[x0, y0, x1, y0, x1, y1, x0, y1, x0, y0]);
    }

    // Node and midnode circles are scaled by the inverse viewport zoom so
    // their on-screen size stays constant.
    fn draw_handles(&self, surface: &mut dyn Surface, viewport: &Viewport, points: &[f64]) {
        let inv_zx = 1.5 / viewport.zoom_x;
        let inv_zy = 1.5 / viewport.zoom_y;
        let v = &self.data.geometry.vertices;
        for (i, &node) in self.nodes.iter().enumerate() {
            surface.begin_fill(node, 0xa6d8e7, 1.0);
            surface.line_style(node, 1.0, 0x426eff, 1.0);
            surface.draw_circle(node, 0.0, 0.0, 4.0);
            surface.end_fill(node);
            surface.set_position(
                node,
                (v[i * 2] * viewport.scale_x).round(),
                (v[i * 2 + 1] * viewport.scale_y).round(),
            );
            surface.set_scale(node, inv_zx, inv_zy);
            surface.set_visible(node, true);
        }
        for (i, &node) in self.midnodes.iter().enumerate() {
            surface.set_interactive(node, true, Cursor::Cell);
            surface.begin_fill(node, 0x000000, 1.0);
            surface.line_style(node, 1.0, self.data.color, 1.0);
            surface.draw_circle(node, 0.0, 0.0, 3.0);
            surface.end_fill(node);
            surface.set_hit_area(
                node,
                HitArea::Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: 4.0,
                },
            );
            // For closed shapes the appended closing pair makes the last
            // edge midpoint well-defined.
            surface.set_position(
                node,
                0.5 * (points[2 * i] + points[2 * i + 2]),
                0.5 * (points[2 * i + 1] + points[2 * i + 3]),
            );
            surface.set_scale(node, inv_zx, inv_zy);
            surface.set_visible(node, true);
        }
    }
}
