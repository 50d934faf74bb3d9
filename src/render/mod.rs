// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rendering backend contract.
//!
//! The engine never rasterizes anything itself: shapes issue declarative
//! draw calls against the [`Surface`] trait, which a host binds to its 2D
//! scene-graph or canvas library. [`recording::RecordingSurface`] is a
//! headless implementation used by this crate's tests and useful for host
//! unit tests.

use std::rc::Rc;

pub mod recording;

/// Opaque handle to a scene node owned by the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Pointer event kinds the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointerEventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    DoubleClick,
}

/// A raw pointer event in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self { kind, x, y }
    }
}

/// A pointer event delivered through a node or midnode handle, carrying the
/// handle's index so the owning controller can map it back to a vertex or
/// edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeEvent {
    pub node_idx: usize,
    pub pointer: PointerEvent,
}

/// Pointer cursor requested for an interactive node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Grab,
    Cell,
    Crosshair,
}

/// Hit-test region assigned to a scene node, in node-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum HitArea {
    Circle { x: f64, y: f64, radius: f64 },
    Polygon { points: Vec<f64> },
}

/// Current viewport transform, passed explicitly into draw and mutation
/// calls.
///
/// `scale_x`/`scale_y` map normalized geometry to device pixels; `zoom_x`/
/// `zoom_y` is the extra viewport zoom that handle sizes are divided by so
/// their on-screen size stays constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale_x: f64,
    pub scale_y: f64,
    pub zoom_x: f64,
    pub zoom_y: f64,
}

impl Viewport {
    pub fn new(scale_x: f64, scale_y: f64) -> Self {
        Self {
            scale_x,
            scale_y,
            zoom_x: 1.0,
            zoom_y: 1.0,
        }
    }

    pub fn with_zoom(mut self, zoom_x: f64, zoom_y: f64) -> Self {
        self.zoom_x = zoom_x;
        self.zoom_y = zoom_y;
        self
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Handler subscribed to a node's pointer events.
pub type PointerHandler = Rc<dyn Fn(&PointerEvent)>;

/// Capability set the engine requires from a 2D drawing surface.
///
/// All calls are declarative; the backend decides when pixels actually hit
/// the screen. Draw commands accumulate on a node until [`Surface::clear`].
pub trait Surface {
    /// Allocate a scene node, optionally parented into another node.
    fn create_node(&mut self, parent: Option<NodeId>) -> NodeId;
    /// Destroy a node, detaching it from its parent.
    fn destroy_node(&mut self, node: NodeId);
    /// Drop all accumulated draw commands on a node.
    fn clear(&mut self, node: NodeId);
    fn line_style(&mut self, node: NodeId, width: f64, color: u32, alpha: f64);
    fn begin_fill(&mut self, node: NodeId, color: u32, alpha: f64);
    fn end_fill(&mut self, node: NodeId);
    fn move_to(&mut self, node: NodeId, x: f64, y: f64);
    fn line_to(&mut self, node: NodeId, x: f64, y: f64);
    fn draw_polygon(&mut self, node: NodeId, points: &[f64]);
    fn draw_circle(&mut self, node: NodeId, x: f64, y: f64, radius: f64);
    fn set_position(&mut self, node: NodeId, x: f64, y: f64);
    fn set_scale(&mut self, node: NodeId, sx: f64, sy: f64);
    fn set_visible(&mut self, node: NodeId, visible: bool);
    fn set_hit_area(&mut self, node: NodeId, area: HitArea);
    fn set_interactive(&mut self, node: NodeId, interactive: bool, cursor: Cursor);
    /// Subscribe a handler to a pointer event kind on a node.
    fn on(&mut self, node: NodeId, kind: PointerEventKind, handler: PointerHandler);
    /// Remove every handler subscribed on a node.
    fn remove_listeners(&mut self, node: NodeId);
}
