// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory rendering backend.
//!
//! Records every declarative call per node and can fire subscribed pointer
//! handlers, so shape drawing and handle synchronization are testable
//! without a real canvas.

use std::collections::BTreeMap;

use super::{Cursor, HitArea, NodeId, PointerEvent, PointerEventKind, PointerHandler, Surface};

/// One recorded draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    LineStyle { width: f64, color: u32, alpha: f64 },
    BeginFill { color: u32, alpha: f64 },
    EndFill,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    DrawPolygon { points: Vec<f64> },
    DrawCircle { x: f64, y: f64, radius: f64 },
}

/// Recorded state of one scene node.
#[derive(Debug, Clone)]
pub struct NodeState {
    pub parent: Option<NodeId>,
    pub alive: bool,
    pub position: (f64, f64),
    pub scale: (f64, f64),
    pub visible: bool,
    pub interactive: bool,
    pub cursor: Cursor,
    pub hit_area: Option<HitArea>,
    pub commands: Vec<DrawCommand>,
}

impl NodeState {
    fn new(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            alive: true,
            position: (0.0, 0.0),
            scale: (1.0, 1.0),
            visible: true,
            interactive: false,
            cursor: Cursor::Default,
            hit_area: None,
            commands: Vec::new(),
        }
    }
}

/// Headless [`Surface`] implementation.
#[derive(Default)]
pub struct RecordingSurface {
    next_id: u64,
    nodes: BTreeMap<NodeId, NodeState>,
    listeners: BTreeMap<(NodeId, PointerEventKind), Vec<PointerHandler>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded state of a node, destroyed ones included.
    pub fn node(&self, node: NodeId) -> Option<&NodeState> {
        self.nodes.get(&node)
    }

    /// Ids of live children of `parent`, in creation order.
    pub fn live_children(&self, parent: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, state)| state.alive && state.parent == Some(parent))
            .map(|(&id, _)| id)
            .collect()
    }

    /// Number of live nodes in the scene.
    pub fn live_count(&self) -> usize {
        self.nodes.values().filter(|s| s.alive).count()
    }

    /// Number of handlers subscribed on a node, all event kinds combined.
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners
            .iter()
            .filter(|((id, _), _)| *id == node)
            .map(|(_, handlers)| handlers.len())
            .sum()
    }

    /// Deliver a pointer event to every handler subscribed on `node` for
    /// the event's kind.
    pub fn fire(&self, node: NodeId, event: PointerEvent) {
        let handlers: Vec<PointerHandler> = self
            .listeners
            .get(&(node, event.kind))
            .map(|h| h.to_vec())
            .unwrap_or_default();
        for handler in handlers {
            handler(&event);
        }
    }
}

impl Surface for RecordingSurface {
    fn create_node(&mut self, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, NodeState::new(parent));
        id
    }

    fn destroy_node(&mut self, node: NodeId) {
        self.listeners.retain(|(id, _), _| *id != node);
        if let Some(state) = self.nodes.get_mut(&node) {
            state.alive = false;
            state.parent = None;
        }
    }

    fn clear(&mut self, node: NodeId) {
        if let Some(state) = self.nodes.get_mut(&node) {
            state.commands.clear();
        }
    }

    fn line_style(&mut self, node: NodeId, width: f64, color: u32, alpha: f64) {
        self.push(node, DrawCommand::LineStyle { width, color, alpha });
    }

    fn begin_fill(&mut self, node: NodeId, color: u32, alpha: f64) {
        self.push(node, DrawCommand::BeginFill { color, alpha });
    }

    fn end_fill(&mut self, node: NodeId) {
        self.push(node, DrawCommand::EndFill);
    }

    fn move_to(&mut self, node: NodeId, x: f64, y: f64) {
        self.push(node, DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, node: NodeId, x: f64, y: f64) {
        self.push(node, DrawCommand::LineTo { x, y });
    }

    fn draw_polygon(&mut self, node: NodeId, points: &[f64]) {
        self.push(
            node,
            DrawCommand::DrawPolygon {
                points: points.to_vec(),
            },
        );
    }

    fn draw_circle(&mut self, node: NodeId, x: f64, y: f64, radius: f64) {
        self.push(node, DrawCommand::DrawCircle { x, y, radius });
    }

    fn set_position(&mut self, node: NodeId, x: f64, y: f64) {
        if let Some(state) = self.nodes.get_mut(&node) {
            state.position = (x, y);
        }
    }

    fn set_scale(&mut self, node: NodeId, sx: f64, sy: f64) {
        if let Some(state) = self.nodes.get_mut(&node) {
            state.scale = (sx, sy);
        }
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        if let Some(state) = self.nodes.get_mut(&node) {
            state.visible = visible;
        }
    }

    fn set_hit_area(&mut self, node: NodeId, area: HitArea) {
        if let Some(state) = self.nodes.get_mut(&node) {
            state.hit_area = Some(area);
        }
    }

    fn set_interactive(&mut self, node: NodeId, interactive: bool, cursor: Cursor) {
        if let Some(state) = self.nodes.get_mut(&node) {
            state.interactive = interactive;
            state.cursor = cursor;
        }
    }

    fn on(&mut self, node: NodeId, kind: PointerEventKind, handler: PointerHandler) {
        self.listeners.entry((node, kind)).or_default().push(handler);
    }

    fn remove_listeners(&mut self, node: NodeId) {
        self.listeners.retain(|(id, _), _| *id != node);
    }
}

impl RecordingSurface {
    fn push(&mut self, node: NodeId, command: DrawCommand) {
        if let Some(state) = self.nodes.get_mut(&node) {
            state.commands.push(command);
        }
    }
}
