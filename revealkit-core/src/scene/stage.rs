use std::collections::BTreeMap;

use crate::foundation::{
    core::{Rect, SectionId},
    error::{RevealError, RevealResult},
};

/// Generational handle to a rendered node.
///
/// A handle outlives its node: once the node is removed, every lookup through the stale handle
/// misses, even if the slot is reused.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Live visual state of a node, written by transitions and read by the host.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Style {
    /// Horizontal translation in px.
    pub x: f64,
    /// Vertical translation in px.
    pub y: f64,
    /// Rotation in degrees. Unbounded.
    pub rotation: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Whether the node participates in rendering at all.
    pub visible: bool,
    /// Vertical offset that keeps a pinned node in place while the document scrolls.
    pub pin_y: f64,
    /// Background image URL, if any.
    pub background: Option<String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            opacity: 1.0,
            visible: true,
            pin_y: 0.0,
            background: None,
        }
    }
}

/// A rendered element: a label for diagnostics, its document-space layout box and live style.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Node {
    /// Human-readable label (class name, row key).
    pub label: String,
    /// Untransformed layout box in document coordinates.
    pub layout: Rect,
    /// Live style.
    pub style: Style,
}

#[derive(Debug)]
enum Slot {
    Occupied { generation: u32, node: Node },
    Vacant { generation: u32 },
}

/// Arena of rendered nodes the core animates.
///
/// Static layout is owned by the host; the core only reads `layout` and writes `style`.
#[derive(Debug, Default)]
pub struct Stage {
    slots: Vec<Slot>,
    free: Vec<u32>,
    leases: BTreeMap<NodeId, SectionId>,
}

impl Stage {
    /// Empty stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a node with default style.
    pub fn insert(&mut self, label: impl Into<String>, layout: Rect) -> NodeId {
        let node = Node {
            label: label.into(),
            layout,
            style: Style::default(),
        };

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            let generation = match slot {
                Slot::Vacant { generation } => generation.wrapping_add(1),
                Slot::Occupied { generation, .. } => generation.wrapping_add(1),
            };
            *slot = Slot::Occupied { generation, node };
            return NodeId { index, generation };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot::Occupied {
            generation: 0,
            node,
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Detach a node. Any lease on it is dropped with it.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.get(id)?;
        let vacant = Slot::Vacant {
            generation: id.generation,
        };
        let Slot::Occupied { node, .. } = std::mem::replace(&mut self.slots[id.index as usize], vacant)
        else {
            return None;
        };
        self.free.push(id.index);
        self.leases.remove(&id);
        Some(node)
    }

    /// Whether `id` still refers to an attached node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Look up an attached node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        match self.slots.get(id.index as usize)? {
            Slot::Occupied { generation, node } if *generation == id.generation => Some(node),
            _ => None,
        }
    }

    /// Look up an attached node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        match self.slots.get_mut(id.index as usize)? {
            Slot::Occupied { generation, node } if *generation == id.generation => Some(node),
            _ => None,
        }
    }

    /// Like [`Stage::get`], but a missing node is an error.
    pub fn require(&self, id: NodeId) -> RevealResult<&Node> {
        self.get(id)
            .ok_or_else(|| RevealError::detached(format!("{id:?} is not attached")))
    }

    /// Current style of an attached node.
    pub fn style(&self, id: NodeId) -> Option<&Style> {
        self.get(id).map(|n| &n.style)
    }

    /// Mutable style of an attached node.
    pub fn style_mut(&mut self, id: NodeId) -> Option<&mut Style> {
        self.get_mut(id).map(|n| &mut n.style)
    }

    /// Replace the layout box of an attached node. Returns `false` if detached.
    pub fn set_layout(&mut self, id: NodeId, layout: Rect) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.layout = layout;
                true
            }
            None => false,
        }
    }

    /// Number of attached nodes.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Occupied { .. }))
            .count()
    }

    /// Whether no nodes are attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate attached nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Occupied { generation, node } => Some((
                    NodeId {
                        index: index as u32,
                        generation: *generation,
                    },
                    node,
                )),
                Slot::Vacant { .. } => None,
            })
    }

    /// Grant `owner` exclusive use of `node`. Re-leasing to the current owner is a no-op.
    pub fn lease(&mut self, node: NodeId, owner: SectionId) -> RevealResult<()> {
        self.require(node)?;
        match self.leases.get(&node) {
            Some(current) if *current != owner => Err(RevealError::panel_busy(format!(
                "{node:?} is held by {current}"
            ))),
            _ => {
                self.leases.insert(node, owner);
                Ok(())
            }
        }
    }

    /// Release a lease held by `owner`. Returns `false` if `owner` did not hold it.
    pub fn release(&mut self, node: NodeId, owner: SectionId) -> bool {
        if self.leases.get(&node) == Some(&owner) {
            self.leases.remove(&node);
            true
        } else {
            false
        }
    }

    /// Current lease holder of `node`.
    pub fn lease_holder(&self, node: NodeId) -> Option<SectionId> {
        self.leases.get(&node).copied()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/stage.rs"]
mod tests;
