//! Residual graph store
//!
//! Edge-keyed capacity table holding, for every ordered node pair, the live
//! residual capacity alongside the accumulated original capacity. Labels are
//! interned into dense [`NodeId`]s and adjacency is kept in first-insertion
//! order, which fixes the enumeration order seen by the augmenting path
//! search.
//!
//! Reads never create entries: an absent pair is reported as capacity 0.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Capacity, FlowError, FlowResult, Label, NodeId};

/// Ordered (origin, destination) pair identifying a directed edge
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub origin: NodeId,
    pub destination: NodeId,
}

impl EdgeKey {
    #[inline]
    pub fn new(origin: NodeId, destination: NodeId) -> Self {
        Self { origin, destination }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        Self::new(self.destination, self.origin)
    }
}

/// Capacity record stored per directed edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityRecord {
    /// Remaining capacity in the residual graph
    pub residual: Capacity,
    /// Sum of every capacity declared for this pair; fixed once solving starts
    pub original: Capacity,
    /// Whether the pair was ever passed to `add_edge` (as opposed to existing
    /// only as a reverse edge)
    pub declared: bool,
}

/// Residual graph over arbitrary labels
#[derive(Debug, Clone)]
pub struct ResidualGraph<L> {
    labels: Vec<L>,
    index: HashMap<L, NodeId>,
    adjacency: Vec<Vec<NodeId>>,
    edges: HashMap<EdgeKey, CapacityRecord>,
    /// Pairs passed to `add_edge`, in first-insertion order
    declared: Vec<EdgeKey>,
}

impl<L: Label> Default for ResidualGraph<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Label> ResidualGraph<L> {
    pub fn new() -> Self {
        Self {
            labels: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
            edges: HashMap::new(),
            declared: Vec::new(),
        }
    }

    /// Add `capacity` units from `origin` to `destination`.
    ///
    /// Both directions are guaranteed to exist afterwards; a newly created
    /// direction starts with residual capacity 0. Repeated calls for the
    /// same ordered pair accumulate. The reverse pair's original capacity is
    /// left untouched.
    ///
    /// Fails with [`FlowError::InvalidCapacity`] on negative input and with
    /// [`FlowError::CapacityOverflow`] if accumulation would overflow; in
    /// both cases the graph is left exactly as it was.
    pub fn add_edge(&mut self, origin: L, destination: L, capacity: Capacity) -> FlowResult<()> {
        if capacity < 0 {
            return Err(FlowError::InvalidCapacity { capacity });
        }

        let current = self.record(&origin, &destination).unwrap_or_default();
        let (residual, original) = match (
            current.residual.checked_add(capacity),
            current.original.checked_add(capacity),
        ) {
            (Some(residual), Some(original)) => (residual, original),
            _ => {
                return Err(FlowError::CapacityOverflow {
                    origin: format!("{:?}", origin),
                    destination: format!("{:?}", destination),
                })
            }
        };

        let u = self.intern(origin);
        let v = self.intern(destination);
        let key = EdgeKey::new(u, v);

        self.ensure_pair(key);
        self.ensure_pair(key.reversed());

        if let Some(record) = self.edges.get_mut(&key) {
            record.residual = residual;
            record.original = original;
            if !record.declared {
                record.declared = true;
                self.declared.push(key);
            }
        }

        trace!("add_edge {:?} += {} (original now {})", key, capacity, original);
        Ok(())
    }

    /// Current residual capacity, 0 for an absent pair
    pub fn residual(&self, origin: &L, destination: &L) -> Capacity {
        self.record(origin, destination).map_or(0, |r| r.residual)
    }

    /// Accumulated original capacity, 0 for an absent pair
    pub fn original(&self, origin: &L, destination: &L) -> Capacity {
        self.record(origin, destination).map_or(0, |r| r.original)
    }

    pub fn node_id(&self, label: &L) -> Option<NodeId> {
        self.index.get(label).copied()
    }

    pub fn label(&self, id: NodeId) -> Option<&L> {
        self.labels.get(id.as_usize())
    }

    pub fn contains_node(&self, label: &L) -> bool {
        self.index.contains_key(label)
    }

    /// Node labels in insertion order
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of distinct ordered pairs passed to `add_edge`
    pub fn edge_count(&self) -> usize {
        self.declared.len()
    }

    /// Outgoing residual neighbours of `node`, in first-insertion order
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency
            .get(node.as_usize())
            .map_or(&[], |neighbors| neighbors.as_slice())
    }

    /// Declared pairs in first-insertion order
    pub fn declared_edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.declared.iter().copied()
    }

    pub fn residual_by_id(&self, origin: NodeId, destination: NodeId) -> Capacity {
        self.edges
            .get(&EdgeKey::new(origin, destination))
            .map_or(0, |r| r.residual)
    }

    pub fn original_by_id(&self, origin: NodeId, destination: NodeId) -> Capacity {
        self.edges
            .get(&EdgeKey::new(origin, destination))
            .map_or(0, |r| r.original)
    }

    /// Move `amount` units of residual capacity from `key` onto its reverse.
    ///
    /// Callers pass an amount no larger than the forward residual; both
    /// directions exist for any pair reachable through `neighbors`.
    /// Push `amount` along every hop of `path`.
    ///
    /// Every reverse credit is checked before anything is applied, so an
    /// overflow leaves the graph untouched.
    pub(crate) fn push_path(&mut self, path: &[NodeId], amount: Capacity) -> FlowResult<()> {
        for hop in path.windows(2) {
            let back = EdgeKey::new(hop[1], hop[0]);
            let current = self.edges.get(&back).map_or(0, |r| r.residual);
            if current.checked_add(amount).is_none() {
                return Err(self.overflow(back));
            }
        }

        for hop in path.windows(2) {
            let key = EdgeKey::new(hop[0], hop[1]);
            if let Some(forward) = self.edges.get_mut(&key) {
                forward.residual -= amount;
            }
            if let Some(backward) = self.edges.get_mut(&key.reversed()) {
                backward.residual += amount;
            }
        }
        Ok(())
    }

    pub(crate) fn overflow(&self, key: EdgeKey) -> FlowError {
        let name = |id: NodeId| self.label(id).map_or_else(|| format!("{:?}", id), |l| format!("{:?}", l));
        FlowError::CapacityOverflow {
            origin: name(key.origin),
            destination: name(key.destination),
        }
    }

    fn record(&self, origin: &L, destination: &L) -> Option<CapacityRecord> {
        let u = self.node_id(origin)?;
        let v = self.node_id(destination)?;
        self.edges.get(&EdgeKey::new(u, v)).copied()
    }

    fn intern(&mut self, label: L) -> NodeId {
        if let Some(&id) = self.index.get(&label) {
            return id;
        }
        let id = NodeId(self.labels.len());
        self.labels.push(label.clone());
        self.index.insert(label, id);
        self.adjacency.push(Vec::new());
        id
    }

    fn ensure_pair(&mut self, key: EdgeKey) {
        if self.edges.contains_key(&key) {
            return;
        }
        self.edges.insert(key, CapacityRecord::default());
        self.adjacency[key.origin.as_usize()].push(key.destination);
    }
}
