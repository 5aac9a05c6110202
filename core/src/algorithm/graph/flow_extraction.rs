//! Per-edge flow projection of a solved residual graph
//!
//! Flow on a declared edge is whatever part of its original capacity is no
//! longer available as residual capacity, clamped at zero so edges that only
//! ever served as reverse edges report nothing.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Capacity, Label, NodeId};
use crate::data_structures::residual::ResidualGraph;

/// Flow carried by one declared edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFlow<L> {
    pub origin: L,
    pub destination: L,
    /// Units consumed by the solve
    pub flow: Capacity,
    /// Declared (original) capacity
    pub capacity: Capacity,
}

impl<L> EdgeFlow<L> {
    /// Whether the whole declared capacity is in use
    pub fn is_saturated(&self) -> bool {
        self.flow == self.capacity
    }
}

impl<L: Label> ResidualGraph<L> {
    /// `max(0, original − residual)` for the pair, 0 if absent
    pub fn edge_flow(&self, origin: &L, destination: &L) -> Capacity {
        (self.original(origin, destination) - self.residual(origin, destination)).max(0)
    }

    pub fn edge_flow_by_id(&self, origin: NodeId, destination: NodeId) -> Capacity {
        (self.original_by_id(origin, destination) - self.residual_by_id(origin, destination)).max(0)
    }

    /// Every edge declared with positive capacity, in first-insertion order
    pub fn flows(&self) -> Vec<EdgeFlow<L>> {
        self.declared_edges()
            .filter_map(|key| {
                let capacity = self.original_by_id(key.origin, key.destination);
                if capacity <= 0 {
                    return None;
                }
                Some(EdgeFlow {
                    origin: self.label(key.origin)?.clone(),
                    destination: self.label(key.destination)?.clone(),
                    flow: self.edge_flow_by_id(key.origin, key.destination),
                    capacity,
                })
            })
            .collect()
    }

    /// Total flow on declared edges entering `node`
    pub fn inflow(&self, node: &L) -> Capacity {
        let Some(target) = self.node_id(node) else {
            return 0;
        };
        self.declared_edges()
            .filter(|key| key.destination == target)
            .map(|key| self.edge_flow_by_id(key.origin, key.destination))
            .sum()
    }

    /// Total flow on declared edges leaving `node`
    pub fn outflow(&self, node: &L) -> Capacity {
        let Some(origin) = self.node_id(node) else {
            return 0;
        };
        self.declared_edges()
            .filter(|key| key.origin == origin)
            .map(|key| self.edge_flow_by_id(key.origin, key.destination))
            .sum()
    }
}
