//! Core type definitions shared by the flow engine
//!
//! Node identifiers, the capacity scalar, the label bound every graph
//! is generic over, and the error taxonomy of the engine.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Capacity and flow scalar.
///
/// Signed so that negative input can be detected and rejected at the
/// insertion boundary instead of being unrepresentable.
pub type Capacity = i64;

/// Dense node identifier assigned in first-insertion order
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// Bound for node labels: opaque, hashable, comparable for equality.
pub trait Label: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Label for T {}

/// Flow engine errors
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Invalid capacity {capacity}: capacities must be non-negative")]
    InvalidCapacity { capacity: Capacity },

    #[error("Capacity overflow on edge {origin} -> {destination}")]
    CapacityOverflow { origin: String, destination: String },

    #[error("Unbounded capacity sentinel {sentinel} does not dominate real capacity {required}")]
    UnboundedTooSmall { sentinel: Capacity, required: Capacity },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Duplicate node: {0}")]
    DuplicateNode(String),

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the engine
pub type FlowResult<T> = Result<T, FlowError>;
