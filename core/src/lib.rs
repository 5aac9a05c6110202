//! LOGIFLOW core
//!
//! Edmonds-Karp maximum flow over a residual graph keyed by arbitrary node
//! labels, per-edge flow extraction with saturation flags, and per-node flow
//! decomposition that attributes store deliveries to the terminals that
//! supplied them.
//!
//! Everything runs sequentially; each solve exclusively owns the graph it
//! mutates and each decomposition builds its own short-lived graph.
//!
//! ```
//! use logiflow_core::ResidualGraph;
//!
//! let mut graph = ResidualGraph::new();
//! graph.add_edge("S", "A", 10).unwrap();
//! graph.add_edge("S", "B", 5).unwrap();
//! graph.add_edge("A", "T", 8).unwrap();
//! graph.add_edge("B", "T", 10).unwrap();
//! assert_eq!(graph.max_flow(&"S", &"T").unwrap(), 13);
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod config;
pub mod data_structures;
pub mod logistics;

pub use crate::algorithm::graph::{
    find_augmenting_path, Attribution, Decomposition, EdgeFlow, FlowDecomposer, FlowMetrics, FlowPath,
    MaxFlowResult, MaxFlowSolver, ParentMap, UNBOUNDED_CAPACITY,
};
pub use crate::algorithm::traits::{Capacity, FlowError, FlowResult, Label, NodeId};
pub use crate::config::SolverConfig;
pub use crate::data_structures::residual::{EdgeKey, ResidualGraph};
pub use crate::logistics::{reference_network, DistributionNetwork, DistributionReport};
