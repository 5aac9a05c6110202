//! Terminal -> warehouse -> store distribution modelling
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod network;
pub mod report;
pub mod dataset;

pub use self::network::{DistributionNetwork, Link, NodeRole};
pub use self::report::{DistributionReport, EdgeFlowRow, NodeTotal, TerminalStoreFlow};
pub use self::dataset::reference_network;
