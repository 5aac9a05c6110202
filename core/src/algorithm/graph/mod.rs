//! Maximum flow, flow extraction and flow decomposition
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod max_flow;
pub mod flow_extraction;
pub mod decomposition;

pub use self::max_flow::{find_augmenting_path, FlowMetrics, FlowPath, MaxFlowResult, MaxFlowSolver, ParentMap};
pub use self::flow_extraction::EdgeFlow;
pub use self::decomposition::{Attribution, Decomposition, FlowDecomposer, UNBOUNDED_CAPACITY};
