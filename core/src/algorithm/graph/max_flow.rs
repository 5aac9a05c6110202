//! Edmonds-Karp Maximum Flow Implementation
//!
//! Breadth-first augmenting path search over a [`ResidualGraph`] and the
//! Edmonds-Karp driver built on it. Each round finds one shortest (by hop
//! count) augmenting path, pushes its bottleneck forward and credits the same
//! amount to the paired reverse edges, so later rounds can undo earlier
//! choices.
//!
//! # Tie-breaking
//! Neighbours are examined in the graph's first-insertion order and the
//! search stops the instant the sink is discovered. Among several shortest
//! paths, the one returned is therefore fixed by construction order, which
//! in turn fixes the final per-edge assignment.
//!
//! # Complexity
//! At most O(V·E) augmentations of one O(E) search each, O(V·E²) overall.
//! Capacities are integral, so every round increases the total by at least
//! one unit and the loop terminates.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Capacity, FlowError, FlowResult, Label, NodeId};
use crate::data_structures::residual::ResidualGraph;

/// Discovery record of one breadth-first search.
///
/// The source maps to `None`; every other discovered node maps to the node
/// it was discovered from.
#[derive(Debug, Clone, Default)]
pub struct ParentMap {
    parents: HashMap<NodeId, Option<NodeId>>,
}

impl ParentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.parents.clear();
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.parents.contains_key(&node)
    }

    /// `None` if `node` was not discovered, `Some(None)` for the search root
    pub fn predecessor(&self, node: NodeId) -> Option<Option<NodeId>> {
        self.parents.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Node sequence from the search root to `target`
    pub fn path_to(&self, target: NodeId) -> Option<Vec<NodeId>> {
        let mut path = vec![target];
        let mut current = target;
        while let Some(parent) = self.predecessor(current)? {
            // A well-formed parent map is a tree; guard against cycles anyway.
            if path.len() > self.parents.len() {
                return None;
            }
            path.push(parent);
            current = parent;
        }
        path.reverse();
        Some(path)
    }

    fn discover(&mut self, node: NodeId, parent: Option<NodeId>) {
        self.parents.insert(node, parent);
    }
}

/// Search for an augmenting path from `source` to `sink`.
///
/// Clears and repopulates `parent`. Returns `false` when the sink is not
/// reachable through edges with positive residual capacity, or when either
/// label is unknown to the graph.
pub fn find_augmenting_path<L: Label>(
    graph: &ResidualGraph<L>,
    source: &L,
    sink: &L,
    parent: &mut ParentMap,
) -> bool {
    parent.clear();
    match (graph.node_id(source), graph.node_id(sink)) {
        (Some(s), Some(t)) => breadth_first_search(graph, s, t, parent).0,
        _ => false,
    }
}

/// Returns whether the sink was found and how many nodes were dequeued
fn breadth_first_search<L: Label>(
    graph: &ResidualGraph<L>,
    source: NodeId,
    sink: NodeId,
    parent: &mut ParentMap,
) -> (bool, usize) {
    parent.clear();
    parent.discover(source, None);

    let mut queue = VecDeque::from([source]);
    let mut dequeued = 0;

    while let Some(u) = queue.pop_front() {
        dequeued += 1;
        for &v in graph.neighbors(u) {
            if parent.contains(v) || graph.residual_by_id(u, v) <= 0 {
                continue;
            }
            parent.discover(v, Some(u));
            if v == sink {
                return (true, dequeued);
            }
            queue.push_back(v);
        }
    }

    (false, dequeued)
}

/// Nodes reachable from `source` over positive residual capacity.
///
/// After a completed solve this is the source side of a minimum cut.
pub fn residual_reachable<L: Label>(graph: &ResidualGraph<L>, source: NodeId) -> Vec<NodeId> {
    let mut seen = vec![false; graph.node_count()];
    let mut order = Vec::new();
    let mut queue = VecDeque::new();

    if source.as_usize() < seen.len() {
        seen[source.as_usize()] = true;
        queue.push_back(source);
    }

    while let Some(u) = queue.pop_front() {
        order.push(u);
        for &v in graph.neighbors(u) {
            if !seen[v.as_usize()] && graph.residual_by_id(u, v) > 0 {
                seen[v.as_usize()] = true;
                queue.push_back(v);
            }
        }
    }

    order
}

/// Flow path representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowPath<L> {
    /// Path vertices, source first
    pub path: Vec<L>,
    /// Flow amount along path
    pub flow: Capacity,
}

/// Flow algorithm performance metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// Number of augmenting paths applied
    pub augmentations: usize,
    /// Nodes dequeued across every breadth-first search
    pub nodes_dequeued: usize,
    /// Algorithm execution time
    pub execution_time_ms: f64,
}

/// Maximum flow result with detailed flow information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxFlowResult<L> {
    /// Maximum flow value
    pub max_flow: Capacity,
    /// Augmenting paths in the order they were applied
    pub augmenting_paths: Vec<FlowPath<L>>,
    /// Source side of the minimum cut
    pub min_cut: Vec<L>,
    pub metrics: FlowMetrics,
}

impl<L> MaxFlowResult<L> {
    fn empty() -> Self {
        Self {
            max_flow: 0,
            augmenting_paths: Vec::new(),
            min_cut: Vec::new(),
            metrics: FlowMetrics::default(),
        }
    }
}

/// Edmonds-Karp solver.
///
/// Strictly sequential; the graph is borrowed mutably for the whole solve.
#[derive(Debug, Clone, Default)]
pub struct MaxFlowSolver {
    metrics: FlowMetrics,
}

impl MaxFlowSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metrics of the most recent solve
    pub fn metrics(&self) -> &FlowMetrics {
        &self.metrics
    }

    /// Push as much flow as possible from `source` to `sink`.
    ///
    /// `source == sink` and labels unknown to the graph both yield a zero
    /// flow without touching the graph. Fails with
    /// [`FlowError::CapacityOverflow`] when the total or a reverse residual
    /// would leave the `Capacity` range; augmentations applied before that
    /// point stay in the graph.
    pub fn solve<L: Label>(
        &mut self,
        graph: &mut ResidualGraph<L>,
        source: &L,
        sink: &L,
    ) -> FlowResult<MaxFlowResult<L>> {
        let start_time = Instant::now();
        self.metrics = FlowMetrics::default();

        if source == sink {
            debug!("source and sink coincide ({:?}); max flow is 0", source);
            return Ok(MaxFlowResult::empty());
        }
        let (s, t) = match (graph.node_id(source), graph.node_id(sink)) {
            (Some(s), Some(t)) => (s, t),
            _ => {
                debug!("source {:?} or sink {:?} not in graph; max flow is 0", source, sink);
                return Ok(MaxFlowResult::empty());
            }
        };

        debug!(
            "Edmonds-Karp on {} nodes / {} edges from {:?} to {:?}",
            graph.node_count(),
            graph.edge_count(),
            source,
            sink
        );

        let mut parent = ParentMap::new();
        let mut total: Capacity = 0;
        let mut paths = Vec::new();

        loop {
            let (found, dequeued) = breadth_first_search(graph, s, t, &mut parent);
            self.metrics.nodes_dequeued += dequeued;
            if !found {
                break;
            }

            let path = match parent.path_to(t) {
                Some(path) => path,
                None => {
                    warn!("parent map does not lead back to the source; stopping");
                    break;
                }
            };

            let bottleneck = path
                .windows(2)
                .map(|hop| graph.residual_by_id(hop[0], hop[1]))
                .min()
                .unwrap_or(0);
            if bottleneck <= 0 {
                break;
            }

            total = total.checked_add(bottleneck).ok_or_else(|| FlowError::CapacityOverflow {
                origin: format!("{:?}", source),
                destination: format!("{:?}", sink),
            })?;
            graph.push_path(&path, bottleneck)?;
            self.metrics.augmentations += 1;
            trace!(
                "augmentation #{}: {} units over {} hops",
                self.metrics.augmentations,
                bottleneck,
                path.len() - 1
            );

            paths.push(FlowPath {
                path: path.iter().filter_map(|&id| graph.label(id).cloned()).collect(),
                flow: bottleneck,
            });
        }

        let min_cut = residual_reachable(graph, s)
            .into_iter()
            .filter_map(|id| graph.label(id).cloned())
            .collect();

        self.metrics.execution_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "max flow {} after {} augmentations ({:.3} ms)",
            total, self.metrics.augmentations, self.metrics.execution_time_ms
        );

        Ok(MaxFlowResult {
            max_flow: total,
            augmenting_paths: paths,
            min_cut,
            metrics: self.metrics.clone(),
        })
    }
}

impl<L: Label> ResidualGraph<L> {
    /// Total flow from `source` to `sink` with a fresh Edmonds-Karp solver
    pub fn max_flow(&mut self, source: &L, sink: &L) -> FlowResult<Capacity> {
        Ok(MaxFlowSolver::new().solve(self, source, sink)?.max_flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> ResidualGraph<&'static str> {
        let mut graph = ResidualGraph::new();
        graph.add_edge("S", "A", 10).unwrap();
        graph.add_edge("S", "B", 5).unwrap();
        graph.add_edge("A", "T", 8).unwrap();
        graph.add_edge("B", "T", 10).unwrap();
        graph
    }

    #[test]
    fn test_diamond_max_flow() {
        let mut graph = diamond();
        assert_eq!(graph.max_flow(&"S", &"T").unwrap(), 13);

        assert_eq!(graph.residual(&"S", &"A"), 2);
        assert_eq!(graph.residual(&"A", &"S"), 8);
        assert_eq!(graph.residual(&"B", &"T"), 5);
        // Original capacities are untouched by solving
        assert_eq!(graph.original(&"S", &"A"), 10);
        assert_eq!(graph.original(&"A", &"S"), 0);
    }

    #[test]
    fn test_search_stops_at_first_sink_discovery() {
        let graph = diamond();
        let mut parent = ParentMap::new();

        assert!(find_augmenting_path(&graph, &"S", &"T", &mut parent));
        let t = graph.node_id(&"T").unwrap();
        let a = graph.node_id(&"A").unwrap();
        // A was inserted before B, so T is discovered through A.
        assert_eq!(parent.predecessor(t), Some(Some(a)));

        let path: Vec<_> = parent
            .path_to(t)
            .unwrap()
            .into_iter()
            .map(|id| *graph.label(id).unwrap())
            .collect();
        assert_eq!(path, vec!["S", "A", "T"]);
    }

    #[test]
    fn test_search_unreachable_sink() {
        let mut graph = ResidualGraph::new();
        graph.add_edge("S", "A", 3).unwrap();
        graph.add_edge("B", "T", 3).unwrap();

        let mut parent = ParentMap::new();
        assert!(!find_augmenting_path(&graph, &"S", &"T", &mut parent));
        assert!(!find_augmenting_path(&graph, &"S", &"missing", &mut parent));
        assert_eq!(graph.clone().max_flow(&"S", &"T").unwrap(), 0);
    }

    #[test]
    fn test_search_ignores_zero_residual() {
        let mut graph = ResidualGraph::new();
        graph.add_edge("S", "T", 0).unwrap();

        let mut parent = ParentMap::new();
        assert!(!find_augmenting_path(&graph, &"S", &"T", &mut parent));
        assert_eq!(parent.len(), 1);
    }

    #[test]
    fn test_source_equals_sink() {
        let mut graph = diamond();
        assert_eq!(graph.max_flow(&"S", &"S").unwrap(), 0);
        assert_eq!(graph.residual(&"S", &"A"), 10);
    }

    #[test]
    fn test_reverse_edges_undo_bad_choice() {
        // First BFS path is S-A-D-T; the optimum needs the A-D unit rerouted.
        let mut graph = ResidualGraph::new();
        graph.add_edge("S", "A", 1).unwrap();
        graph.add_edge("S", "B", 1).unwrap();
        graph.add_edge("A", "D", 1).unwrap();
        graph.add_edge("A", "C", 1).unwrap();
        graph.add_edge("B", "D", 1).unwrap();
        graph.add_edge("C", "T", 1).unwrap();
        graph.add_edge("D", "T", 1).unwrap();

        let mut solver = MaxFlowSolver::new();
        let result = solver.solve(&mut graph, &"S", &"T").unwrap();

        assert_eq!(result.max_flow, 2);
        assert_eq!(result.metrics.augmentations, 2);
        assert_eq!(result.augmenting_paths.len(), 2);
        assert!(result.augmenting_paths.iter().all(|p| p.flow == 1));
    }

    #[test]
    fn test_min_cut_matches_flow() {
        let mut graph = diamond();
        let result = MaxFlowSolver::new().solve(&mut graph, &"S", &"T").unwrap();

        // Residual S->A is 2, A->T saturated, S->B saturated.
        let mut cut = result.min_cut.clone();
        cut.sort();
        assert_eq!(cut, vec!["A", "S"]);

        let cut_capacity: Capacity = graph
            .declared_edges()
            .filter(|key| {
                let origin = graph.label(key.origin).unwrap();
                let destination = graph.label(key.destination).unwrap();
                cut.contains(origin) && !cut.contains(destination)
            })
            .map(|key| graph.original_by_id(key.origin, key.destination))
            .sum();
        assert_eq!(cut_capacity, result.max_flow);
    }

    #[test]
    fn test_parallel_declarations_merge() {
        let mut graph = ResidualGraph::new();
        graph.add_edge("S", "T", 4).unwrap();
        graph.add_edge("S", "T", 6).unwrap();
        assert_eq!(graph.max_flow(&"S", &"T").unwrap(), 10);
    }

    #[test]
    fn test_solver_metrics() {
        let mut graph = diamond();
        let mut solver = MaxFlowSolver::new();
        solver.solve(&mut graph, &"S", &"T").unwrap();

        assert_eq!(solver.metrics().augmentations, 2);
        assert!(solver.metrics().nodes_dequeued >= 3);
        assert!(solver.metrics().execution_time_ms >= 0.0);
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let mut graph = ResidualGraph::new();
        graph.add_edge("S", "A", Capacity::MAX).unwrap();
        graph.add_edge("S", "B", Capacity::MAX).unwrap();
        graph.add_edge("A", "T", Capacity::MAX).unwrap();
        graph.add_edge("B", "T", Capacity::MAX).unwrap();

        let err = graph.max_flow(&"S", &"T").unwrap_err();
        assert!(matches!(err, FlowError::CapacityOverflow { .. }));
        // The first augmentation fit and was applied; the second was refused.
        assert_eq!(graph.residual(&"S", &"A"), 0);
        assert_eq!(graph.residual(&"S", &"B"), Capacity::MAX);
    }

    #[test]
    fn test_reverse_residual_overflow_is_an_error() {
        let mut graph = ResidualGraph::new();
        graph.add_edge("S", "A", 1).unwrap();
        graph.add_edge("A", "B", 1).unwrap();
        graph.add_edge("B", "A", Capacity::MAX).unwrap();
        graph.add_edge("B", "T", 1).unwrap();

        let err = MaxFlowSolver::new().solve(&mut graph, &"S", &"T").unwrap_err();
        assert!(matches!(err, FlowError::CapacityOverflow { .. }));
        assert_eq!(graph.residual(&"S", &"A"), 1);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        const SOURCE: u8 = 0;
        const SINK: u8 = 5;

        fn build(edges: &[(u8, u8, Capacity)]) -> ResidualGraph<u8> {
            let mut graph = ResidualGraph::new();
            for &(u, v, capacity) in edges {
                graph.add_edge(u, v, capacity).unwrap();
            }
            graph
        }

        fn arb_edges() -> impl Strategy<Value = Vec<(u8, u8, Capacity)>> {
            prop::collection::vec((0u8..6, 0u8..6, 0i64..20), 0..24)
        }

        proptest! {
            #[test]
            fn prop_conservation(edges in arb_edges()) {
                let mut graph = build(&edges);
                let total = graph.max_flow(&SOURCE, &SINK).unwrap();

                for node in graph.labels().to_vec() {
                    if node == SOURCE || node == SINK {
                        continue;
                    }
                    prop_assert_eq!(graph.inflow(&node), graph.outflow(&node));
                }
                if graph.contains_node(&SOURCE) {
                    prop_assert_eq!(graph.outflow(&SOURCE) - graph.inflow(&SOURCE), total);
                }
            }

            #[test]
            fn prop_flow_within_capacity(edges in arb_edges()) {
                let mut graph = build(&edges);
                graph.max_flow(&SOURCE, &SINK).unwrap();

                for edge in graph.flows() {
                    prop_assert!(edge.flow >= 0);
                    prop_assert!(edge.flow <= edge.capacity);
                    prop_assert_eq!(edge.is_saturated(), edge.flow == edge.capacity);
                }
            }

            #[test]
            fn prop_max_flow_equals_min_cut(edges in arb_edges()) {
                let mut graph = build(&edges);
                let result = MaxFlowSolver::new().solve(&mut graph, &SOURCE, &SINK).unwrap();

                let source_out: Capacity = edges.iter().filter(|e| e.0 == SOURCE && e.1 != SOURCE).map(|e| e.2).sum();
                let sink_in: Capacity = edges.iter().filter(|e| e.1 == SINK && e.0 != SINK).map(|e| e.2).sum();
                prop_assert!(result.max_flow <= source_out);
                prop_assert!(result.max_flow <= sink_in);

                prop_assert!(!result.min_cut.contains(&SINK));
                let cut_capacity: Capacity = edges
                    .iter()
                    .filter(|e| result.min_cut.contains(&e.0) && !result.min_cut.contains(&e.1))
                    .map(|e| e.2)
                    .sum();
                prop_assert_eq!(cut_capacity, result.max_flow);
            }

            #[test]
            fn prop_no_path_left_after_solve(edges in arb_edges()) {
                let mut graph = build(&edges);
                graph.max_flow(&SOURCE, &SINK).unwrap();

                let mut parent = ParentMap::new();
                prop_assert!(!find_augmenting_path(&graph, &SOURCE, &SINK, &mut parent));
            }

            #[test]
            fn prop_zero_capacity_edges_are_inert(
                edges in arb_edges(),
                extra in prop::collection::vec((0u8..6, 0u8..6), 0..8),
            ) {
                let mut plain = build(&edges);
                let mut padded = build(&edges);
                for &(u, v) in &extra {
                    padded.add_edge(u, v, 0).unwrap();
                }

                prop_assert_eq!(plain.max_flow(&SOURCE, &SINK).unwrap(), padded.max_flow(&SOURCE, &SINK).unwrap());
                for edge in padded.flows() {
                    prop_assert!(edge.capacity > 0);
                }
            }

            #[test]
            fn prop_negative_capacity_changes_nothing(
                edges in arb_edges(),
                u in 0u8..6,
                v in 0u8..6,
            ) {
                let mut untouched = build(&edges);
                let mut attempted = build(&edges);

                let rejected = attempted.add_edge(u, v, -1);
                prop_assert!(
                    matches!(rejected, Err(crate::algorithm::traits::FlowError::InvalidCapacity { capacity: -1 })),
                    "negative capacity must be rejected"
                );
                prop_assert_eq!(attempted.node_count(), untouched.node_count());
                prop_assert_eq!(attempted.edge_count(), untouched.edge_count());
                prop_assert_eq!(untouched.max_flow(&SOURCE, &SINK).unwrap(), attempted.max_flow(&SOURCE, &SINK).unwrap());
            }
        }
    }
}
