//! Flow decomposition through an intermediate node
//!
//! A solved max-flow instance only knows aggregate flow per edge. When several
//! predecessors feed one intermediate node that in turn feeds several
//! successors, the question "how much of predecessor `p` reached successor
//! `s`" is answered here by posing an independent bipartite max-flow problem:
//!
//! ```text
//! source --inflow(p)--> p --unbounded--> s --outflow(s)--> sink
//! ```
//!
//! # Non-uniqueness
//! The returned attribution is *a* valid decomposition: every predecessor's
//! row sums to its inflow and every successor's column sums to its outflow
//! (when inflow and outflow totals agree). It is not necessarily the routing
//! that happened physically. As soon as two predecessors and two successors
//! carry flow, many decompositions are feasible and the one returned is
//! whichever the Edmonds-Karp search builds, i.e. it is fixed by the order in
//! which predecessors and successors are supplied.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::max_flow::MaxFlowSolver;
use crate::algorithm::traits::{Capacity, FlowError, FlowResult, Label};
use crate::config::SolverConfig;
use crate::data_structures::residual::ResidualGraph;

/// Stand-in for unbounded capacity on predecessor->successor edges.
///
/// True unboundedness is not representable; the sentinel only has to
/// dominate every real capacity of the sub-problem, which
/// [`FlowDecomposer::decompose`] checks.
pub const UNBOUNDED_CAPACITY: Capacity = 1_000_000_000;

/// Node of the auxiliary bipartite network.
///
/// Synthetic endpoints are their own variants so they can never collide
/// with a caller's label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Port<L> {
    Source,
    Upstream(L),
    Downstream(L),
    Sink,
}

/// Flow attributed to one (predecessor, successor) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution<L> {
    pub predecessor: L,
    pub successor: L,
    pub flow: Capacity,
}

/// Result of decomposing the flow through one intermediate node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decomposition<L> {
    /// Flow value of the auxiliary problem
    pub total: Capacity,
    /// Attributed pairs in predecessor-major order
    pub attributions: Vec<Attribution<L>>,
}

impl<L: Label> Decomposition<L> {
    fn empty() -> Self {
        Self {
            total: 0,
            attributions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attributions.is_empty()
    }

    pub fn flow_between(&self, predecessor: &L, successor: &L) -> Capacity {
        self.attributions
            .iter()
            .filter(|a| &a.predecessor == predecessor && &a.successor == successor)
            .map(|a| a.flow)
            .sum()
    }

    /// Everything attributed to `predecessor`
    pub fn predecessor_total(&self, predecessor: &L) -> Capacity {
        self.attributions
            .iter()
            .filter(|a| &a.predecessor == predecessor)
            .map(|a| a.flow)
            .sum()
    }

    /// Everything attributed to `successor`
    pub fn successor_total(&self, successor: &L) -> Capacity {
        self.attributions
            .iter()
            .filter(|a| &a.successor == successor)
            .map(|a| a.flow)
            .sum()
    }
}

/// Builds and solves per-node decomposition sub-problems
#[derive(Debug, Clone)]
pub struct FlowDecomposer {
    unbounded_capacity: Capacity,
    keep_zero: bool,
}

impl Default for FlowDecomposer {
    fn default() -> Self {
        Self {
            unbounded_capacity: UNBOUNDED_CAPACITY,
            keep_zero: false,
        }
    }
}

impl FlowDecomposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        Self {
            unbounded_capacity: config.unbounded_capacity,
            keep_zero: config.keep_zero_attributions,
        }
    }

    pub fn with_unbounded_capacity(mut self, capacity: Capacity) -> Self {
        self.unbounded_capacity = capacity;
        self
    }

    /// Also report (predecessor, successor) pairs that received nothing
    pub fn keep_zero_attributions(mut self, keep: bool) -> Self {
        self.keep_zero = keep;
        self
    }

    /// Decompose aggregate `inflows` (per predecessor) into `outflows` (per
    /// successor).
    ///
    /// Zero entries are skipped; repeated labels are merged. Fails with
    /// [`FlowError::InvalidCapacity`] on a negative amount and with
    /// [`FlowError::UnboundedTooSmall`] if the sentinel could become binding.
    pub fn decompose<L: Label>(
        &self,
        inflows: &[(L, Capacity)],
        outflows: &[(L, Capacity)],
    ) -> FlowResult<Decomposition<L>> {
        let inflows = merge_positive(inflows)?;
        let outflows = merge_positive(outflows)?;

        if inflows.is_empty() || outflows.is_empty() {
            debug!("degenerate decomposition: {} inflows, {} outflows", inflows.len(), outflows.len());
            return Ok(Decomposition::empty());
        }

        let largest = inflows
            .iter()
            .chain(outflows.iter())
            .map(|(_, amount)| *amount)
            .max()
            .unwrap_or(0);
        if largest > self.unbounded_capacity {
            warn!("unbounded sentinel {} below real capacity {}", self.unbounded_capacity, largest);
            return Err(FlowError::UnboundedTooSmall {
                sentinel: self.unbounded_capacity,
                required: largest,
            });
        }

        let inflow_total = checked_total(&inflows, "inflow")?;
        let outflow_total = checked_total(&outflows, "outflow")?;
        if inflow_total != outflow_total {
            debug!("unbalanced decomposition: inflow {} vs outflow {}", inflow_total, outflow_total);
        }

        let mut network: ResidualGraph<Port<L>> = ResidualGraph::new();
        for (predecessor, amount) in &inflows {
            network.add_edge(Port::Source, Port::Upstream(predecessor.clone()), *amount)?;
        }
        for (predecessor, _) in &inflows {
            for (successor, _) in &outflows {
                network.add_edge(
                    Port::Upstream(predecessor.clone()),
                    Port::Downstream(successor.clone()),
                    self.unbounded_capacity,
                )?;
            }
        }
        for (successor, amount) in &outflows {
            network.add_edge(Port::Downstream(successor.clone()), Port::Sink, *amount)?;
        }

        let total = MaxFlowSolver::new()
            .solve(&mut network, &Port::Source, &Port::Sink)?
            .max_flow;

        let mut attributions = Vec::new();
        for (predecessor, _) in &inflows {
            for (successor, _) in &outflows {
                let flow = network.edge_flow(
                    &Port::Upstream(predecessor.clone()),
                    &Port::Downstream(successor.clone()),
                );
                if flow > 0 || self.keep_zero {
                    attributions.push(Attribution {
                        predecessor: predecessor.clone(),
                        successor: successor.clone(),
                        flow,
                    });
                }
            }
        }

        debug!("decomposed {} units into {} attributions", total, attributions.len());
        Ok(Decomposition { total, attributions })
    }

    /// Decompose the flow through `intermediate` in an already solved graph.
    ///
    /// Inflows are read from the `predecessor -> intermediate` edges and
    /// outflows from the `intermediate -> successor` edges, in the order the
    /// label lists are given.
    pub fn decompose_node<L: Label>(
        &self,
        graph: &ResidualGraph<L>,
        intermediate: &L,
        predecessors: &[L],
        successors: &[L],
    ) -> FlowResult<Decomposition<L>> {
        let inflows: Vec<(L, Capacity)> = predecessors
            .iter()
            .map(|p| (p.clone(), graph.edge_flow(p, intermediate)))
            .collect();
        let outflows: Vec<(L, Capacity)> = successors
            .iter()
            .map(|s| (s.clone(), graph.edge_flow(intermediate, s)))
            .collect();
        self.decompose(&inflows, &outflows)
    }
}

fn checked_total<L: Label>(amounts: &[(L, Capacity)], side: &str) -> FlowResult<Capacity> {
    amounts.iter().try_fold(0 as Capacity, |total, (label, amount)| {
        total.checked_add(*amount).ok_or_else(|| FlowError::CapacityOverflow {
            origin: format!("{:?}", label),
            destination: side.to_string(),
        })
    })
}

/// Drop zero amounts and merge repeated labels, keeping first-seen order
fn merge_positive<L: Label>(amounts: &[(L, Capacity)]) -> FlowResult<Vec<(L, Capacity)>> {
    let mut merged: Vec<(L, Capacity)> = Vec::new();
    for (label, amount) in amounts {
        if *amount < 0 {
            return Err(FlowError::InvalidCapacity { capacity: *amount });
        }
        if *amount == 0 {
            continue;
        }
        match merged.iter_mut().find(|(existing, _)| existing == label) {
            Some((_, total)) => {
                *total = total.checked_add(*amount).ok_or_else(|| FlowError::CapacityOverflow {
                    origin: format!("{:?}", label),
                    destination: "decomposition".to_string(),
                })?
            }
            None => merged.push((label.clone(), *amount)),
        }
    }
    Ok(merged)
}
