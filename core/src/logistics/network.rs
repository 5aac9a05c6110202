//! Two-tier distribution network
//!
//! Terminals ship to warehouses, warehouses supply stores. The builder turns
//! that description into a single-source/single-sink residual graph: the
//! synthetic source feeds every terminal with the sum of its outgoing tier
//! capacities and every store drains into the synthetic sink with the sum of
//! its incoming tier capacities.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::decomposition::FlowDecomposer;
use crate::algorithm::graph::max_flow::MaxFlowSolver;
use crate::algorithm::traits::{Capacity, FlowError, FlowResult};
use crate::config::SolverConfig;
use crate::data_structures::residual::ResidualGraph;
use crate::logistics::report::{DistributionReport, EdgeFlowRow, NodeTotal, TerminalStoreFlow};

/// Role of a named node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRole {
    Terminal,
    Warehouse,
    Store,
}

/// Capacitated link between two named nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub from: String,
    pub to: String,
    pub capacity: Capacity,
}

/// Terminal -> warehouse -> store network description
#[derive(Debug, Clone, Default)]
pub struct DistributionNetwork {
    config: SolverConfig,
    terminals: Vec<String>,
    warehouses: Vec<String>,
    stores: Vec<String>,
    roles: HashMap<String, NodeRole>,
    terminal_links: Vec<Link>,
    store_links: Vec<Link>,
}

impl DistributionNetwork {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn terminals(&self) -> &[String] {
        &self.terminals
    }

    pub fn warehouses(&self) -> &[String] {
        &self.warehouses
    }

    pub fn stores(&self) -> &[String] {
        &self.stores
    }

    pub fn add_terminal(&mut self, name: impl Into<String>) -> FlowResult<()> {
        let name = self.register(name.into(), NodeRole::Terminal)?;
        self.terminals.push(name);
        Ok(())
    }

    pub fn add_warehouse(&mut self, name: impl Into<String>) -> FlowResult<()> {
        let name = self.register(name.into(), NodeRole::Warehouse)?;
        self.warehouses.push(name);
        Ok(())
    }

    pub fn add_store(&mut self, name: impl Into<String>) -> FlowResult<()> {
        let name = self.register(name.into(), NodeRole::Store)?;
        self.stores.push(name);
        Ok(())
    }

    /// Declare shipping capacity from a terminal to a warehouse
    pub fn connect_terminal(&mut self, terminal: &str, warehouse: &str, capacity: Capacity) -> FlowResult<()> {
        self.expect_role(terminal, NodeRole::Terminal)?;
        self.expect_role(warehouse, NodeRole::Warehouse)?;
        if capacity < 0 {
            return Err(FlowError::InvalidCapacity { capacity });
        }
        self.terminal_links.push(Link {
            from: terminal.to_string(),
            to: warehouse.to_string(),
            capacity,
        });
        Ok(())
    }

    /// Declare supply capacity from a warehouse to a store
    pub fn supply_store(&mut self, warehouse: &str, store: &str, capacity: Capacity) -> FlowResult<()> {
        self.expect_role(warehouse, NodeRole::Warehouse)?;
        self.expect_role(store, NodeRole::Store)?;
        if capacity < 0 {
            return Err(FlowError::InvalidCapacity { capacity });
        }
        self.store_links.push(Link {
            from: warehouse.to_string(),
            to: store.to_string(),
            capacity,
        });
        Ok(())
    }

    /// Assemble the single-source/single-sink residual graph.
    ///
    /// Insertion order is source edges (terminal order), terminal links,
    /// store links, then sink edges (store order); it fixes the search's
    /// tie-breaking.
    pub fn build_graph(&self) -> FlowResult<ResidualGraph<String>> {
        for (from, to) in repeated_links(&self.terminal_links)
            .into_iter()
            .chain(repeated_links(&self.store_links))
        {
            warn!("link {} -> {} declared more than once; capacities are merged", from, to);
        }

        let shipped = link_totals(&self.terminal_links, |link| &link.from, &self.config.source_label)?;
        let received = link_totals(&self.store_links, |link| &link.to, &self.config.sink_label)?;

        let mut graph = ResidualGraph::new();
        for terminal in &self.terminals {
            let capacity = shipped.get(terminal.as_str()).copied().unwrap_or(0);
            graph.add_edge(self.config.source_label.clone(), terminal.clone(), capacity)?;
        }
        for link in self.terminal_links.iter().chain(self.store_links.iter()) {
            graph.add_edge(link.from.clone(), link.to.clone(), link.capacity)?;
        }
        for store in &self.stores {
            let capacity = received.get(store.as_str()).copied().unwrap_or(0);
            graph.add_edge(store.clone(), self.config.sink_label.clone(), capacity)?;
        }

        debug!(
            "built distribution graph: {} terminals, {} warehouses, {} stores, {} edges",
            self.terminals.len(),
            self.warehouses.len(),
            self.stores.len(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Solve the network and attribute store deliveries to terminals
    pub fn solve(&self) -> FlowResult<DistributionReport> {
        let mut graph = self.build_graph()?;
        let source = self.config.source_label.clone();
        let sink = self.config.sink_label.clone();

        let result = MaxFlowSolver::new().solve(&mut graph, &source, &sink)?;
        info!("maximum flow {} from {} to {}", result.max_flow, source, sink);

        let edge_flows = graph
            .flows()
            .into_iter()
            .filter(|edge| {
                self.config.include_synthetic_edges || (edge.origin != source && edge.destination != sink)
            })
            .map(|edge| EdgeFlowRow {
                saturated: edge.is_saturated(),
                origin: edge.origin,
                destination: edge.destination,
                flow: edge.flow,
                capacity: edge.capacity,
            })
            .collect();

        let decomposer = FlowDecomposer::from_config(&self.config);
        let mut attributed: BTreeMap<(String, String), Capacity> = BTreeMap::new();
        for warehouse in &self.warehouses {
            let decomposition = decomposer.decompose_node(&graph, warehouse, &self.terminals, &self.stores)?;
            debug!("warehouse {}: {} units attributed", warehouse, decomposition.total);
            for attribution in decomposition.attributions {
                *attributed
                    .entry((attribution.predecessor, attribution.successor))
                    .or_insert(0) += attribution.flow;
            }
        }
        let terminal_store_flows = attributed
            .into_iter()
            .map(|((terminal, store), flow)| TerminalStoreFlow { terminal, store, flow })
            .collect();

        let terminal_totals = self
            .terminals
            .iter()
            .map(|terminal| NodeTotal {
                name: terminal.clone(),
                flow: graph.outflow(terminal),
            })
            .collect();
        let store_totals = self
            .stores
            .iter()
            .map(|store| NodeTotal {
                name: store.clone(),
                flow: graph.edge_flow(store, &sink),
            })
            .collect();

        Ok(DistributionReport {
            max_flow: result.max_flow,
            edge_flows,
            terminal_store_flows,
            terminal_totals,
            store_totals,
            metrics: result.metrics,
        })
    }

    fn register(&mut self, name: String, role: NodeRole) -> FlowResult<String> {
        if self.roles.contains_key(&name) || name == self.config.source_label || name == self.config.sink_label {
            return Err(FlowError::DuplicateNode(name));
        }
        self.roles.insert(name.clone(), role);
        Ok(name)
    }

    fn expect_role(&self, name: &str, role: NodeRole) -> FlowResult<()> {
        match self.roles.get(name) {
            Some(found) if *found == role => Ok(()),
            _ => Err(FlowError::UnknownNode(format!("{} ({:?})", name, role))),
        }
    }
}

/// Per-node capacity sums feeding the synthetic source or sink edges
fn link_totals<'a>(
    links: &'a [Link],
    endpoint: impl Fn(&'a Link) -> &'a String,
    synthetic: &str,
) -> FlowResult<HashMap<&'a str, Capacity>> {
    let mut totals: HashMap<&str, Capacity> = HashMap::new();
    for link in links {
        let name = endpoint(link).as_str();
        let total = totals.entry(name).or_insert(0);
        *total = total.checked_add(link.capacity).ok_or_else(|| FlowError::CapacityOverflow {
            origin: synthetic.to_string(),
            destination: name.to_string(),
        })?;
    }
    Ok(totals)
}

/// Tier links declared more than once between the same pair.
///
/// They are legal (capacities merge) but usually a data-entry slip.
pub fn repeated_links(links: &[Link]) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    let mut repeated = Vec::new();
    for link in links {
        let key = (link.from.clone(), link.to.clone());
        if !seen.insert(key.clone()) && !repeated.contains(&key) {
            repeated.push(key);
        }
    }
    repeated
}
