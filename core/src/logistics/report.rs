//! Distribution report
//!
//! Plain data produced by [`DistributionNetwork::solve`]: the scalar maximum
//! flow, the per-edge table with saturation flags, terminal-to-store
//! attribution and per-node totals.
//!
//! [`DistributionNetwork::solve`]: crate::logistics::network::DistributionNetwork::solve
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::max_flow::FlowMetrics;
use crate::algorithm::traits::{Capacity, FlowResult};

/// One row of the edge table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFlowRow {
    pub origin: String,
    pub destination: String,
    pub flow: Capacity,
    pub capacity: Capacity,
    pub saturated: bool,
}

/// Flow attributed from one terminal to one store, summed over warehouses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalStoreFlow {
    pub terminal: String,
    pub store: String,
    pub flow: Capacity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTotal {
    pub name: String,
    pub flow: Capacity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionReport {
    pub max_flow: Capacity,
    /// Declared edges with positive capacity, in insertion order
    pub edge_flows: Vec<EdgeFlowRow>,
    /// Sorted by (terminal, store)
    pub terminal_store_flows: Vec<TerminalStoreFlow>,
    /// Units shipped per terminal
    pub terminal_totals: Vec<NodeTotal>,
    /// Units delivered per store
    pub store_totals: Vec<NodeTotal>,
    pub metrics: FlowMetrics,
}

impl DistributionReport {
    pub fn to_json(&self) -> FlowResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the edge table and the terminal-to-store table as CSV files
    /// under `dir`, creating it if needed. Returns the written paths.
    pub fn write_csv(&self, dir: &Path) -> FlowResult<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let edges = dir.join(EDGE_FLOWS_FILE);
        write_rows(&edges, &self.edge_flows)?;
        let attributed = dir.join(TERMINAL_STORE_FILE);
        write_rows(&attributed, &self.terminal_store_flows)?;

        info!("wrote {} and {}", edges.display(), attributed.display());
        Ok(vec![edges, attributed])
    }

    pub fn saturated_edges(&self) -> impl Iterator<Item = &EdgeFlowRow> {
        self.edge_flows.iter().filter(|row| row.saturated)
    }

    pub fn edge(&self, origin: &str, destination: &str) -> Option<&EdgeFlowRow> {
        self.edge_flows
            .iter()
            .find(|row| row.origin == origin && row.destination == destination)
    }

    /// Attributed flow from `terminal` to `store`, 0 if none
    pub fn flow_between(&self, terminal: &str, store: &str) -> Capacity {
        self.terminal_store_flows
            .iter()
            .find(|row| row.terminal == terminal && row.store == store)
            .map_or(0, |row| row.flow)
    }

    pub fn terminal_total(&self, terminal: &str) -> Capacity {
        total_for(&self.terminal_totals, terminal)
    }

    pub fn store_total(&self, store: &str) -> Capacity {
        total_for(&self.store_totals, store)
    }
}

pub const EDGE_FLOWS_FILE: &str = "edge_flows.csv";
pub const TERMINAL_STORE_FILE: &str = "terminal_store_flow.csv";

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> FlowResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn total_for(totals: &[NodeTotal], name: &str) -> Capacity {
    totals.iter().find(|t| t.name == name).map_or(0, |t| t.flow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> DistributionReport {
        DistributionReport {
            max_flow: 5,
            edge_flows: vec![
                EdgeFlowRow {
                    origin: "T".into(),
                    destination: "W".into(),
                    flow: 5,
                    capacity: 5,
                    saturated: true,
                },
                EdgeFlowRow {
                    origin: "W".into(),
                    destination: "S".into(),
                    flow: 5,
                    capacity: 9,
                    saturated: false,
                },
            ],
            terminal_store_flows: vec![TerminalStoreFlow {
                terminal: "T".into(),
                store: "S".into(),
                flow: 5,
            }],
            terminal_totals: vec![NodeTotal { name: "T".into(), flow: 5 }],
            store_totals: vec![NodeTotal { name: "S".into(), flow: 5 }],
            metrics: FlowMetrics::default(),
        }
    }

    #[test]
    fn test_lookups() {
        let report = report();
        assert_eq!(report.saturated_edges().count(), 1);
        assert_eq!(report.edge("W", "S").map(|row| row.capacity), Some(9));
        assert!(report.edge("S", "W").is_none());
        assert_eq!(report.flow_between("T", "S"), 5);
        assert_eq!(report.flow_between("T", "X"), 0);
        assert_eq!(report.terminal_total("T"), 5);
        assert_eq!(report.store_total("nope"), 0);
    }

    #[test]
    fn test_json_shape() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["max_flow"], 5);
        assert_eq!(value["edge_flows"][0]["saturated"], true);
        assert_eq!(value["terminal_store_flows"][0]["store"], "S");
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("tables");
        let written = report().write_csv(&out).unwrap();
        assert_eq!(written, vec![out.join(EDGE_FLOWS_FILE), out.join(TERMINAL_STORE_FILE)]);

        let edges = std::fs::read_to_string(out.join(EDGE_FLOWS_FILE)).unwrap();
        let lines: Vec<&str> = edges.lines().collect();
        assert_eq!(lines[0], "origin,destination,flow,capacity,saturated");
        assert_eq!(lines[1], "T,W,5,5,true");
        assert_eq!(lines[2], "W,S,5,9,false");

        let mut reader = csv::Reader::from_path(out.join(TERMINAL_STORE_FILE)).unwrap();
        let rows: Vec<TerminalStoreFlow> = reader.deserialize().map(|row| row.unwrap()).collect();
        assert_eq!(rows, report().terminal_store_flows);
    }
}
