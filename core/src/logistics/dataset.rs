//! Reference distribution network
//!
//! Two terminals, four warehouses and fourteen stores with the tier
//! capacities of the reference exercise.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crate::algorithm::traits::{Capacity, FlowResult};
use crate::config::SolverConfig;
use crate::logistics::network::DistributionNetwork;

pub const TERMINALS: [&str; 2] = ["Terminal 1", "Terminal 2"];

pub const WAREHOUSES: [&str; 4] = ["Warehouse 1", "Warehouse 2", "Warehouse 3", "Warehouse 4"];

pub const STORES: [&str; 14] = [
    "Store 1", "Store 2", "Store 3", "Store 4", "Store 5", "Store 6", "Store 7",
    "Store 8", "Store 9", "Store 10", "Store 11", "Store 12", "Store 13", "Store 14",
];

pub const TERMINAL_LINKS: [(&str, &str, Capacity); 6] = [
    ("Terminal 1", "Warehouse 1", 25),
    ("Terminal 1", "Warehouse 2", 20),
    ("Terminal 1", "Warehouse 3", 15),
    ("Terminal 2", "Warehouse 3", 15),
    ("Terminal 2", "Warehouse 4", 30),
    ("Terminal 2", "Warehouse 2", 10),
];

pub const STORE_LINKS: [(&str, &str, Capacity); 14] = [
    ("Warehouse 1", "Store 1", 15),
    ("Warehouse 1", "Store 2", 10),
    ("Warehouse 1", "Store 3", 20),
    ("Warehouse 2", "Store 4", 15),
    ("Warehouse 2", "Store 5", 10),
    ("Warehouse 2", "Store 6", 25),
    ("Warehouse 3", "Store 7", 20),
    ("Warehouse 3", "Store 8", 15),
    ("Warehouse 3", "Store 9", 10),
    ("Warehouse 4", "Store 10", 20),
    ("Warehouse 4", "Store 11", 10),
    ("Warehouse 4", "Store 12", 15),
    ("Warehouse 4", "Store 13", 5),
    ("Warehouse 4", "Store 14", 10),
];

/// Build the reference network with the given configuration
pub fn reference_network(config: SolverConfig) -> FlowResult<DistributionNetwork> {
    let mut network = DistributionNetwork::new(config);
    for terminal in TERMINALS {
        network.add_terminal(terminal)?;
    }
    for warehouse in WAREHOUSES {
        network.add_warehouse(warehouse)?;
    }
    for store in STORES {
        network.add_store(store)?;
    }
    for (terminal, warehouse, capacity) in TERMINAL_LINKS {
        network.connect_terminal(terminal, warehouse, capacity)?;
    }
    for (warehouse, store, capacity) in STORE_LINKS {
        network.supply_store(warehouse, store, capacity)?;
    }
    Ok(network)
}
