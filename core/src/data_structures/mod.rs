//! Graph storage
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod residual;

pub use self::residual::{CapacityRecord, EdgeKey, ResidualGraph};
