//! Solver configuration
//!
//! Typed settings with defaults, loadable from JSON and adjustable through
//! the string parameter interface used by front ends.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::decomposition::UNBOUNDED_CAPACITY;
use crate::algorithm::traits::{Capacity, FlowError, FlowResult};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Capacity standing in for "unbounded" on decomposition cross edges.
    /// Must dominate every real capacity of a sub-problem.
    pub unbounded_capacity: Capacity,
    /// Label of the synthetic overall source
    pub source_label: String,
    /// Label of the synthetic overall sink
    pub sink_label: String,
    /// Report source->terminal and store->sink edges in the edge table
    pub include_synthetic_edges: bool,
    /// Keep (terminal, store) pairs with zero attributed flow
    pub keep_zero_attributions: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            unbounded_capacity: UNBOUNDED_CAPACITY,
            source_label: "source".to_string(),
            sink_label: "sink".to_string(),
            include_synthetic_edges: false,
            keep_zero_attributions: false,
        }
    }
}

impl SolverConfig {
    /// Parse a configuration document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> FlowResult<Self> {
        let config: SolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> FlowResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> FlowResult<()> {
        if self.unbounded_capacity <= 0 {
            return Err(invalid("unbounded_capacity", "must be a positive integer"));
        }
        if self.source_label.is_empty() || self.sink_label.is_empty() {
            return Err(invalid("source_label", "source and sink labels must be non-empty"));
        }
        if self.source_label == self.sink_label {
            return Err(invalid("sink_label", "source and sink labels must differ"));
        }
        Ok(())
    }

    pub fn set_parameter(&mut self, name: &str, value: &str) -> FlowResult<()> {
        let mut updated = self.clone();
        match name {
            "unbounded_capacity" => {
                updated.unbounded_capacity = value
                    .parse::<Capacity>()
                    .map_err(|_| invalid(name, "must be a positive integer"))?;
            }
            "source_label" => updated.source_label = value.to_string(),
            "sink_label" => updated.sink_label = value.to_string(),
            "include_synthetic_edges" => updated.include_synthetic_edges = parse_flag(name, value)?,
            "keep_zero_attributions" => updated.keep_zero_attributions = parse_flag(name, value)?,
            _ => return Err(invalid(name, "unknown parameter")),
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn get_parameter(&self, name: &str) -> Option<String> {
        match name {
            "unbounded_capacity" => Some(self.unbounded_capacity.to_string()),
            "source_label" => Some(self.source_label.clone()),
            "sink_label" => Some(self.sink_label.clone()),
            "include_synthetic_edges" => Some(self.include_synthetic_edges.to_string()),
            "keep_zero_attributions" => Some(self.keep_zero_attributions.to_string()),
            _ => None,
        }
    }
}

fn parse_flag(name: &str, value: &str) -> FlowResult<bool> {
    value
        .parse::<bool>()
        .map_err(|_| invalid(name, "must be true or false"))
}

fn invalid(name: &str, reason: &str) -> FlowError {
    FlowError::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.unbounded_capacity, 1_000_000_000);
        assert_eq!(config.source_label, "source");
        assert!(!config.keep_zero_attributions);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = SolverConfig::from_json_str(r#"{ "unbounded_capacity": 500, "sink_label": "drain" }"#).unwrap();
        assert_eq!(config.unbounded_capacity, 500);
        assert_eq!(config.sink_label, "drain");
        assert_eq!(config.source_label, "source");
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(SolverConfig::from_json_str("{ not json"), Err(FlowError::Config(_))));
        assert!(matches!(
            SolverConfig::from_json_str(r#"{ "unbounded_capacity": 0 }"#),
            Err(FlowError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_parameter_setting() {
        let mut config = SolverConfig::default();

        assert!(config.set_parameter("unbounded_capacity", "42").is_ok());
        assert_eq!(config.get_parameter("unbounded_capacity").as_deref(), Some("42"));

        assert!(config.set_parameter("keep_zero_attributions", "true").is_ok());
        assert!(config.keep_zero_attributions);

        // Invalid parameters leave the config untouched
        assert!(config.set_parameter("unbounded_capacity", "-5").is_err());
        assert!(config.set_parameter("unbounded_capacity", "lots").is_err());
        assert!(config.set_parameter("sink_label", "source").is_err());
        assert!(config.set_parameter("invalid_param", "value").is_err());
        assert_eq!(config.unbounded_capacity, 42);
        assert_eq!(config.sink_label, "sink");
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SolverConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(SolverConfig::from_json_str(&json).unwrap(), config);
    }
}
