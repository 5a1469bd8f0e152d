use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::topology::{NodeId, Topology};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    FuzzyAdaptive,
    GeneticOptimized,
}

impl Strategy {
    pub fn label(self) -> &'static str {
        match self {
            Self::FuzzyAdaptive => "Fuzzy logic adaptive",
            Self::GeneticOptimized => "Genetic algorithm opt.",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RunConfig {
    pub content_text: String,
    pub num_nodes: usize,
    pub seed_nodes: usize,
    pub risk_tolerance: f64,
    pub strategy: Strategy,
    pub simulation_steps: usize,
    pub custom_graph: Option<Topology>,
    pub blocked_node_ids: BTreeSet<NodeId>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            content_text: "Urgent! Crypto scam alert.".to_owned(),
            num_nodes: 250,
            seed_nodes: 5,
            risk_tolerance: 0.5,
            strategy: Strategy::FuzzyAdaptive,
            simulation_steps: 15,
            custom_graph: None,
            blocked_node_ids: BTreeSet::new(),
        }
    }
}

impl RunConfig {
    pub fn attach_dataset(&mut self, topology: Topology) {
        self.num_nodes = topology.node_count();
        self.custom_graph = Some(topology);
    }

    pub fn clear_dataset(&mut self) {
        self.custom_graph = None;
    }

    pub fn has_dataset(&self) -> bool {
        self.custom_graph.is_some()
    }

    pub fn for_run(&self, blocked_node_ids: BTreeSet<NodeId>) -> Self {
        Self {
            risk_tolerance: self.risk_tolerance.clamp(0.0, 1.0),
            blocked_node_ids,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RawNode;

    #[test]
    fn strategy_uses_service_wire_names() {
        assert_eq!(
            serde_json::to_value(Strategy::GeneticOptimized).unwrap(),
            serde_json::json!("genetic_optimized")
        );
        assert_eq!(
            serde_json::to_value(Strategy::FuzzyAdaptive).unwrap(),
            serde_json::json!("fuzzy_adaptive")
        );
    }

    #[test]
    fn attaching_a_dataset_overrides_node_count() {
        let mut config = RunConfig::default();
        let topology = Topology {
            nodes: (0..12).map(|i| RawNode::new(i as u64)).collect(),
            links: Vec::new(),
        };
        config.attach_dataset(topology);
        assert_eq!(config.num_nodes, 12);
        assert!(config.has_dataset());

        config.clear_dataset();
        assert!(!config.has_dataset());
    }

    #[test]
    fn run_snapshot_carries_blocked_ids_without_touching_the_working_config() {
        let config = RunConfig::default();
        let blocked = BTreeSet::from([NodeId::from("3"), NodeId::from("9")]);
        let snapshot = config.for_run(blocked.clone());
        assert_eq!(snapshot.blocked_node_ids, blocked);
        assert!(config.blocked_node_ids.is_empty());

        let body = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(body["blocked_node_ids"], serde_json::json!(["3", "9"]));
        assert_eq!(body["custom_graph"], serde_json::Value::Null);
        assert_eq!(body["strategy"], serde_json::json!("fuzzy_adaptive"));
    }
}
