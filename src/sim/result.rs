use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::topology::{NodeId, Topology};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TopSpreader {
    pub id: NodeId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SimulationStep {
    #[serde(rename = "timestep", default, deserialize_with = "null_as_default")]
    pub index: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active_spreaders: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_reach: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub newly_activated: Vec<NodeId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub activation_paths: Vec<(NodeId, NodeId)>,
    #[serde(rename = "live_top_5", default, deserialize_with = "null_as_default")]
    pub live_top5: Vec<TopSpreader>,
}

impl SimulationStep {
    pub fn velocity(&self) -> usize {
        self.newly_activated.len()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ResultMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub calculated_risk: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_used: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SimulationResult {
    pub graph_topology: Topology,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<SimulationStep>,
    #[serde(default)]
    pub metadata: ResultMetadata,
}

impl SimulationResult {
    pub fn step(&self, index: usize) -> Option<&SimulationStep> {
        self.results.get(index)
    }

    pub fn step_count(&self) -> usize {
        self.results.len()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.results.len().checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_step_fields_default_to_zero() {
        let raw = r#"{
            "graph_topology": {"nodes": [{"id": 0}], "links": []},
            "results": [
                {"timestep": 0},
                {"timestep": 1, "total_reach": null, "newly_activated": null}
            ],
            "metadata": {}
        }"#;
        let result: SimulationResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.step_count(), 2);
        assert_eq!(result.results[0].total_reach, 0);
        assert_eq!(result.results[1].total_reach, 0);
        assert!(result.results[1].newly_activated.is_empty());
        assert_eq!(result.metadata.calculated_risk, 0.0);
    }

    #[test]
    fn wire_step_decodes_paths_and_ranking() {
        let raw = r#"{
            "timestep": 3,
            "active_spreaders": 9,
            "total_reach": 9,
            "newly_activated": ["4", 5],
            "activation_paths": [["1", "4"], [2, 5]],
            "live_top_5": [{"id": "1", "count": 3}, {"id": 2, "count": 1}]
        }"#;
        let step: SimulationStep = serde_json::from_str(raw).unwrap();
        assert_eq!(step.index, 3);
        assert_eq!(step.velocity(), 2);
        assert_eq!(
            step.activation_paths[1],
            (NodeId::from("2"), NodeId::from("5"))
        );
        assert_eq!(step.live_top5[0].count, 3);
    }

    #[test]
    fn metadata_keeps_unknown_keys() {
        let raw = r#"{"calculated_risk": 0.82, "strategy_used": "genetic_optimized", "ga_params": {"optimized_suppression": 1.4}}"#;
        let metadata: ResultMetadata = serde_json::from_str(raw).unwrap();
        assert_eq!(metadata.calculated_risk, 0.82);
        assert_eq!(metadata.strategy_used.as_deref(), Some("genetic_optimized"));
        assert!(metadata.extra.contains_key("ga_params"));
    }

    #[test]
    fn empty_result_has_no_last_index() {
        let result = SimulationResult::default();
        assert_eq!(result.last_index(), None);
    }
}
