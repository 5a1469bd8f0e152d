use crate::sim::SimulationResult;

pub const SATURATION_ALERT_PERCENT: f64 = 80.0;
pub const RISK_ALERT: f64 = 0.7;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepInsights {
    pub total_nodes: usize,
    pub reach: usize,
    pub saturation: f64,
    pub velocity: usize,
    pub risk: f64,
}

impl StepInsights {
    pub fn compute(result: Option<&SimulationResult>, step: usize) -> Self {
        let Some(result) = result else {
            return Self::default();
        };

        let total_nodes = result.graph_topology.node_count();
        let current = result.step(step);
        let reach = current.map_or(0, |step| step.total_reach);
        let saturation = if total_nodes == 0 {
            0.0
        } else {
            reach as f64 / total_nodes as f64 * 100.0
        };

        Self {
            total_nodes,
            reach,
            saturation,
            velocity: current.map_or(0, |step| step.velocity()),
            risk: result.metadata.calculated_risk,
        }
    }

    pub fn saturation_alert(&self) -> bool {
        self.saturation > SATURATION_ALERT_PERCENT
    }

    pub fn risk_alert(&self) -> bool {
        self.risk > RISK_ALERT
    }
}

pub fn reach_curve(result: &SimulationResult) -> Vec<[f64; 2]> {
    result
        .results
        .iter()
        .enumerate()
        .map(|(index, step)| [index as f64, step.total_reach as f64])
        .collect()
}
