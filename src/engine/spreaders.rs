use crate::sim::{SimulationStep, TopSpreader};

pub const TOP_SPREADER_LIMIT: usize = 5;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TopSpreaders {
    entries: Vec<TopSpreader>,
}

impl TopSpreaders {
    pub fn from_step(step: &SimulationStep) -> Self {
        Self {
            entries: step
                .live_top5
                .iter()
                .take(TOP_SPREADER_LIMIT)
                .cloned()
                .collect(),
        }
    }

    pub fn entries(&self) -> &[TopSpreader] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::NodeId;

    fn step_with(counts: &[(&str, u32)]) -> SimulationStep {
        SimulationStep {
            live_top5: counts
                .iter()
                .map(|&(id, count)| TopSpreader {
                    id: NodeId::from(id),
                    count,
                })
                .collect(),
            ..SimulationStep::default()
        }
    }

    #[test]
    fn passes_the_step_ranking_through_in_order() {
        let spreaders = TopSpreaders::from_step(&step_with(&[("7", 4), ("2", 3)]));
        let ids = spreaders
            .entries()
            .iter()
            .map(|entry| entry.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["7", "2"]);
    }

    #[test]
    fn keeps_at_most_five() {
        let spreaders = TopSpreaders::from_step(&step_with(&[
            ("a", 9),
            ("b", 8),
            ("c", 7),
            ("d", 6),
            ("e", 5),
            ("f", 4),
        ]));
        assert_eq!(spreaders.entries().len(), TOP_SPREADER_LIMIT);
        assert_eq!(spreaders.entries()[4].id.as_str(), "e");
    }
}
