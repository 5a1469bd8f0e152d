use std::collections::HashMap;

use crate::sim::{NodeId, Topology};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// `Nano` is the starting value of every slot before ranking and is never
/// left assigned: the three-way partition below covers every rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    Titan,
    Macro,
    Micro,
    Nano,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Self::Titan => "Titan",
            Self::Macro => "Macro",
            Self::Micro => "Micro",
            Self::Nano => "Nano",
        }
    }

    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Titan => "Titan",
            Self::Macro => "Macro",
            Self::Micro | Self::Nano => "User",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Self::Titan => Rgb(217, 119, 6),
            Self::Macro => Rgb(220, 38, 38),
            Self::Micro => Rgb(5, 150, 105),
            Self::Nano => Rgb(156, 163, 175),
        }
    }

    pub fn weight(self) -> f32 {
        match self {
            Self::Titan => 18.0,
            Self::Macro => 10.0,
            Self::Micro => 6.0,
            Self::Nano => 4.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierCounts {
    pub titan: usize,
    pub macro_count: usize,
    pub micro: usize,
}

impl TierCounts {
    pub fn for_node_count(node_count: usize) -> Self {
        let titan = node_count.div_ceil(50).min(node_count);
        let macro_count = node_count.div_ceil(10).min(node_count - titan);
        Self {
            titan,
            macro_count,
            micro: node_count - titan - macro_count,
        }
    }

    pub fn tier_for_rank(&self, rank: usize) -> Tier {
        if rank < self.titan {
            Tier::Titan
        } else if rank < self.titan + self.macro_count {
            Tier::Macro
        } else {
            Tier::Micro
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub tiers: Vec<Tier>,
    pub degrees: Vec<usize>,
    pub ranking: Vec<usize>,
    pub counts: TierCounts,
}

impl Classification {
    pub fn tier_of(&self, index: usize) -> Option<Tier> {
        self.tiers.get(index).copied()
    }
}

pub fn degree_map(topology: &Topology) -> HashMap<&NodeId, usize> {
    let mut degrees: HashMap<&NodeId, usize> = HashMap::with_capacity(topology.node_count());
    for edge in &topology.links {
        *degrees.entry(&edge.source).or_default() += 1;
        *degrees.entry(&edge.target).or_default() += 1;
    }
    degrees
}

pub fn classify(topology: &Topology) -> Classification {
    let by_id = degree_map(topology);
    let degrees = topology
        .nodes
        .iter()
        .map(|node| by_id.get(&node.id).copied().unwrap_or(0))
        .collect::<Vec<_>>();

    // `sort_by` is stable: equal degrees keep dataset order.
    let mut ranking = (0..degrees.len()).collect::<Vec<_>>();
    ranking.sort_by(|a, b| degrees[*b].cmp(&degrees[*a]));

    let counts = TierCounts::for_node_count(degrees.len());
    let mut tiers = vec![Tier::Nano; degrees.len()];
    for (rank, &index) in ranking.iter().enumerate() {
        tiers[index] = counts.tier_for_rank(rank);
    }

    Classification {
        tiers,
        degrees,
        ranking,
        counts,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::sim::{RawEdge, RawNode};

    fn topology(node_count: usize, edges: &[(u64, u64)]) -> Topology {
        Topology {
            nodes: (0..node_count as u64).map(RawNode::new).collect(),
            links: edges
                .iter()
                .map(|&(source, target)| RawEdge::new(source, target))
                .collect(),
        }
    }

    #[test]
    fn ten_nodes_split_one_one_eight() {
        let counts = TierCounts::for_node_count(10);
        assert_eq!(
            counts,
            TierCounts {
                titan: 1,
                macro_count: 1,
                micro: 8
            }
        );
        assert_eq!(counts.tier_for_rank(0), Tier::Titan);
        assert_eq!(counts.tier_for_rank(1), Tier::Macro);
        assert!((2..10).all(|rank| counts.tier_for_rank(rank) == Tier::Micro));
    }

    #[test]
    fn ceilings_are_exact_at_float_unfriendly_sizes() {
        assert_eq!(TierCounts::for_node_count(150).titan, 3);
        assert_eq!(TierCounts::for_node_count(150).macro_count, 15);
        assert_eq!(TierCounts::for_node_count(151).titan, 4);
        assert_eq!(TierCounts::for_node_count(250).titan, 5);
        assert_eq!(TierCounts::for_node_count(250).macro_count, 25);
    }

    #[test]
    fn star_center_is_titan_and_next_is_macro() {
        let topology = topology(4, &[(0, 1), (0, 2), (0, 3)]);
        let classification = classify(&topology);

        assert_eq!(classification.degrees, vec![3, 1, 1, 1]);
        assert_eq!(
            classification.tiers,
            vec![Tier::Titan, Tier::Macro, Tier::Micro, Tier::Micro]
        );
    }

    #[test]
    fn self_loops_count_twice() {
        let topology = topology(2, &[(1, 1)]);
        let classification = classify(&topology);
        assert_eq!(classification.degrees, vec![0, 2]);
        assert_eq!(classification.ranking, vec![1, 0]);
    }

    #[test]
    fn ties_keep_dataset_order() {
        let topology = topology(5, &[(4, 3), (2, 1)]);
        let classification = classify(&topology);
        assert_eq!(classification.ranking, vec![1, 2, 3, 4, 0]);
    }

    #[test]
    fn empty_topology_classifies_to_nothing() {
        let classification = classify(&Topology::default());
        assert!(classification.tiers.is_empty());
        assert_eq!(classification.counts.titan, 0);
    }

    #[test]
    fn render_prefixes_and_styles() {
        assert_eq!(Tier::Micro.id_prefix(), "User");
        assert!(Tier::Titan.weight() > Tier::Macro.weight());
        assert!(Tier::Macro.weight() > Tier::Micro.weight());
        assert_ne!(Tier::Titan.color(), Tier::Macro.color());
    }

    fn arb_topology() -> impl Strategy<Value = Topology> {
        (0usize..120).prop_flat_map(|node_count| {
            let max = node_count.max(1) as u64;
            prop::collection::vec((0..max, 0..max), 0..300).prop_map(move |edges| {
                let edges = if node_count == 0 { Vec::new() } else { edges };
                topology(node_count, &edges)
            })
        })
    }

    proptest! {
        #[test]
        fn tiers_partition_every_node(node_count in 0usize..5000) {
            let counts = TierCounts::for_node_count(node_count);
            prop_assert_eq!(counts.titan + counts.macro_count + counts.micro, node_count);
            if node_count >= 10 {
                prop_assert_eq!(counts.titan, (node_count * 2).div_ceil(100));
                prop_assert_eq!(counts.macro_count, node_count.div_ceil(10));
            }
        }

        #[test]
        fn classification_is_deterministic_and_never_nano(topology in arb_topology()) {
            let first = classify(&topology);
            let second = classify(&topology);
            prop_assert!(!first.tiers.contains(&Tier::Nano));
            prop_assert_eq!(
                first.tiers.iter().filter(|tier| **tier == Tier::Titan).count(),
                first.counts.titan
            );
            prop_assert_eq!(first, second);
        }
    }
}
