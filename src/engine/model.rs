use std::collections::HashMap;

use tracing::warn;

use crate::sim::{NodeId, Topology};

use super::active::ActiveEdges;
use super::blocklist::BlockList;
use super::classify::{Classification, Rgb, Tier};

#[derive(Clone, Debug, PartialEq)]
pub struct RenderNode {
    pub render_id: String,
    pub original_id: NodeId,
    pub tier: Tier,
    pub degree: usize,
}

impl RenderNode {
    pub fn color(&self) -> Rgb {
        self.tier.color()
    }

    pub fn weight(&self) -> f32 {
        self.tier.weight()
    }

    pub fn is_blocked(&self, blocked: &BlockList) -> bool {
        blocked.contains(&self.original_id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderEdge {
    pub source: String,
    pub target: String,
}

pub fn render_id(tier: Tier, original_id: &NodeId) -> String {
    format!("{}-{}", tier.id_prefix(), original_id)
}

#[derive(Clone, Debug, Default)]
pub struct RenderGraph {
    nodes: Vec<RenderNode>,
    edges: Vec<RenderEdge>,
    edge_origins: Vec<(NodeId, NodeId)>,
    render_by_original: HashMap<NodeId, String>,
    index_by_render_id: HashMap<String, usize>,
    dangling_edges: usize,
}

impl RenderGraph {
    pub fn build(topology: &Topology, classification: &Classification) -> Self {
        let mut nodes = Vec::with_capacity(topology.node_count());
        let mut render_by_original = HashMap::with_capacity(topology.node_count());
        let mut index_by_render_id = HashMap::with_capacity(topology.node_count());

        for (index, raw) in topology.nodes.iter().enumerate() {
            if render_by_original.contains_key(&raw.id) {
                warn!(id = %raw.id, "duplicate node id in topology, keeping first occurrence");
                continue;
            }

            let tier = classification.tier_of(index).unwrap_or(Tier::Micro);
            let id = render_id(tier, &raw.id);

            render_by_original.insert(raw.id.clone(), id.clone());
            index_by_render_id.insert(id.clone(), nodes.len());
            nodes.push(RenderNode {
                render_id: id,
                original_id: raw.id.clone(),
                tier,
                degree: classification.degrees.get(index).copied().unwrap_or(0),
            });
        }

        let mut dangling_edges = 0usize;
        let mut edges = Vec::with_capacity(topology.edge_count());
        let mut edge_origins = Vec::with_capacity(topology.edge_count());
        for raw in &topology.links {
            let source = render_by_original.get(&raw.source);
            let target = render_by_original.get(&raw.target);
            if source.is_none() || target.is_none() {
                dangling_edges += 1;
            }

            edges.push(RenderEdge {
                source: source.cloned().unwrap_or_else(|| raw.source.to_string()),
                target: target.cloned().unwrap_or_else(|| raw.target.to_string()),
            });
            edge_origins.push((raw.source.clone(), raw.target.clone()));
        }

        if dangling_edges > 0 {
            warn!(
                count = dangling_edges,
                "edges reference ids missing from the node list; endpoints passed through unchanged"
            );
        }

        Self {
            nodes,
            edges,
            edge_origins,
            render_by_original,
            index_by_render_id,
            dangling_edges,
        }
    }

    pub fn nodes(&self) -> &[RenderNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[RenderEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn dangling_edge_count(&self) -> usize {
        self.dangling_edges
    }

    pub fn render_id_for(&self, original_id: &NodeId) -> Option<&str> {
        self.render_by_original.get(original_id).map(String::as_str)
    }

    pub fn index_of(&self, render_id: &str) -> Option<usize> {
        self.index_by_render_id.get(render_id).copied()
    }

    pub fn edge_endpoints(&self, edge_index: usize) -> Option<(usize, usize)> {
        let edge = self.edges.get(edge_index)?;
        self.index_of(&edge.source).zip(self.index_of(&edge.target))
    }

    pub fn is_edge_active(&self, edge_index: usize, active: &ActiveEdges) -> bool {
        self.edge_origins
            .get(edge_index)
            .is_some_and(|(source, target)| active.contains(source, target))
    }

    pub fn tier_count(&self, tier: Tier) -> usize {
        self.nodes.iter().filter(|node| node.tier == tier).count()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use crate::engine::classify::classify;
    use crate::sim::{RawEdge, RawNode};

    fn star() -> Topology {
        Topology {
            nodes: ["hub", "a", "b", "c"].into_iter().map(RawNode::new).collect(),
            links: vec![
                RawEdge::new("hub", "a"),
                RawEdge::new("hub", "b"),
                RawEdge::new("c", "hub"),
            ],
        }
    }

    #[test]
    fn render_ids_follow_tier_prefixes() {
        let topology = star();
        let graph = RenderGraph::build(&topology, &classify(&topology));
        let ids = graph
            .nodes()
            .iter()
            .map(|node| node.render_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["Titan-hub", "Macro-a", "User-b", "User-c"]);
        assert_eq!(graph.tier_count(Tier::Micro), 2);
    }

    #[test]
    fn edges_are_remapped_through_the_translation_table() {
        let topology = star();
        let graph = RenderGraph::build(&topology, &classify(&topology));
        assert_eq!(
            graph.edges()[2],
            RenderEdge {
                source: "User-c".to_owned(),
                target: "Titan-hub".to_owned()
            }
        );
        assert_eq!(graph.dangling_edge_count(), 0);
        assert!((0..graph.edge_count()).all(|index| graph.edge_endpoints(index).is_some()));
    }

    #[test]
    fn unknown_endpoints_pass_through() {
        let mut topology = star();
        topology.links.push(RawEdge::new("a", "ghost"));
        let graph = RenderGraph::build(&topology, &classify(&topology));

        let edge = graph.edges().last().unwrap();
        assert_eq!(edge.source, "Macro-a");
        assert_eq!(edge.target, "ghost");
        assert_eq!(graph.dangling_edge_count(), 1);
        assert_eq!(graph.edge_endpoints(graph.edge_count() - 1), None);
    }

    #[test]
    fn duplicate_ids_keep_the_first_node() {
        let mut topology = star();
        topology.nodes.push(RawNode::new("a"));
        let graph = RenderGraph::build(&topology, &classify(&topology));
        assert_eq!(graph.node_count(), 4);
    }

    #[test]
    fn activation_lookup_uses_original_ids() {
        let topology = star();
        let graph = RenderGraph::build(&topology, &classify(&topology));
        let active = ActiveEdges::from_paths(&[(NodeId::from("a"), NodeId::from("hub"))]);

        assert!(graph.is_edge_active(0, &active));
        assert!(!graph.is_edge_active(1, &active));
        assert!(!graph.is_edge_active(99, &active));
    }

    #[test]
    fn blocked_flag_reads_the_block_list() {
        let topology = star();
        let graph = RenderGraph::build(&topology, &classify(&topology));
        let mut blocked = BlockList::default();
        blocked.toggle(NodeId::from("b"));

        let flags = graph
            .nodes()
            .iter()
            .map(|node| node.is_blocked(&blocked))
            .collect::<Vec<_>>();
        assert_eq!(flags, [false, false, true, false]);
    }

    proptest! {
        #[test]
        fn render_ids_are_injective_and_reversible(
            ids in prop::collection::hash_set("[a-z0-9-]{1,6}", 0..80),
            edge_seed in prop::collection::vec((0usize..80, 0usize..80), 0..120),
        ) {
            let ids = ids.into_iter().collect::<Vec<_>>();
            let links = if ids.is_empty() {
                Vec::new()
            } else {
                edge_seed
                    .iter()
                    .map(|&(a, b)| RawEdge::new(ids[a % ids.len()].as_str(), ids[b % ids.len()].as_str()))
                    .collect()
            };
            let topology = Topology {
                nodes: ids.iter().map(|id| RawNode::new(id.as_str())).collect(),
                links,
            };
            let graph = RenderGraph::build(&topology, &classify(&topology));

            let unique = graph
                .nodes()
                .iter()
                .map(|node| node.render_id.as_str())
                .collect::<HashSet<_>>();
            prop_assert_eq!(unique.len(), ids.len());

            for id in &ids {
                let original = NodeId::from(id.as_str());
                let render = graph.render_id_for(&original).unwrap();
                let index = graph.index_of(render).unwrap();
                prop_assert_eq!(&graph.nodes()[index].original_id, &original);
            }
        }
    }
}
