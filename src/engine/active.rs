use std::collections::{HashMap, HashSet};

use crate::sim::{NodeId, SimulationStep};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveEdges {
    neighbors: HashMap<NodeId, HashSet<NodeId>>,
    path_count: usize,
}

impl ActiveEdges {
    pub fn from_paths(paths: &[(NodeId, NodeId)]) -> Self {
        let mut neighbors: HashMap<NodeId, HashSet<NodeId>> = HashMap::with_capacity(paths.len() * 2);
        for (a, b) in paths {
            neighbors.entry(a.clone()).or_default().insert(b.clone());
            neighbors.entry(b.clone()).or_default().insert(a.clone());
        }

        Self {
            neighbors,
            path_count: paths.len(),
        }
    }

    pub fn from_step(step: &SimulationStep) -> Self {
        Self::from_paths(&step.activation_paths)
    }

    pub fn contains(&self, a: &NodeId, b: &NodeId) -> bool {
        self.neighbors
            .get(a)
            .is_some_and(|targets| targets.contains(b))
    }

    pub fn touches(&self, id: &NodeId) -> bool {
        self.neighbors.contains_key(id)
    }

    pub fn path_count(&self) -> usize {
        self.path_count
    }

    pub fn is_empty(&self) -> bool {
        self.path_count == 0
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn id(value: &str) -> NodeId {
        NodeId::from(value)
    }

    #[test]
    fn both_orientations_are_active() {
        let active = ActiveEdges::from_paths(&[(id("a"), id("b"))]);
        assert!(active.contains(&id("a"), &id("b")));
        assert!(active.contains(&id("b"), &id("a")));
        assert!(!active.contains(&id("a"), &id("c")));
        assert!(active.touches(&id("b")));
        assert!(!active.touches(&id("c")));
    }

    #[test]
    fn hyphenated_ids_do_not_alias() {
        // "a-b" + "c" and "a" + "b-c" would share the key "a-b-c" if joined.
        let active = ActiveEdges::from_paths(&[(id("a-b"), id("c"))]);
        assert!(!active.contains(&id("a"), &id("b-c")));
    }

    #[test]
    fn empty_step_has_no_active_edges() {
        let active = ActiveEdges::from_step(&SimulationStep::default());
        assert!(active.is_empty());
        assert!(!active.contains(&id("a"), &id("b")));
    }

    proptest! {
        #[test]
        fn every_path_is_symmetric(
            paths in prop::collection::vec(("[a-e]{1,2}", "[a-e]{1,2}"), 0..40),
            absent in ("[f-h]{1,2}", "[a-h]{1,2}"),
        ) {
            let paths = paths
                .into_iter()
                .map(|(a, b)| (NodeId::from(a), NodeId::from(b)))
                .collect::<Vec<_>>();
            let active = ActiveEdges::from_paths(&paths);

            for (a, b) in &paths {
                prop_assert!(active.contains(a, b));
                prop_assert!(active.contains(b, a));
            }

            prop_assert!(!active.contains(&NodeId::from(absent.0), &NodeId::from(absent.1)));
        }
    }
}
