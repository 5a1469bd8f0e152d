use std::collections::BTreeSet;

use tracing::debug;

use crate::sim::NodeId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockList {
    ids: BTreeSet<NodeId>,
}

impl BlockList {
    pub fn toggle(&mut self, id: NodeId) -> bool {
        let blocked = if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        };
        debug!(%id, blocked, total = self.ids.len(), "block list toggled");
        blocked
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.ids.iter()
    }

    pub fn snapshot(&self) -> BTreeSet<NodeId> {
        self.ids.clone()
    }
}
