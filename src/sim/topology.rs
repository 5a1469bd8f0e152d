use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Datasets carry either strings or numbers; both are normalized to the
/// decimal/string form so `7` and `"7"` name the same node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
            Float(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Unsigned(value) => Self(value.to_string()),
            RawId::Signed(value) => Self(value.to_string()),
            RawId::Float(value) if value == 0.0 => Self("0".to_owned()),
            RawId::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                Self(format!("{value:.0}"))
            }
            RawId::Float(value) => Self(value.to_string()),
        })
    }
}

fn endpoint<'de, D>(deserializer: D) -> Result<NodeId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawEndpoint {
        Bare(NodeId),
        Embedded { id: NodeId },
    }

    Ok(match RawEndpoint::deserialize(deserializer)? {
        RawEndpoint::Bare(id) | RawEndpoint::Embedded { id } => id,
    })
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawNode {
    pub id: NodeId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawNode {
    #[cfg(test)]
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawEdge {
    #[serde(deserialize_with = "endpoint")]
    pub source: NodeId,
    #[serde(deserialize_with = "endpoint")]
    pub target: NodeId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawEdge {
    #[cfg(test)]
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Topology {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default, alias = "edges")]
    pub links: Vec<RawEdge>,
}

impl Topology {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.links.len()
    }
}
