use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::error::DatasetError;
use super::topology::Topology;

pub fn load_dataset(path: &Path) -> Result<Topology, DatasetError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dataset(&raw)
}

pub fn parse_dataset(raw: &str) -> Result<Topology, DatasetError> {
    let parsed: Value = serde_json::from_str(raw)?;
    let Value::Object(mut object) = parsed else {
        return Err(DatasetError::MissingArrays);
    };

    if !object.get("nodes").is_some_and(Value::is_array) {
        return Err(DatasetError::MissingArrays);
    }
    let links_key = ["links", "edges"]
        .into_iter()
        .find(|key| object.get(*key).is_some_and(Value::is_array))
        .ok_or(DatasetError::MissingArrays)?;
    let links = object
        .remove(links_key)
        .ok_or(DatasetError::MissingArrays)?;
    object.remove("links");
    object.remove("edges");
    object.insert("links".to_owned(), links);

    let topology = Topology::deserialize(Value::Object(object))?;

    let mut seen = HashSet::with_capacity(topology.node_count());
    for node in &topology.nodes {
        if !seen.insert(&node.id) {
            return Err(DatasetError::DuplicateNode(node.id.clone()));
        }
    }

    Ok(topology)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nodes_and_links() {
        let topology =
            parse_dataset(r#"{"nodes":[{"id":"a"},{"id":"b"}],"links":[{"source":"a","target":"b"}]}"#)
                .unwrap();
        assert_eq!(topology.node_count(), 2);
        assert_eq!(topology.edge_count(), 1);
    }

    #[test]
    fn accepts_edges_alias() {
        let topology = parse_dataset(r#"{"nodes":[{"id":1}],"edges":[]}"#).unwrap();
        assert_eq!(topology.node_count(), 1);
    }

    #[test]
    fn links_win_when_both_link_arrays_are_present() {
        let topology = parse_dataset(
            r#"{"nodes":[{"id":"a"},{"id":"b"}],"links":[{"source":"a","target":"b"}],"edges":[]}"#,
        )
        .unwrap();
        assert_eq!(topology.edge_count(), 1);

        let topology = parse_dataset(
            r#"{"nodes":[{"id":"a"},{"id":"b"}],"links":null,"edges":[{"source":"b","target":"a"}]}"#,
        )
        .unwrap();
        assert_eq!(topology.edge_count(), 1);
        assert_eq!(topology.links[0].source.as_str(), "b");
    }

    #[test]
    fn rejects_missing_arrays() {
        assert!(matches!(
            parse_dataset(r#"{"nodes":[{"id":1}]}"#),
            Err(DatasetError::MissingArrays)
        ));
        assert!(matches!(
            parse_dataset(r#"{"nodes":{},"links":[]}"#),
            Err(DatasetError::MissingArrays)
        ));
        assert!(matches!(
            parse_dataset(r#"[1, 2, 3]"#),
            Err(DatasetError::MissingArrays)
        ));
    }

    #[test]
    fn rejects_unparseable_json() {
        assert!(matches!(
            parse_dataset("{nodes: oops"),
            Err(DatasetError::Json(_))
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let error = parse_dataset(r#"{"nodes":[{"id":1},{"id":"1"}],"links":[]}"#).unwrap_err();
        assert!(matches!(error, DatasetError::DuplicateNode(id) if id.as_str() == "1"));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let error = load_dataset(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(error.to_string().contains("/definitely/not/here.json"));
    }
}
