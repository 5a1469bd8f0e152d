use std::collections::HashSet;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use tracing::debug;

use crate::engine::{RenderGraph, classify};
use crate::layout::tiered_layout;
use crate::sim::Topology;

use super::super::Scene;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl Scene {
    pub(in crate::app) fn build(topology: &Topology) -> Self {
        let classification = classify(topology);
        let graph = RenderGraph::build(topology, &classification);
        let positions = tiered_layout(&graph);
        debug!(
            titans = classification.counts.titan,
            macros = classification.counts.macro_count,
            micros = classification.counts.micro,
            "scene built"
        );

        Self { graph, positions }
    }

    pub(in crate::app) fn search(&self, query: &str, limit: usize) -> Vec<usize> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored = self
            .graph
            .nodes()
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let by_original = fuzzy_match_score(&matcher, node.original_id.as_str(), query);
                let by_render = fuzzy_match_score(&matcher, &node.render_id, query);
                by_original.max(by_render).map(|score| (score, index))
            })
            .collect::<Vec<_>>();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.truncate(limit);
        scored.into_iter().map(|(_, index)| index).collect()
    }

    pub(in crate::app) fn search_set(&self, query: &str) -> HashSet<usize> {
        self.search(query, usize::MAX).into_iter().collect()
    }
}
