use serde::Serialize;

use tolk_types::{TranslationSource, VoteTally};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceShare {
    pub source: TranslationSource,
    pub count: u64,
    pub percentage: f64,
}

/// Vote shares per source. Only exists when at least one vote was cast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub total: u64,
    pub shares: Vec<SourceShare>,
}

impl Distribution {
    /// `None` when the tally is empty ("no data").
    pub fn from_tally(tally: &VoteTally) -> Option<Self> {
        let total: u64 = tally.counts.values().sum();
        if total == 0 {
            return None;
        }

        let mut shares: Vec<SourceShare> = tally
            .counts
            .iter()
            .map(|(source, &count)| SourceShare {
                source: source.clone(),
                count,
                percentage: count as f64 / total as f64 * 100.0,
            })
            .collect();
        shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.source.cmp(&b.source)));

        Some(Self { total, shares })
    }

    pub fn share(&self, source: &str) -> Option<&SourceShare> {
        self.shares.iter().find(|s| s.source == source)
    }

    /// Replace each source with a label, e.g. its display name for a blinded viewer.
    ///
    /// Ties are re-ordered by the new label, so the result carries no trace of
    /// the real source ids behind the labels.
    pub fn relabel<F>(mut self, mut label: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        for share in &mut self.shares {
            share.source = label(&share.source);
        }
        self.shares
            .sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.source.cmp(&b.source)));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnonymizationMapper, SessionContext};
    use std::collections::BTreeMap;
    use tolk_types::ScopeGranularity;

    fn tally(pairs: &[(&str, u64)]) -> VoteTally {
        VoteTally::from_counts(
            pairs
                .iter()
                .map(|(s, c)| (s.to_string(), *c))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn test_empty_tally_is_no_data() {
        assert_eq!(Distribution::from_tally(&VoteTally::default()), None);
        assert_eq!(Distribution::from_tally(&tally(&[("gpt-4o", 0)])), None);
    }

    #[test]
    fn test_percentages() {
        let dist = Distribution::from_tally(&tally(&[("gpt-4o", 3), ("claude", 1)])).unwrap();
        assert_eq!(dist.total, 4);
        assert_eq!(dist.shares[0].source, "gpt-4o");
        assert!((dist.shares[0].percentage - 75.0).abs() < f64::EPSILON);
        assert!((dist.share("claude").unwrap().percentage - 25.0).abs() < f64::EPSILON);
        assert!(dist.share("gemini").is_none());
    }

    #[test]
    fn test_ties_sort_by_source() {
        let dist =
            Distribution::from_tally(&tally(&[("gemini", 2), ("claude", 2), ("gpt-4o", 5)])).unwrap();
        let order: Vec<&str> = dist.shares.iter().map(|s| s.source.as_str()).collect();
        assert_eq!(order, vec!["gpt-4o", "claude", "gemini"]);

        let sum: f64 = dist.shares.iter().map(|s| s.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_relabel() {
        let dist = Distribution::from_tally(&tally(&[("gpt-4o", 1)]))
            .unwrap()
            .relabel(|_| "Model A".to_string());
        assert_eq!(dist.shares[0].source, "Model A");
    }

    #[test]
    fn test_relabel_orders_ties_by_label() {
        let labels: BTreeMap<&str, &str> = [
            ("claude", "Model D"),
            ("deepseek", "Model B"),
            ("gemini", "Model A"),
            ("gpt-4o", "Model C"),
        ]
        .into_iter()
        .collect();
        let dist = Distribution::from_tally(&tally(&[
            ("claude", 1),
            ("deepseek", 1),
            ("gemini", 1),
            ("gpt-4o", 3),
        ]))
        .unwrap()
        .relabel(|source| labels[source].to_string());

        let order: Vec<&str> = dist.shares.iter().map(|s| s.source.as_str()).collect();
        assert_eq!(order, vec!["Model C", "Model A", "Model B", "Model D"]);
    }

    #[test]
    fn test_blinded_tie_order_follows_pseudonyms_only() {
        const SOURCES: [&str; 4] = ["gpt-4o", "claude", "gemini", "deepseek"];
        let all_tied = tally(&[("claude", 1), ("deepseek", 1), ("gemini", 1), ("gpt-4o", 1)]);

        for seed in 0..200 {
            let mut session = SessionContext::with_mapper(
                ScopeGranularity::Post,
                AnonymizationMapper::with_seed(seed),
            );
            let scope = session.post_scope("42", "7");
            session.assign(scope, SOURCES).unwrap();
            session.record_vote("42", "7", "gpt-4o");

            let dist = Distribution::from_tally(&all_tied)
                .unwrap()
                .relabel(|source| session.display_name("42", "7", source).unwrap());

            // Only the letter order shows; the revealed suffix sits wherever its letter falls.
            let letters: Vec<&str> = dist
                .shares
                .iter()
                .map(|s| s.source.split(" (").next().unwrap())
                .collect();
            assert_eq!(letters, vec!["Model A", "Model B", "Model C", "Model D"], "seed {}", seed);
        }
    }
}
