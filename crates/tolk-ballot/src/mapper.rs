use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use tolk_types::{ScopeKey, TranslationSource};

use crate::error::{BallotError, Result};
use crate::letters;

/// Fixed bijection between 1-based display positions and sources for one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMapping {
    scope: ScopeKey,
    /// `by_position[i]` is shown as position `i + 1`.
    by_position: Vec<TranslationSource>,
    positions: HashMap<TranslationSource, usize>,
}

impl DisplayMapping {
    fn from_order(scope: ScopeKey, by_position: Vec<TranslationSource>) -> Self {
        let positions = by_position
            .iter()
            .enumerate()
            .map(|(idx, source)| (source.clone(), idx + 1))
            .collect();
        Self {
            scope,
            by_position,
            positions,
        }
    }

    pub fn scope(&self) -> &ScopeKey {
        &self.scope
    }

    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }

    pub fn source_at(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|idx| self.by_position.get(idx))
            .map(String::as_str)
    }

    pub fn position_of(&self, source: &str) -> Option<usize> {
        self.positions.get(source).copied()
    }

    pub fn contains(&self, source: &str) -> bool {
        self.positions.contains_key(source)
    }

    /// `"Model B"`, or `"Model B (gpt-4o)"` when revealed.
    pub fn display_name(&self, source: &str, reveal: bool) -> Option<String> {
        let position = self.position_of(source)?;
        let name = letters::display_name(position);
        Some(if reveal {
            format!("{} ({})", name, source)
        } else {
            name
        })
    }

    /// Sources in display order.
    pub fn ordered_sources(&self) -> impl Iterator<Item = &str> {
        self.by_position.iter().map(String::as_str)
    }
}

/// Per-session cache of display mappings keyed by scope.
///
/// A mapping is drawn once per scope and then returned unchanged until
/// [`AnonymizationMapper::reset`] is called for that scope.
#[derive(Debug)]
pub struct AnonymizationMapper {
    mappings: HashMap<ScopeKey, DisplayMapping>,
    rng: StdRng,
}

impl AnonymizationMapper {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            mappings: HashMap::new(),
            rng,
        }
    }

    /// Return the scope's mapping, drawing a uniform permutation of `sources` on first use.
    ///
    /// `sources` is ignored when the scope already has a mapping.
    pub fn assign<I, S>(&mut self, scope: ScopeKey, sources: I) -> Result<&DisplayMapping>
    where
        I: IntoIterator<Item = S>,
        S: Into<TranslationSource>,
    {
        match self.mappings.entry(scope) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                let unique: BTreeSet<TranslationSource> =
                    sources.into_iter().map(Into::into).collect();
                if unique.is_empty() {
                    return Err(BallotError::EmptySourceSet);
                }
                let mut order: Vec<TranslationSource> = unique.into_iter().collect();
                order.shuffle(&mut self.rng);

                tracing::debug!(scope = %entry.key(), sources = order.len(), "Display mapping drawn");
                let mapping = DisplayMapping::from_order(entry.key().clone(), order);
                Ok(&*entry.insert(mapping))
            }
        }
    }

    pub fn get(&self, scope: &ScopeKey) -> Option<&DisplayMapping> {
        self.mappings.get(scope)
    }

    fn mapping(&self, scope: &ScopeKey) -> Result<&DisplayMapping> {
        self.mappings
            .get(scope)
            .ok_or_else(|| BallotError::UnknownScope(scope.clone()))
    }

    /// Callers must only pass `reveal = true` after checking the viewer is entitled to it.
    pub fn resolve_display_name(&self, scope: &ScopeKey, source: &str, reveal: bool) -> Result<String> {
        self.mapping(scope)?
            .display_name(source, reveal)
            .ok_or_else(|| BallotError::UnknownSource {
                scope: scope.clone(),
                model: source.to_string(),
            })
    }

    pub fn resolve_source(&self, scope: &ScopeKey, display_name: &str) -> Result<TranslationSource> {
        let mapping = self.mapping(scope)?;
        let position = letters::parse_display_name(display_name)
            .ok_or_else(|| BallotError::InvalidDisplayName(display_name.to_string()))?;
        mapping
            .source_at(position)
            .map(str::to_string)
            .ok_or_else(|| BallotError::OutOfRange {
                display_name: display_name.to_string(),
                sources: mapping.len(),
            })
    }

    /// Discard the scope's mapping so the next `assign` draws a fresh one.
    pub fn reset(&mut self, scope: &ScopeKey) -> Option<DisplayMapping> {
        let removed = self.mappings.remove(scope);
        if removed.is_some() {
            tracing::debug!(scope = %scope, "Display mapping reset");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl Default for AnonymizationMapper {
    fn default() -> Self {
        Self::new()
    }
}
