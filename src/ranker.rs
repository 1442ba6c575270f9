//! Ranked city search.
//!
//! A query is widened into a handful of normalized variants, each variant is
//! looked up concurrently, and the merged candidates are scored against the
//! raw query on a fixed priority ladder.

use crate::search::{Candidate, RankedResult};
use anyhow::Result;
use std::collections::HashMap;
use std::thread;
use tracing::{debug, warn};

pub const MAX_RESULTS: usize = 5;

/// One geocoding search for an exact term.
pub trait Lookup: Sync {
    fn lookup(&self, term: &str) -> Result<Vec<Candidate>>;
}

impl<F> Lookup for F
where
    F: Fn(&str) -> Result<Vec<Candidate>> + Sync,
{
    fn lookup(&self, term: &str) -> Result<Vec<Candidate>> {
        self(term)
    }
}

/// Search for `query` and return at most [`MAX_RESULTS`] places, best first.
///
/// Lookup failures are logged and otherwise ignored, so a total failure looks
/// the same as no matches.
pub fn search<L: Lookup + ?Sized>(query: &str, lookup: &L) -> Vec<RankedResult> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let variants = query_variants(query);
    debug!("Searching {} variants of {query:?}", variants.len());
    let batches = lookup_all(&variants, lookup);
    let candidates = merge(batches);
    rank(candidates, query)
}

/// The distinct terms looked up for a query, in lookup order.
pub fn query_variants(query: &str) -> Vec<String> {
    let lower = query.to_lowercase();
    let mut variants = vec![
        query.to_string(),
        lower.clone(),
        letters_and_spaces(query),
        strip_whitespace(query),
        collapse_whitespace(query),
    ];
    variants.extend(lower.split_whitespace().map(str::to_string));
    variants.push(strip_whitespace(&lower));

    let mut distinct: Vec<String> = Vec::with_capacity(variants.len());
    for variant in variants {
        if variant.trim().is_empty() || distinct.contains(&variant) {
            continue;
        }
        distinct.push(variant);
    }
    distinct
}

fn lookup_all<L: Lookup + ?Sized>(variants: &[String], lookup: &L) -> Vec<Vec<Candidate>> {
    thread::scope(|scope| {
        let handles: Vec<_> = variants
            .iter()
            .map(|term| (term, scope.spawn(move || lookup.lookup(term))))
            .collect();

        handles
            .into_iter()
            .map(|(term, handle)| match handle.join() {
                Ok(Ok(candidates)) => candidates,
                Ok(Err(err)) => {
                    warn!("Lookup for {term:?} failed: {err:#}");
                    Vec::new()
                }
                Err(_) => {
                    warn!("Lookup for {term:?} panicked");
                    Vec::new()
                }
            })
            .collect()
    })
}

/// Flatten batches into unique places. A repeated coordinate key keeps its
/// first position but takes the latest record.
fn merge(batches: Vec<Vec<Candidate>>) -> Vec<Candidate> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Candidate> = Vec::new();
    for candidate in batches.into_iter().flatten() {
        let key = candidate.coordinate_key();
        if let Some(&pos) = positions.get(&key) {
            merged[pos] = candidate;
        } else {
            positions.insert(key, merged.len());
            merged.push(candidate);
        }
    }
    merged
}

fn rank(candidates: Vec<Candidate>, query: &str) -> Vec<RankedResult> {
    let mut ranked: Vec<RankedResult> = candidates
        .into_iter()
        .map(|candidate| RankedResult {
            score: relevance_score(&candidate.name, query),
            label: candidate.label(),
            candidate,
        })
        .collect();
    // sort_by is stable, so equal scores keep fetch order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(MAX_RESULTS);
    ranked
}

/// Score how well a place name matches a search term, from 0 to 100.
pub fn relevance_score(name: &str, term: &str) -> f64 {
    let name = normalize(name);
    let term = normalize(term);
    let name_compact = strip_whitespace(&name);
    let term_compact = strip_whitespace(&term);

    if name == term {
        return 100.0;
    }
    if name_compact == term_compact {
        return 95.0;
    }
    if name.starts_with(&term) {
        return 90.0;
    }
    if name_compact.starts_with(&term_compact) {
        return 85.0;
    }
    if name.contains(&term) {
        return 80.0;
    }
    if name_compact.contains(&term_compact) {
        return 75.0;
    }

    let name_words: Vec<&str> = name.split_whitespace().collect();
    let term_words: Vec<&str> = term.split_whitespace().collect();
    if term_words.is_empty() {
        return 0.0;
    }
    let matching = term_words
        .iter()
        .filter(|t| name_words.iter().any(|n| n.contains(*t) || t.contains(*n)))
        .count();
    matching as f64 / term_words.len() as f64 * 70.0
}

fn normalize(s: &str) -> String {
    letters_and_spaces(&s.to_lowercase())
}

fn letters_and_spaces(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect()
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
