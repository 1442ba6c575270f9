use anyhow::{anyhow, Result};
use skyglance::ranker::{query_variants, search, Lookup, MAX_RESULTS};
use skyglance::search::{Candidate, RankedResult};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;

fn place(
    name: &str,
    country: &str,
    admin1: Option<&str>,
    latitude: f64,
    longitude: f64,
) -> Candidate {
    Candidate {
        id: None,
        name: name.to_string(),
        latitude,
        longitude,
        country: country.to_string(),
        country_code: None,
        admin1: admin1.map(str::to_string),
        timezone: None,
    }
}

/// Answers every term with the same places and counts the calls.
struct FixedLookup {
    places: Vec<Candidate>,
    calls: AtomicUsize,
}

impl FixedLookup {
    fn new(places: Vec<Candidate>) -> Self {
        Self {
            places,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Lookup for FixedLookup {
    fn lookup(&self, _term: &str) -> Result<Vec<Candidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.places.clone())
    }
}

struct FailingLookup {
    calls: AtomicUsize,
}

impl Lookup for FailingLookup {
    fn lookup(&self, term: &str) -> Result<Vec<Candidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("connection refused while searching {term}"))
    }
}

fn many_places() -> Vec<Candidate> {
    vec![
        place("Springfield", "United States", Some("Illinois"), 39.80172, -89.64371),
        place("Springfield", "United States", Some("Missouri"), 37.21533, -93.29824),
        place("Springfield", "United States", Some("Massachusetts"), 42.10148, -72.58981),
        place("Springfield Gardens", "United States", Some("New York"), 40.66312, -73.76221),
        place("West Springfield", "United States", Some("Massachusetts"), 42.10704, -72.62037),
        place("Springfield", "Australia", Some("Queensland"), -27.65386, 152.91651),
        place("Spring", "United States", Some("Texas"), 30.07994, -95.41716),
        // Same place as the first one, spelled differently
        place("Springfield City", "United States", Some("Illinois"), 39.80172, -89.64371),
    ]
}

fn assert_well_formed(results: &[RankedResult]) {
    assert!(results.len() <= MAX_RESULTS);
    let keys: HashSet<String> = results.iter().map(|r| r.candidate.coordinate_key()).collect();
    assert_eq!(keys.len(), results.len(), "duplicate coordinates in {results:#?}");
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn results_are_bounded_unique_and_ordered() {
    let lookup = FixedLookup::new(many_places());
    for query in ["Springfield", "spring", "west springfield", "gardens", "xyz"] {
        let results = search(query, &lookup);
        assert_well_formed(&results);
    }
    let results = search("Springfield", &lookup);
    assert_eq!(results.len(), MAX_RESULTS);
    assert_eq!(results[0].score, 100.0);
}

#[test]
fn same_place_with_two_spellings_collapses() {
    let lookup = FixedLookup::new(many_places());
    let results = search("Springfield", &lookup);
    let illinois: Vec<&RankedResult> = results
        .iter()
        .filter(|r| r.candidate.coordinate_key() == "39.80172--89.64371")
        .collect();
    assert_eq!(illinois.len(), 1);
    // The later record wins, scored against the raw query
    assert_eq!(illinois[0].candidate.name, "Springfield City");
    assert_eq!(illinois[0].score, 90.0);
}

#[test]
fn identical_input_gives_identical_output() {
    let lookup = FixedLookup::new(many_places());
    let first = search("springfield", &lookup);
    let second = search("springfield", &lookup);
    assert_eq!(first, second);
}

#[test]
fn exact_matches_tie_in_fetch_order() {
    let lookup = FixedLookup::new(vec![
        place("Paris", "France", None, 48.85341, 2.3488),
        place("Paris", "United States", Some("Texas"), 33.66094, -95.55551),
    ]);
    let results = search("Paris", &lookup);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].score, 100.0);
    assert_eq!(results[1].score, 100.0);
    assert_eq!(results[0].label, "Paris, France");
    assert_eq!(results[1].label, "Paris, United States, Texas");
}

#[test]
fn prefix_beats_substring() {
    let lookup = FixedLookup::new(vec![
        place("Los Sangeles", "United States", Some("California"), 34.05223, -118.24368),
        place("San Jose", "United States", Some("California"), 37.33939, -121.89496),
    ]);
    let results = search("San", &lookup);
    assert_eq!(results[0].candidate.name, "San Jose");
    assert_eq!(results[0].score, 90.0);
    assert_eq!(results[1].candidate.name, "Los Sangeles");
    assert_eq!(results[1].score, 80.0);
}

#[test]
fn empty_query_makes_no_lookups() {
    let lookup = FixedLookup::new(many_places());
    assert!(search("", &lookup).is_empty());
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn total_failure_is_an_empty_result() {
    let lookup = FailingLookup {
        calls: AtomicUsize::new(0),
    };
    let results = search("Buenos Aires", &lookup);
    assert!(results.is_empty());
    // Every distinct variant was still tried
    assert!(lookup.calls.load(Ordering::SeqCst) > 1);
}

#[test]
fn case_and_whitespace_do_not_matter() {
    let lookup = FixedLookup::new(vec![
        place("York", "United Kingdom", Some("England"), 53.95763, -1.08271),
        place("New York", "United States", Some("New York"), 40.71427, -74.00597),
    ]);
    for query in ["new york", "New York", "NEWYORK"] {
        let results = search(query, &lookup);
        assert_eq!(results[0].candidate.name, "New York", "query {query:?}");
        assert!(results[0].score >= 90.0, "query {query:?}");
    }
}

#[test]
fn lookups_see_every_distinct_variant_once() {
    let lookup = FixedLookup::new(Vec::new());
    search("Rio de Janeiro", &lookup);
    // original, lowercase, stripped, three words, lowercase stripped
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 7);
}

/// Holds every lookup until all of them have started.
struct GatedLookup {
    gate: Barrier,
}

impl Lookup for GatedLookup {
    fn lookup(&self, term: &str) -> Result<Vec<Candidate>> {
        self.gate.wait();
        if term == "Rio de Janeiro" {
            Ok(vec![place("Rio de Janeiro", "Brazil", None, -22.90642, -43.18223)])
        } else {
            Ok(Vec::new())
        }
    }
}

#[test]
fn lookups_run_at_the_same_time() {
    let query = "Rio de Janeiro";
    let lookup = GatedLookup {
        gate: Barrier::new(query_variants(query).len()),
    };
    let results = search(query, &lookup);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 100.0);
}

#[test]
fn a_panicking_lookup_counts_as_failed() {
    let lookup = |term: &str| -> Result<Vec<Candidate>> {
        if term == "oslo" {
            panic!("lookup for {term} blew up");
        }
        Ok(vec![place("Oslo", "Norway", Some("Oslo"), 59.91273, 10.74609)])
    };
    assert_eq!(query_variants("Oslo"), vec!["Oslo", "oslo"]);
    let results = search("Oslo", &lookup);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].label, "Oslo, Norway, Oslo");
}
