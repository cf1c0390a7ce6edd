//! Text and JSON rendering for command results.

use anyhow::Result;
use serde::Serialize;

use catalog_core::{EngineStats, Facets, SearchResult};
use catalog_hybrid::Recommendations;
use catalog_service::{HealthReport, SearchPage};

pub fn print<T: Serialize + ?Sized>(json: bool, value: &T, human: fn(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", human(value));
    }
    Ok(())
}

fn result_line(rank: usize, r: &SearchResult) -> String {
    let mut line = format!(
        "{rank:>3}. {} [{}] score {:.3} (keyword {:.3}, semantic {:.3})",
        r.item.title, r.match_type, r.score, r.keyword_score, r.semantic_score
    );
    let details: Vec<&str> = [r.item.sector(), r.item.location(), r.item.investment_range()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !details.is_empty() {
        line.push_str("\n     ");
        line.push_str(&details.join(" | "));
    }
    line
}

pub fn page(page: &SearchPage) -> String {
    let mut out = format!(
        "{} result(s) for \"{}\" in {:.1} ms",
        page.total_results, page.query, page.processing_time_ms
    );
    for (i, r) in page.results.iter().enumerate() {
        out.push('\n');
        out.push_str(&result_line(i + 1, r));
    }
    out
}

pub fn recommendations(recs: &Recommendations) -> String {
    let mut out = format!("Similar to {} ({})", recs.source_title, recs.source_id);
    for (i, r) in recs.results.iter().enumerate() {
        out.push('\n');
        out.push_str(&result_line(i + 1, r));
    }
    out
}

pub fn lines(values: &[String]) -> String {
    if values.is_empty() {
        return "no suggestions".to_string();
    }
    values.join("\n")
}

pub fn facets(facets: &Facets) -> String {
    let section = |name: &str, values: &[String]| format!("{name} ({}):\n  {}", values.len(), values.join("\n  "));
    [
        section("sectors", &facets.sectors),
        section("locations", &facets.locations),
        section("investment ranges", &facets.investment_ranges),
    ]
    .join("\n")
}

pub fn stats(stats: &EngineStats) -> String {
    format!(
        "items: {}\nembedder: {} ({} dims)\nsearches: {}",
        stats.catalog_size, stats.embedder_id, stats.embedding_dim, stats.total_searches
    )
}

pub fn health(health: &HealthReport) -> String {
    let mut out = format!(
        "status: {}\nuptime: {:.1}s\n{}\nautocomplete terms: {}",
        health.status,
        health.uptime_seconds,
        stats(&health.stats),
        health.autocomplete_terms
    );
    if !health.popular_terms.is_empty() {
        out.push_str("\npopular:");
        for (term, freq) in &health.popular_terms {
            out.push_str(&format!("\n  {term} ({freq})"));
        }
    }
    out
}
