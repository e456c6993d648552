//! Basic compound search
//!
//! This example demonstrates the fundamental search operations:
//! - Creating a searcher from a datastore dump
//! - Full search with did-you-mean
//! - Quick (type-ahead) search and article lookup

use cryosearch::{CompoundSearcher, SearchHit};
use cryosearch_data::{DumpLayout, write_sample_dump};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Uses the bundled sample catalog; point `from_dump` at a real dump instead
    let dump = write_sample_dump(DumpLayout::JsonArray)?;
    let searcher = CompoundSearcher::from_dump(dump.path())?;

    println!("Searching for 'glycerol':");
    let response = searcher.search(Some("glycerol")).await?;
    print_search_results(&response.search_results, 3);

    // A typo gets a suggestion, and results through the closest match
    println!("\nSearching for 'tehralose':");
    let response = searcher.search(Some("tehralose")).await?;
    if !response.dym.is_empty() {
        println!("  Did you mean: {} (?q={})", response.dym, response.dym_href);
    }
    print_search_results(&response.search_results, 3);

    println!("\nQuick search for 'glyc':");
    for hit in searcher.quick_search(Some("glyc")).await? {
        println!("  {} -> {}", hit.name, hit.hash);
    }

    if let Some(record) = searcher.article("dmso01").await? {
        println!(
            "\nArticle dmso01: {} (CAS {})",
            record.name.as_deref().unwrap_or("Unknown"),
            record.cas_number.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

fn print_search_results(results: &[SearchHit], limit: usize) {
    for (i, hit) in results.iter().take(limit).enumerate() {
        println!(
            "  {}. {} [{}] - Score: {:.3}",
            i + 1,
            hit.name.as_deref().unwrap_or("Unknown"),
            hit.hash,
            hit.score
        );
    }

    if results.len() > limit {
        println!("  ... and {} more results", results.len() - limit);
    }
}
