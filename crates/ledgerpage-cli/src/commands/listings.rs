//! Listings command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::feed::{self, FeedArgs, FeedOutput};
use crate::output;

#[derive(Args, Debug)]
pub struct ListingsArgs {
    #[command(flatten)]
    pub feed: FeedArgs,
}

pub async fn run(args: ListingsArgs) -> Result<()> {
    let feeds = feed::open_feeds(&args.feed)?;
    let state = feed::load(&feeds.listings_trigger(), args.feed.pages).await?;
    let summary = state.summary();

    if args.feed.json {
        return output::json(&FeedOutput {
            items: &state.items,
            summary,
            total: state.total,
            has_more: state.has_more,
        });
    }

    if state.is_empty() {
        eprintln!("{}", "No listings found.".dimmed());
        return Ok(());
    }

    for item in &state.items {
        println!(
            "{:>8}  {:>20}  {}  {}",
            format!("#{}", item.key()).bold(),
            item.record.price,
            output::metadata(item.name(), item.is_resolved()),
            output::metadata(item.location(), item.is_resolved()),
        );
    }

    println!();
    output::field("Listings", &format!("{} of {}", summary.listings, state.total));
    if let Some(floor) = summary.floor {
        output::field("Floor", &floor.to_string());
    }
    output::field("Total value", &summary.total_value.to_string());
    output::field("Chargers", &summary.chargers.to_string());

    if summary.unresolved > 0 {
        output::warning(&format!("{} listings without metadata", summary.unresolved));
    }
    if state.has_more {
        eprintln!("{}", "More listings available, raise --pages to load them.".dimmed());
    }

    Ok(())
}
