//! Revenue command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::feed::{self, FeedArgs, FeedOutput};
use crate::output;

#[derive(Args, Debug)]
pub struct RevenueArgs {
    #[command(flatten)]
    pub feed: FeedArgs,
}

pub async fn run(args: RevenueArgs) -> Result<()> {
    let feeds = feed::open_feeds(&args.feed)?;
    let state = feed::load(&feeds.revenue_trigger(), args.feed.pages).await?;
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
        eprintln!("{}", "No revenue distributions found.".dimmed());
        return Ok(());
    }

    for item in &state.items {
        let when = item
            .record
            .distributed_at_utc()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>8}  {}  {:>20}  token {}  {}",
            format!("#{}", item.key()).bold(),
            when,
            item.record.amount,
            item.token_id(),
            output::metadata(item.location(), item.is_resolved()),
        );
    }

    println!();
    output::field("Total", &summary.total.to_string());
    output::field("Records", &format!("{} of {}", summary.records, state.total));
    output::field("Tokens", &summary.tokens.to_string());
    if let Some(latest) = summary.latest {
        output::field("Latest", &latest.to_rfc3339());
    }
    for (token, amount) in &summary.per_token {
        output::field(&format!("  token {}", token), &amount.to_string());
    }

    if state.has_more {
        eprintln!("{}", "More revenue available, raise --pages to load them.".dimmed());
    }

    Ok(())
}
