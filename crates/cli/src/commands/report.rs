use std::fmt::Write as _;

use sellerbot_core::config::AppConfig;
use sellerbot_core::domain::enrichment::{Enrichment, SentimentTally};
use sellerbot_core::ranking::rank_approved;
use sellerbot_core::{EligibilityEvaluator, SellerRecord};

use crate::commands::{load_runtime, CommandResult};

const RULE: usize = 80;
const SAMPLE_MENTIONS: usize = 2;

pub fn run(config: &AppConfig, limit: Option<usize>) -> CommandResult {
    let runtime = match load_runtime(config) {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::from_error("report", &error),
    };

    CommandResult::text(render(runtime.catalog().sellers(), runtime.evaluator(), limit))
}

/// Onboarding report for approved sellers, best first.
pub fn render(
    sellers: &[SellerRecord],
    evaluator: &EligibilityEvaluator,
    limit: Option<usize>,
) -> String {
    let ranked = rank_approved(sellers, evaluator);
    let candidates = match limit {
        Some(limit) => &ranked[..limit.min(ranked.len())],
        None => &ranked[..],
    };

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, candidates, &evaluator.thresholds().describe());
    out
}

fn write_report(out: &mut String, candidates: &[&SellerRecord], criteria: &str) -> std::fmt::Result {
    let rule = "=".repeat(RULE);
    writeln!(out, "{rule}")?;
    writeln!(out, "SELLER ONBOARDING REPORT")?;
    writeln!(out, "Criteria: {criteria}")?;
    writeln!(out, "{rule}")?;

    for (index, seller) in candidates.iter().enumerate() {
        write_seller(out, index + 1, seller, &rule)?;
    }

    writeln!(out, "\n\n{rule}")?;
    writeln!(out, "SUMMARY")?;
    writeln!(out, "{rule}")?;
    writeln!(out, "\nTotal Candidates Analyzed: {}", candidates.len())?;
    if candidates.is_empty() {
        writeln!(out, "No sellers meet the onboarding criteria.")?;
    } else {
        writeln!(out, "RECOMMENDATION: Proceed with onboarding all {} sellers", candidates.len())?;
    }
    writeln!(out, "{rule}")
}

fn write_seller(
    out: &mut String,
    position: usize,
    seller: &SellerRecord,
    rule: &str,
) -> std::fmt::Result {
    let enrichment = seller.enrichment.clone().unwrap_or_default();
    let tally = enrichment.sentiment_analysis.clone().unwrap_or_else(|| SentimentTally {
        overall_sentiment: enrichment.overall_sentiment().to_string(),
        ..SentimentTally::default()
    });

    writeln!(out, "\n{rule}")?;
    writeln!(out, "#{position}: {} (@{})", seller.user_name, seller.user_id)?;
    writeln!(out, "{rule}")?;

    writeln!(out, "\nCORE METRICS:")?;
    writeln!(out, "   Rating:    {} ★", seller.rating_display())?;
    writeln!(out, "   Sold:      {}", seller.sold_raw)?;
    writeln!(out, "   Reviews:   {}", seller.reviews_raw)?;

    writeln!(out, "\nSENTIMENT ANALYSIS:")?;
    writeln!(out, "   Total Mentions:    {}", tally.total_mentions)?;
    writeln!(out, "   Overall Sentiment: {}", tally.overall_sentiment.to_uppercase())?;
    writeln!(out, "   Positive:          {}", tally.positive)?;
    writeln!(out, "   Negative:          {}", tally.negative)?;
    writeln!(out, "   Neutral:           {}", tally.neutral)?;

    if !enrichment.reddit_mentions.is_empty() {
        writeln!(out, "\n   Sample Mentions:")?;
        for mention in enrichment.reddit_mentions.iter().take(SAMPLE_MENTIONS) {
            let date = mention.date.as_deref().unwrap_or("undated");
            writeln!(out, "   - \"{}\" ({date})", mention.text)?;
        }
    }

    writeln!(out, "\nPRICING ANALYSIS:")?;
    writeln!(out, "   Status: {}", enrichment.pricing_summary().unwrap_or("N/A"))?;

    writeln!(out, "\nONBOARDING RECOMMENDATION:")?;
    writeln!(out, "   {}", recommendation(seller, &enrichment))?;

    writeln!(out, "\n   Last Updated: {}", enrichment.last_updated.as_deref().unwrap_or("N/A"))
}

fn recommendation(seller: &SellerRecord, enrichment: &Enrichment) -> &'static str {
    let perfect_rating = seller.rating == Some(5.0);
    if perfect_rating && enrichment.overall_sentiment() == "positive" {
        "HIGHLY RECOMMENDED - Perfect rating + positive sentiment"
    } else {
        "RECOMMENDED - Meets all criteria"
    }
}
