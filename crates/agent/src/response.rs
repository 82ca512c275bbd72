use std::fmt::Write as _;

use serde::Serialize;
use sellerbot_core::domain::enrichment::Enrichment;
use sellerbot_core::eligibility::EligibilityDecision;
use sellerbot_core::ranking::RankingMetric;
use sellerbot_core::SellerRecord;

const RULE_WIDE: usize = 60;
const RULE_NARROW: usize = 45;
const RULE_CARD: usize = 50;
const NAME_WIDTH: usize = 24;

/// Structured answer to one query. Rendering to text is a separate step so
/// the same answer can be printed or serialized.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryResponse {
    Explanation { text: String },
    NothingToExplain,
    BestSeller { seller: SellerSummary, criteria: String },
    NoQualifyingSeller { criteria: String },
    Leaderboard { metric: RankingMetric, requested: usize, rows: Vec<LeaderboardRow> },
    ApprovedList { criteria: String, sellers: Vec<SellerSummary> },
    SellerVerdict {
        seller: SellerSummary,
        decision: EligibilityDecision,
        enrichment: Option<EnrichmentDigest>,
    },
    Suggestions { key: String, total: usize, candidates: Vec<SellerSummary> },
    NotFound { key: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SellerSummary {
    pub user_id: String,
    pub user_name: String,
    pub rating: String,
    pub sold: String,
    pub reviews: String,
}

impl From<&SellerRecord> for SellerSummary {
    fn from(seller: &SellerRecord) -> Self {
        Self {
            user_id: seller.user_id.0.clone(),
            user_name: seller.user_name.clone(),
            rating: seller.rating_display(),
            sold: seller.sold_raw.clone(),
            reviews: seller.reviews_raw.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub user_id: String,
    pub user_name: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnrichmentDigest {
    pub overall_sentiment: String,
    pub total_mentions: u32,
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
    pub pricing: Option<String>,
    pub listing_quality: Option<String>,
}

impl From<&Enrichment> for EnrichmentDigest {
    fn from(enrichment: &Enrichment) -> Self {
        let tally = enrichment.sentiment_analysis.clone().unwrap_or_default();
        Self {
            overall_sentiment: enrichment.overall_sentiment().to_string(),
            total_mentions: tally.total_mentions,
            positive: tally.positive,
            negative: tally.negative,
            neutral: tally.neutral,
            pricing: enrichment.pricing_summary().map(str::to_string),
            listing_quality: enrichment
                .listing_quality
                .as_ref()
                .and_then(|quality| quality.score.clone()),
        }
    }
}

impl QueryResponse {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Explanation { .. } => "explanation",
            Self::NothingToExplain => "nothing_to_explain",
            Self::BestSeller { .. } => "best_seller",
            Self::NoQualifyingSeller { .. } => "no_qualifying_seller",
            Self::Leaderboard { .. } => "leaderboard",
            Self::ApprovedList { .. } => "approved_list",
            Self::SellerVerdict { .. } => "seller_verdict",
            Self::Suggestions { .. } => "suggestions",
            Self::NotFound { .. } => "not_found",
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) -> std::fmt::Result {
        match self {
            Self::Explanation { text } => {
                writeln!(out, "\nCONTEXTUAL ANSWER:")?;
                writeln!(out, "{text}")?;
            }
            Self::NothingToExplain => {
                writeln!(out, "I haven't made a recommendation yet, so I can't explain 'why'.")?;
                writeln!(out, "   Try asking for a recommendation first!")?;
            }
            Self::BestSeller { seller, criteria } => {
                writeln!(out, "\nTHE #1 RECOMMENDED SELLER")?;
                writeln!(out, "{}", "=".repeat(RULE_CARD))?;
                writeln!(out, "User:     {} (@{})", seller.user_name, seller.user_id)?;
                writeln!(out, "Rating:   {} ★", seller.rating)?;
                writeln!(out, "Sold:     {}", seller.sold)?;
                writeln!(out, "Reviews:  {}", seller.reviews)?;
                writeln!(out, "{}", "=".repeat(RULE_CARD))?;
                writeln!(out, "WHY THIS USER?")?;
                writeln!(out, "1. They pass every onboarding rule ({criteria}).")?;
                writeln!(out, "2. They have the highest rating among qualified sellers ({}).", seller.rating)?;
                writeln!(
                    out,
                    "3. Among those with top ratings, they have the HIGHEST sales volume ({}).",
                    seller.sold
                )?;
                writeln!(out, "{}", "=".repeat(RULE_CARD))?;
            }
            Self::NoQualifyingSeller { criteria } => {
                writeln!(out, "No sellers meet the strict criteria ({criteria}).")?;
            }
            Self::Leaderboard { metric, requested, rows } => {
                writeln!(out, "\nTOP {requested} BY {}", metric.label().to_uppercase())?;
                writeln!(out, "{:<4} {:<25} {:<15}", "#", "User", "Metric")?;
                writeln!(out, "{}", "-".repeat(RULE_NARROW))?;
                for row in rows {
                    writeln!(
                        out,
                        "{:<4} {:<25} {:<15}",
                        row.rank,
                        truncate(&row.user_name, NAME_WIDTH),
                        row.value
                    )?;
                }
                writeln!(out, "{}", "-".repeat(RULE_NARROW))?;
            }
            Self::ApprovedList { criteria, sellers } => {
                writeln!(out, "\nRECOMMENDED SELLERS ({criteria})")?;
                writeln!(out, "{:<25} {:<8} {:<10} {}", "User", "Rating", "Reviews", "Sold")?;
                writeln!(out, "{}", "-".repeat(RULE_WIDE))?;
                for seller in sellers {
                    writeln!(
                        out,
                        "{:<25} {:<8} {:<10} {}",
                        truncate(&seller.user_name, NAME_WIDTH),
                        seller.rating,
                        seller.reviews,
                        seller.sold
                    )?;
                }
                if sellers.is_empty() {
                    writeln!(out, "No sellers found meeting strict criteria.")?;
                } else {
                    writeln!(out, "\nTotal Approved: {}", sellers.len())?;
                }
                writeln!(out, "{}", "-".repeat(RULE_WIDE))?;
            }
            Self::SellerVerdict { seller, decision, enrichment } => {
                writeln!(out, "\n{}", "-".repeat(37))?;
                writeln!(out, "Seller: {} (@{})", seller.user_name, seller.user_id)?;
                writeln!(
                    out,
                    "Stats:  Rating: {} ★ | Sold: {} | Reviews: {}",
                    seller.rating, seller.sold, seller.reviews
                )?;
                if decision.approved {
                    writeln!(out, "RESULT: APPROVED FOR ONBOARDING")?;
                    writeln!(out, "   Performance meets all high-quality standards.")?;
                } else {
                    writeln!(out, "RESULT: NOT APPROVED")?;
                    writeln!(out, "   Reasons:")?;
                    for reason in &decision.reasons {
                        writeln!(out, "   - {reason}")?;
                    }
                    let rule_ids = decision
                        .failed_rules
                        .iter()
                        .map(|rule| rule.rule_id())
                        .collect::<Vec<_>>();
                    writeln!(out, "   Failed rules: {}", rule_ids.join(", "))?;
                }
                if let Some(digest) = enrichment {
                    render_digest(out, digest)?;
                }
                writeln!(out, "{}", "-".repeat(37))?;
            }
            Self::Suggestions { key, total, candidates } => {
                writeln!(out, "User '{key}' not found exactly. Did you mean one of these?")?;
                for candidate in candidates {
                    writeln!(out, "   - {} ({})", candidate.user_name, candidate.user_id)?;
                }
                if *total > candidates.len() {
                    writeln!(out, "   ({} more partial matches)", total - candidates.len())?;
                }
            }
            Self::NotFound { key } => {
                writeln!(out, "User '{key}' not found in database.")?;
            }
        }
        Ok(())
    }
}

fn render_digest(out: &mut String, digest: &EnrichmentDigest) -> std::fmt::Result {
    writeln!(out, "Community:")?;
    writeln!(
        out,
        "   Sentiment: {} ({} mentions: {} positive, {} negative, {} neutral)",
        digest.overall_sentiment.to_uppercase(),
        digest.total_mentions,
        digest.positive,
        digest.negative,
        digest.neutral
    )?;
    if let Some(pricing) = &digest.pricing {
        writeln!(out, "   Pricing:   {pricing}")?;
    }
    if let Some(score) = &digest.listing_quality {
        writeln!(out, "   Listings:  {score}")?;
    }
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
