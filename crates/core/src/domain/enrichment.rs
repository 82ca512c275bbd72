use serde::{Deserialize, Serialize};

/// Descriptive data attached to a subset of sellers by the enrichment
/// pipeline. Never consulted by eligibility rules.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    #[serde(default)]
    pub reddit_mentions: Vec<Mention>,
    #[serde(default)]
    pub sentiment_analysis: Option<SentimentTally>,
    #[serde(default)]
    pub pricing_analysis: Option<PricingNotes>,
    #[serde(default)]
    pub listing_quality: Option<ListingQuality>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentTally {
    #[serde(default)]
    pub total_mentions: u32,
    #[serde(default)]
    pub positive: u32,
    #[serde(default)]
    pub negative: u32,
    #[serde(default)]
    pub neutral: u32,
    #[serde(default = "unknown_sentiment")]
    pub overall_sentiment: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingNotes {
    #[serde(default)]
    pub avg_price: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuality {
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
}

impl Enrichment {
    pub fn overall_sentiment(&self) -> &str {
        self.sentiment_analysis
            .as_ref()
            .map(|tally| tally.overall_sentiment.as_str())
            .unwrap_or("unknown")
    }

    /// Pricing status, falling back to the free-form note.
    pub fn pricing_summary(&self) -> Option<&str> {
        let pricing = self.pricing_analysis.as_ref()?;
        pricing.status.as_deref().or(pricing.note.as_deref())
    }
}

fn unknown_sentiment() -> String {
    "unknown".to_string()
}
