use serde::{Deserialize, Serialize};
use sellerbot_core::ranking::{RankingMetric, DEFAULT_LEADERBOARD_COUNT};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Explain,
    BestSingle,
    Leaderboard,
    ApprovedList,
}

/// Trigger phrases for one intent. A query matches when it contains any
/// trigger as a case-insensitive substring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerRule {
    pub kind: IntentKind,
    pub triggers: Vec<String>,
}

impl TriggerRule {
    pub fn new(kind: IntentKind, triggers: &[&str]) -> Self {
        Self { kind, triggers: triggers.iter().map(|trigger| normalize_text(trigger)).collect() }
    }

    pub fn matches(&self, normalized_query: &str) -> bool {
        self.triggers.iter().any(|trigger| normalized_query.contains(trigger.as_str()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    Explain,
    BestSingle,
    Leaderboard { metric: RankingMetric, count: usize },
    ApprovedList,
    DirectLookup { key: String },
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Explain => "explain",
            Self::BestSingle => "best_single",
            Self::Leaderboard { .. } => "leaderboard",
            Self::ApprovedList => "approved_list",
            Self::DirectLookup { .. } => "direct_lookup",
        }
    }
}

/// Trigger table in priority order: explanation requests first, then the
/// single recommendation, leaderboards, and the full approved list.
pub fn default_rules() -> Vec<TriggerRule> {
    vec![
        TriggerRule::new(IntentKind::Explain, &["why", "reason", "explain", "how come"]),
        TriggerRule::new(
            IntentKind::BestSingle,
            &[
                "best seller",
                "recommend one",
                "give me one",
                "best one",
                "recommend only one",
                "answer",
            ],
        ),
        TriggerRule::new(IntentKind::Leaderboard, &["top", "best", "most", "worst", "sort"]),
        TriggerRule::new(
            IntentKind::ApprovedList,
            &["recommend", "onboard", "approved", "good sellers", "qualify"],
        ),
    ]
}

/// Classifies free-text queries by walking the trigger table top to bottom.
/// The first matching rule wins; a query matching nothing is a seller lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentRouter {
    rules: Vec<TriggerRule>,
    default_count: usize,
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new(default_rules(), DEFAULT_LEADERBOARD_COUNT)
    }
}

impl IntentRouter {
    pub fn new(rules: Vec<TriggerRule>, default_count: usize) -> Self {
        Self { rules, default_count }
    }

    pub fn with_default_count(default_count: usize) -> Self {
        Self::new(default_rules(), default_count)
    }

    pub fn rules(&self) -> &[TriggerRule] {
        &self.rules
    }

    pub fn default_count(&self) -> usize {
        self.default_count
    }

    pub fn matched_kind(&self, query: &str) -> Option<IntentKind> {
        let normalized_query = normalize_text(query);
        self.rules.iter().find(|rule| rule.matches(&normalized_query)).map(|rule| rule.kind)
    }

    pub fn classify(&self, query: &str) -> Intent {
        let normalized_query = normalize_text(query);

        match self.matched_kind(query) {
            Some(IntentKind::Explain) => Intent::Explain,
            Some(IntentKind::BestSingle) => Intent::BestSingle,
            Some(IntentKind::Leaderboard) => Intent::Leaderboard {
                metric: extract_metric(&normalized_query),
                count: extract_count(&normalized_query).unwrap_or(self.default_count),
            },
            Some(IntentKind::ApprovedList) => Intent::ApprovedList,
            None => Intent::DirectLookup { key: query.trim().to_string() },
        }
    }
}

fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

fn extract_metric(normalized_query: &str) -> RankingMetric {
    if normalized_query.contains("sold") || normalized_query.contains("sales") {
        RankingMetric::Sold
    } else if normalized_query.contains("review") {
        RankingMetric::Reviews
    } else {
        RankingMetric::Rating
    }
}

/// First run of ASCII digits in the query. Literals too large for `usize`
/// saturate, which simply means "everything".
fn extract_count(normalized_query: &str) -> Option<usize> {
    let start = normalized_query.find(|character: char| character.is_ascii_digit())?;
    let digits = normalized_query[start..]
        .chars()
        .take_while(|character| character.is_ascii_digit())
        .collect::<String>();
    Some(digits.parse::<usize>().unwrap_or(usize::MAX))
}

#[cfg(test)]
mod tests {
    use sellerbot_core::ranking::RankingMetric;

    use super::{default_rules, Intent, IntentKind, IntentRouter, TriggerRule};

    #[test]
    fn explain_wins_over_leaderboard_triggers() {
        let router = IntentRouter::default();
        assert_eq!(router.classify("why is that the top seller?"), Intent::Explain);
        assert_eq!(router.classify("How come?"), Intent::Explain);
    }

    #[test]
    fn best_single_wins_over_leaderboard_and_approved_list() {
        let router = IntentRouter::default();
        assert_eq!(router.classify("Who is the best seller?"), Intent::BestSingle);
        assert_eq!(router.classify("recommend one seller to onboard"), Intent::BestSingle);
    }

    #[test]
    fn leaderboard_extracts_metric_and_count() {
        let router = IntentRouter::default();
        assert_eq!(
            router.classify("top 3 sold"),
            Intent::Leaderboard { metric: RankingMetric::Sold, count: 3 }
        );
        assert_eq!(
            router.classify("most reviews"),
            Intent::Leaderboard { metric: RankingMetric::Reviews, count: 10 }
        );
        assert_eq!(
            router.classify("sort by rating, show 25 then 40"),
            Intent::Leaderboard { metric: RankingMetric::Rating, count: 25 }
        );
        assert_eq!(
            router.classify("worst sales 0"),
            Intent::Leaderboard { metric: RankingMetric::Sold, count: 0 }
        );
    }

    #[test]
    fn leaderboard_default_count_is_configurable() {
        let router = IntentRouter::with_default_count(5);
        assert_eq!(
            router.classify("top sellers"),
            Intent::Leaderboard { metric: RankingMetric::Rating, count: 5 }
        );
    }

    #[test]
    fn oversized_count_saturates() {
        let router = IntentRouter::default();
        assert_eq!(
            router.classify("top 99999999999999999999999 sold"),
            Intent::Leaderboard { metric: RankingMetric::Sold, count: usize::MAX }
        );
    }

    #[test]
    fn onboarding_phrases_list_approved_sellers() {
        let router = IntentRouter::default();
        for query in ["Which sellers should we onboard?", "show approved", "who can qualify"] {
            assert_eq!(router.classify(query), Intent::ApprovedList, "query: {query}");
        }
    }

    #[test]
    fn unmatched_queries_become_lookups() {
        let router = IntentRouter::default();
        assert_eq!(
            router.classify("  CardKing  "),
            Intent::DirectLookup { key: "CardKing".to_string() }
        );
    }

    #[test]
    fn rule_order_defines_priority() {
        let mut rules = default_rules();
        rules.reverse();
        let reordered = IntentRouter::new(rules, 10);

        assert_eq!(reordered.matched_kind("explain the top sellers"), Some(IntentKind::Leaderboard));
        assert_eq!(
            IntentRouter::default().matched_kind("explain the top sellers"),
            Some(IntentKind::Explain)
        );
    }

    #[test]
    fn custom_trigger_sets_are_normalized() {
        let router =
            IntentRouter::new(vec![TriggerRule::new(IntentKind::ApprovedList, &["Shortlist"])], 10);
        assert_eq!(router.classify("show the SHORTLIST"), Intent::ApprovedList);
        assert_eq!(router.classify("top 3"), Intent::DirectLookup { key: "top 3".to_string() });
    }
}
