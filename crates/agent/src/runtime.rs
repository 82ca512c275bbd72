use std::collections::HashMap;

use sellerbot_core::eligibility::{EligibilityEngine, EligibilityEvaluator, Thresholds};
use sellerbot_core::explanation::{ExplanationGenerator, ExplanationKind};
use sellerbot_core::lookup::{lookup, LookupOutcome};
use sellerbot_core::ranking::{best_seller, top_n, RankingMetric};
use sellerbot_core::{SellerCatalog, SellerRecord};
use tracing::{debug, info};

use crate::conversation::{Intent, IntentRouter};
use crate::memory::ConversationMemory;
use crate::response::{EnrichmentDigest, LeaderboardRow, QueryResponse, SellerSummary};

/// Answers queries against one loaded catalog. Holds no per-conversation
/// state; the caller owns the [`ConversationMemory`].
#[derive(Clone, Debug)]
pub struct AssistantRuntime {
    catalog: SellerCatalog,
    evaluator: EligibilityEvaluator,
    router: IntentRouter,
    explanations: ExplanationGenerator,
}

impl AssistantRuntime {
    pub fn new(catalog: SellerCatalog, thresholds: Thresholds, default_count: usize) -> Self {
        Self {
            catalog,
            evaluator: EligibilityEvaluator::new(thresholds),
            router: IntentRouter::with_default_count(default_count),
            explanations: ExplanationGenerator::default(),
        }
    }

    pub fn with_router(mut self, router: IntentRouter) -> Self {
        self.router = router;
        self
    }

    pub fn with_explanations(mut self, explanations: ExplanationGenerator) -> Self {
        self.explanations = explanations;
        self
    }

    pub fn catalog(&self) -> &SellerCatalog {
        &self.catalog
    }

    pub fn evaluator(&self) -> &EligibilityEvaluator {
        &self.evaluator
    }

    pub fn thresholds(&self) -> &Thresholds {
        self.evaluator.thresholds()
    }

    pub fn router(&self) -> &IntentRouter {
        &self.router
    }

    /// Routes one query and, unless it was an explanation request or an
    /// unknown seller, replaces the remembered explanation with one for this
    /// answer.
    pub fn handle_query(&self, query: &str, memory: &mut ConversationMemory) -> QueryResponse {
        let intent = self.router.classify(query);
        info!(
            event_name = "sellerbot.intent.classified",
            intent = intent.name(),
            "query classified"
        );

        let (response, explanation) = match intent {
            Intent::Explain => (explain(memory), None),
            Intent::BestSingle => self.best_single(),
            Intent::Leaderboard { metric, count } => self.leaderboard(metric, count),
            Intent::ApprovedList => self.approved_list(),
            Intent::DirectLookup { key } => self.direct_lookup(&key),
        };

        if let Some(explanation) = explanation {
            memory.remember(explanation);
            debug!(
                event_name = "sellerbot.memory.updated",
                response_kind = response.kind(),
                "conversation memory updated"
            );
        }

        response
    }

    fn best_single(&self) -> (QueryResponse, Option<String>) {
        let criteria = self.thresholds().describe();
        match best_seller(self.catalog.sellers(), &self.evaluator) {
            Some(seller) => {
                let variables = HashMap::from([
                    ("user_name", seller.user_name.clone()),
                    ("criteria", criteria.clone()),
                    ("rating", seller.rating_display()),
                    ("sold", seller.sold_raw.clone()),
                ]);
                let explanation = self.explanations.generate(ExplanationKind::BestSeller, &variables);
                (QueryResponse::BestSeller { seller: seller.into(), criteria }, Some(explanation))
            }
            None => {
                let variables = HashMap::from([
                    ("criteria", criteria.clone()),
                    ("considered", self.catalog.len().to_string()),
                ]);
                let explanation =
                    self.explanations.generate(ExplanationKind::NoQualifyingSeller, &variables);
                (QueryResponse::NoQualifyingSeller { criteria }, Some(explanation))
            }
        }
    }

    fn leaderboard(&self, metric: RankingMetric, count: usize) -> (QueryResponse, Option<String>) {
        let rows = top_n(self.catalog.sellers(), metric, count)
            .into_iter()
            .enumerate()
            .map(|(index, seller)| LeaderboardRow {
                rank: index + 1,
                user_id: seller.user_id.0.clone(),
                user_name: seller.user_name.clone(),
                value: metric.display_value(seller),
            })
            .collect::<Vec<_>>();

        let variables = HashMap::from([
            ("count", count.to_string()),
            ("metric_label", metric.label().to_string()),
            ("field", metric.field_name().to_string()),
            ("considered", self.catalog.len().to_string()),
        ]);
        let explanation = self.explanations.generate(ExplanationKind::Leaderboard, &variables);
        (QueryResponse::Leaderboard { metric, requested: count, rows }, Some(explanation))
    }

    fn approved_list(&self) -> (QueryResponse, Option<String>) {
        let thresholds = self.thresholds();
        let sellers = self
            .evaluator
            .approved(self.catalog.sellers())
            .into_iter()
            .map(SellerSummary::from)
            .collect::<Vec<_>>();

        let variables = HashMap::from([
            ("min_rating", thresholds.min_rating.to_string()),
            ("min_sold", thresholds.min_sold.to_string()),
            ("min_reviews", thresholds.min_reviews.to_string()),
            ("approved_count", sellers.len().to_string()),
        ]);
        let explanation = self.explanations.generate(ExplanationKind::ApprovedList, &variables);
        (QueryResponse::ApprovedList { criteria: thresholds.describe(), sellers }, Some(explanation))
    }

    fn direct_lookup(&self, key: &str) -> (QueryResponse, Option<String>) {
        match lookup(self.catalog.sellers(), key) {
            LookupOutcome::Resolved(seller) => self.verdict(seller),
            LookupOutcome::Suggestions { total, candidates } => {
                let variables = HashMap::from([
                    ("key", key.to_string()),
                    ("total", total.to_string()),
                    ("shown", candidates.len().to_string()),
                ]);
                let explanation = self.explanations.generate(ExplanationKind::Suggestions, &variables);
                let candidates = candidates.into_iter().map(SellerSummary::from).collect();
                (
                    QueryResponse::Suggestions { key: key.to_string(), total, candidates },
                    Some(explanation),
                )
            }
            LookupOutcome::NotFound => (QueryResponse::NotFound { key: key.to_string() }, None),
        }
    }

    fn verdict(&self, seller: &SellerRecord) -> (QueryResponse, Option<String>) {
        let decision = self.evaluator.evaluate(seller);
        let verdict = if decision.approved {
            "They pass every rule, so they are approved for onboarding.".to_string()
        } else {
            format!("They are not approved: {}.", decision.reasons.join("; "))
        };

        let variables = HashMap::from([
            ("user_name", seller.user_name.clone()),
            ("user_id", seller.user_id.0.clone()),
            ("criteria", self.thresholds().describe()),
            ("verdict", verdict),
        ]);
        let explanation = self.explanations.generate(ExplanationKind::SellerVerdict, &variables);
        let enrichment = seller.enrichment.as_ref().map(EnrichmentDigest::from);

        (
            QueryResponse::SellerVerdict { seller: seller.into(), decision, enrichment },
            Some(explanation),
        )
    }
}

fn explain(memory: &ConversationMemory) -> QueryResponse {
    match memory.last_explanation() {
        Some(text) => QueryResponse::Explanation { text: text.to_string() },
        None => QueryResponse::NothingToExplain,
    }
}
