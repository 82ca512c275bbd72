//! Seller onboarding core: abbreviated-count parsing, eligibility rules,
//! leaderboards, seller lookup and explanation templates over an immutable
//! seller catalog.

pub mod catalog;
pub mod config;
pub mod count;
pub mod domain;
pub mod eligibility;
pub mod errors;
pub mod explanation;
pub mod lookup;
pub mod ranking;

pub use catalog::{CatalogError, EnrichmentMerge, SellerCatalog};
pub use count::{parse_count, parse_count_str, NOT_AVAILABLE};
pub use domain::enrichment::Enrichment;
pub use domain::seller::{SellerId, SellerRecord};
pub use eligibility::{EligibilityDecision, EligibilityEngine, EligibilityEvaluator, Thresholds};
pub use errors::ApplicationError;
pub use explanation::{ExplanationGenerator, ExplanationKind, ExplanationTemplate};
pub use lookup::{lookup, LookupOutcome};
pub use ranking::{best_seller, rank_approved, top_n, RankingMetric};
