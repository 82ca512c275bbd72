use serde::{Deserialize, Serialize};

use crate::count::parse_count_str;
use crate::domain::seller::{format_rating, SellerRecord};

pub const DEFAULT_MIN_RATING: f64 = 4.9;
pub const DEFAULT_MIN_SOLD: f64 = 100.0;
pub const DEFAULT_MIN_REVIEWS: f64 = 500.0;

/// Onboarding thresholds, fixed for the lifetime of an evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub min_rating: f64,
    pub min_sold: f64,
    pub min_reviews: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_rating: DEFAULT_MIN_RATING,
            min_sold: DEFAULT_MIN_SOLD,
            min_reviews: DEFAULT_MIN_REVIEWS,
        }
    }
}

impl Thresholds {
    /// One-line summary for banners and explanations.
    pub fn describe(&self) -> String {
        format!(
            "Rating >= {} | Sold >= {} | Reviews >= {}",
            self.min_rating, self.min_sold, self.min_reviews
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityRule {
    MinimumRating,
    MinimumSold,
    MinimumReviews,
}

impl EligibilityRule {
    pub fn rule_id(&self) -> &'static str {
        match self {
            Self::MinimumRating => "rating-floor",
            Self::MinimumSold => "sales-floor",
            Self::MinimumReviews => "review-floor",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EligibilityDecision {
    pub approved: bool,
    pub reasons: Vec<String>,
    pub failed_rules: Vec<EligibilityRule>,
    pub rating: Option<f64>,
    pub sold_raw: String,
    pub reviews_raw: String,
}

pub trait EligibilityEngine {
    fn evaluate(&self, seller: &SellerRecord) -> EligibilityDecision;
}

#[derive(Clone, Debug, Default)]
pub struct EligibilityEvaluator {
    thresholds: Thresholds,
}

impl EligibilityEvaluator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn is_approved(&self, seller: &SellerRecord) -> bool {
        self.evaluate(seller).approved
    }

    /// Approved sellers in their original order.
    pub fn approved<'a>(&'a self, sellers: &'a [SellerRecord]) -> Vec<&'a SellerRecord> {
        sellers.iter().filter(|seller| self.is_approved(seller)).collect()
    }
}

impl EligibilityEngine for EligibilityEvaluator {
    fn evaluate(&self, seller: &SellerRecord) -> EligibilityDecision {
        evaluate_seller(seller, &self.thresholds)
    }
}

/// Applies every rule without short-circuiting so all failures are reported.
///
/// An absent rating is compared as `0.0` and therefore fails any positive
/// rating floor.
pub fn evaluate_seller(seller: &SellerRecord, thresholds: &Thresholds) -> EligibilityDecision {
    let mut reasons = Vec::new();
    let mut failed_rules = Vec::new();

    let rating = seller.rating_value();
    if rating < thresholds.min_rating {
        reasons.push(match seller.rating {
            Some(value) => {
                format!("Rating {} is below {}", format_rating(value), thresholds.min_rating)
            }
            None => format!("Rating is unavailable (treated as 0), below {}", thresholds.min_rating),
        });
        failed_rules.push(EligibilityRule::MinimumRating);
    }

    if parse_count_str(&seller.sold_raw) < thresholds.min_sold {
        reasons.push(format!(
            "Sales volume ({}) is too low (< {})",
            seller.sold_raw, thresholds.min_sold
        ));
        failed_rules.push(EligibilityRule::MinimumSold);
    }

    if parse_count_str(&seller.reviews_raw) < thresholds.min_reviews {
        reasons.push(format!(
            "Review count ({}) is too low (< {})",
            seller.reviews_raw, thresholds.min_reviews
        ));
        failed_rules.push(EligibilityRule::MinimumReviews);
    }

    EligibilityDecision {
        approved: reasons.is_empty(),
        reasons,
        failed_rules,
        rating: seller.rating,
        sold_raw: seller.sold_raw.clone(),
        reviews_raw: seller.reviews_raw.clone(),
    }
}
