use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::seller::SellerRecord;
use crate::eligibility::EligibilityEvaluator;

pub const DEFAULT_LEADERBOARD_COUNT: usize = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    #[default]
    Rating,
    Sold,
    Reviews,
}

impl RankingMetric {
    /// Human label used in leaderboard headings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rating => "Rating",
            Self::Sold => "Items Sold",
            Self::Reviews => "Review Count",
        }
    }

    /// Record field the metric is read from.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::Sold => "sold",
            Self::Reviews => "reviews",
        }
    }

    pub fn value(&self, seller: &SellerRecord) -> f64 {
        match self {
            Self::Rating => seller.rating_value(),
            Self::Sold => seller.sold(),
            Self::Reviews => seller.reviews(),
        }
    }

    /// Value as the seller profile displays it.
    pub fn display_value(&self, seller: &SellerRecord) -> String {
        match self {
            Self::Rating => seller.rating_display(),
            Self::Sold => seller.sold_raw.clone(),
            Self::Reviews => seller.reviews_raw.clone(),
        }
    }
}

/// Top `count` sellers by `metric`, descending.
///
/// The sort is stable: sellers with equal metric values keep their catalog
/// order. A count above the catalog size returns everything; zero returns
/// nothing.
pub fn top_n(sellers: &[SellerRecord], metric: RankingMetric, count: usize) -> Vec<&SellerRecord> {
    if count == 0 {
        return Vec::new();
    }

    let mut keyed =
        sellers.iter().map(|seller| (metric.value(seller), seller)).collect::<Vec<_>>();
    keyed.sort_by(|(left, _), (right, _)| right.total_cmp(left));

    keyed.into_iter().take(count).map(|(_, seller)| seller).collect()
}

/// The single best approved seller: highest rating, then highest parsed
/// sales. On a full tie the earlier catalog entry wins.
pub fn best_seller<'a>(
    sellers: &'a [SellerRecord],
    evaluator: &EligibilityEvaluator,
) -> Option<&'a SellerRecord> {
    let mut best: Option<(&'a SellerRecord, f64, f64)> = None;

    for seller in sellers.iter().filter(|seller| evaluator.is_approved(seller)) {
        let rating = seller.rating_value();
        let sold = seller.sold();
        let replaces = match best {
            None => true,
            Some((_, best_rating, best_sold)) => {
                compare_best_key((rating, sold), (best_rating, best_sold)) == Ordering::Greater
            }
        };
        if replaces {
            best = Some((seller, rating, sold));
        }
    }

    best.map(|(seller, _, _)| seller)
}

/// Approved sellers ordered by the best-seller key, ties kept in catalog order.
pub fn rank_approved<'a>(
    sellers: &'a [SellerRecord],
    evaluator: &EligibilityEvaluator,
) -> Vec<&'a SellerRecord> {
    let mut keyed = sellers
        .iter()
        .filter(|seller| evaluator.is_approved(seller))
        .map(|seller| ((seller.rating_value(), seller.sold()), seller))
        .collect::<Vec<_>>();
    keyed.sort_by(|(left, _), (right, _)| compare_best_key(*right, *left));
    keyed.into_iter().map(|(_, seller)| seller).collect()
}

fn compare_best_key(left: (f64, f64), right: (f64, f64)) -> Ordering {
    left.0.total_cmp(&right.0).then_with(|| left.1.total_cmp(&right.1))
}
