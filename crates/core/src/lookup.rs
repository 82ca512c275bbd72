use std::collections::HashSet;

use crate::domain::seller::SellerRecord;

pub const MAX_SUGGESTIONS: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub enum LookupOutcome<'a> {
    /// Exact, case-insensitive match on id or display name.
    Resolved(&'a SellerRecord),
    /// No exact match, but `total` distinct sellers contain the key; at most
    /// [`MAX_SUGGESTIONS`] of them are surfaced in catalog order.
    Suggestions { total: usize, candidates: Vec<&'a SellerRecord> },
    NotFound,
}

/// Resolves a free-text key to a seller.
///
/// A display-name match wins over an id match, and among sellers sharing a
/// display name the last one in catalog order wins. Substring matches are only
/// consulted when nothing matches exactly.
pub fn lookup<'a>(sellers: &'a [SellerRecord], key: &str) -> LookupOutcome<'a> {
    let needle = key.trim().to_lowercase();
    if needle.is_empty() {
        return LookupOutcome::NotFound;
    }

    let by_name = sellers.iter().rev().find(|seller| seller.normalized_name() == needle);
    if let Some(seller) = by_name {
        return LookupOutcome::Resolved(seller);
    }
    if let Some(seller) = sellers.iter().find(|seller| seller.user_id.normalized() == needle) {
        return LookupOutcome::Resolved(seller);
    }

    let mut seen = HashSet::new();
    let matches = sellers
        .iter()
        .filter(|seller| {
            seller.user_id.normalized().contains(&needle)
                || seller.normalized_name().contains(&needle)
        })
        .filter(|seller| seen.insert(seller.user_id.normalized()))
        .collect::<Vec<_>>();

    if matches.is_empty() {
        return LookupOutcome::NotFound;
    }

    let total = matches.len();
    let candidates = matches.into_iter().take(MAX_SUGGESTIONS).collect();
    LookupOutcome::Suggestions { total, candidates }
}
