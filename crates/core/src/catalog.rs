use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::enrichment::Enrichment;
use crate::domain::seller::{SellerId, SellerRecord};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read seller data `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse seller data `{path}`: {source}")]
    ParseFile { path: PathBuf, source: serde_json::Error },
    #[error("seller record at position {index} has an empty user_id")]
    EmptySellerId { index: usize },
    #[error("duplicate seller id `{0}` (ids compare case-insensitively)")]
    DuplicateSellerId(String),
}

/// Immutable, ordered set of seller records for one session.
#[derive(Clone, Debug, Default)]
pub struct SellerCatalog {
    sellers: Vec<SellerRecord>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnrichmentMerge {
    pub attached: usize,
    pub unmatched: usize,
}

impl SellerCatalog {
    pub fn from_records(sellers: Vec<SellerRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashMap::with_capacity(sellers.len());
        for (index, seller) in sellers.iter().enumerate() {
            let key = seller.user_id.normalized();
            if key.is_empty() {
                return Err(CatalogError::EmptySellerId { index });
            }
            if seen.insert(key, index).is_some() {
                return Err(CatalogError::DuplicateSellerId(seller.user_id.0.clone()));
            }
        }
        Ok(Self { sellers })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let sellers = read_json::<Vec<SellerRecord>>(path)?;
        let catalog = Self::from_records(sellers)?;
        info!(
            event_name = "sellerbot.catalog.loaded",
            path = %path.display(),
            seller_count = catalog.len(),
            "seller catalog loaded"
        );
        Ok(catalog)
    }

    /// Attaches enrichment from the enrichment pipeline's output, matched by
    /// seller id. Entries for unknown sellers are skipped.
    pub fn merge_enrichment(&mut self, path: &Path) -> Result<EnrichmentMerge, CatalogError> {
        let entries = read_json::<Vec<EnrichmentEntry>>(path)?;
        let merge = self.attach_enrichment(entries);
        info!(
            event_name = "sellerbot.catalog.enrichment_merged",
            path = %path.display(),
            attached = merge.attached,
            unmatched = merge.unmatched,
            "seller enrichment merged"
        );
        Ok(merge)
    }

    /// Like [`merge_enrichment`](Self::merge_enrichment) but a missing file is
    /// not an error.
    pub fn merge_enrichment_if_present(
        &mut self,
        path: &Path,
    ) -> Result<Option<EnrichmentMerge>, CatalogError> {
        if !path.exists() {
            warn!(
                event_name = "sellerbot.catalog.enrichment_missing",
                path = %path.display(),
                "enrichment file not found; continuing without enrichment"
            );
            return Ok(None);
        }
        self.merge_enrichment(path).map(Some)
    }

    fn attach_enrichment(&mut self, entries: Vec<EnrichmentEntry>) -> EnrichmentMerge {
        let positions = self
            .sellers
            .iter()
            .enumerate()
            .map(|(index, seller)| (seller.user_id.normalized(), index))
            .collect::<HashMap<_, _>>();

        let mut merge = EnrichmentMerge::default();
        for entry in entries {
            let Some(enrichment) = entry.enrichment else {
                continue;
            };
            match positions.get(&entry.user_id.normalized()) {
                Some(&index) => {
                    self.sellers[index].enrichment = Some(enrichment);
                    merge.attached += 1;
                }
                None => {
                    debug!(
                        event_name = "sellerbot.catalog.enrichment_unmatched",
                        user_id = %entry.user_id,
                        "enrichment entry has no matching seller"
                    );
                    merge.unmatched += 1;
                }
            }
        }
        merge
    }

    pub fn sellers(&self) -> &[SellerRecord] {
        &self.sellers
    }

    pub fn len(&self) -> usize {
        self.sellers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sellers.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct EnrichmentEntry {
    #[serde(alias = "UserID")]
    user_id: SellerId,
    #[serde(default)]
    enrichment: Option<Enrichment>,
}

fn read_json<T>(path: &Path) -> Result<T, CatalogError>
where
    T: for<'de> Deserialize<'de>,
{
    let raw = fs::read_to_string(path)
        .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
    serde_json::from_str::<T>(&raw)
        .map_err(|source| CatalogError::ParseFile { path: path.to_path_buf(), source })
}
