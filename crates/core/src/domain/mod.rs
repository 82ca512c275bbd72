pub mod enrichment;
pub mod seller;
