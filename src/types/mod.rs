//! Public types exposed by the `saveid-core` crate.

pub mod catalog;
pub mod detection;
pub mod options;
pub mod report;
pub mod search;

pub use catalog::{CatalogDocument, CatalogLoadReport, CatalogRecord, DocumentRecord};
pub use detection::{Confidence, DetectionResult, GameId, SourceTag, UnresolvedGroupKey};
pub use options::{ResolverOptions, ResolverOptionsBuilder};
pub use report::{ScanReport, ScannedFile, UnresolvedGroup};
pub use search::{SearchHit, SearchResponse};
