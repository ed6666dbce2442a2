//! Domain model: catalog records, search requests and ID normalization.

mod ids;
mod records;
mod search;

pub use ids::{absolutize, canonical_url, extract_id_from_path, normalize_model_id};
pub use records::{Author, Model};
pub use search::{SearchQuery, SearchResult};
