//! Dual-path vector search: a native MongoDB `$vectorSearch` index when ready, an
//! in-memory cosine-similarity fallback otherwise. See spec.md §4.9.

pub mod error;
pub mod fallback;
pub mod native;
pub mod probe;
pub mod traits;

pub use error::{VectorError, VectorResult};
pub use fallback::InMemoryCosineBackend;
pub use native::MongoVectorBackend;
pub use probe::BackendSelector;
pub use traits::{ScoredChunk, VectorBackend, cosine_similarity};
