pub mod drafts;
pub mod paginator;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use drafts::{DraftStore, FileDraftStore, MemoryDraftStore};
pub use paginator::{Paginator, PagingPolicy};
pub use traits::{PageSource, ReplaySource};
pub use types::{PageError, SearchOutcome, Termination};
