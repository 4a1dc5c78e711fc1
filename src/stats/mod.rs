pub mod types;
pub mod store;
pub mod writer;

pub use types::{LanguageCount, StatsSnapshot, StoredStats};
pub use store::{StatsError, StatsStore};
pub use writer::StatsHandle;
