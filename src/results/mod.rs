//! @ai:module:intent fio result documents and their loading
//! @ai:module:layer domain
//! @ai:module:public_api ResultDocument, JobRecord, ResultLoader

pub mod loader;
pub mod record;

pub use loader::{ResultLoader, ResultLoaderTrait};
pub use record::{IoSection, JobRecord, LatencyStats, ResultDocument};
