#![deny(missing_docs)]
#![doc = "Core identifiers, errors and caching helpers for heavy-ion collision calibration projects."]

pub mod errors;
pub mod lazy;
pub mod observable;
pub mod system;

pub use errors::{ErrorInfo, HicError, SYSTEM_MATCH_CODE};
pub use lazy::LazyMap;
pub use observable::ObservableId;
pub use system::{parse_system, CollisionSystem};
