//! Soft-versioning rules for root entities
//!
//! Pure domain logic: version numbers, chain validation, per-language
//! publication state and current-version selection. Persistence lives in
//! [`crate::lifecycle`].

pub mod availability;
pub mod chain;
pub mod current;
pub mod status;
pub mod version;

pub use availability::{Availability, TransitionError};
pub use chain::{validate_chain, ChainError, ChainRecord};
pub use current::{select_current, Candidate};
pub use status::{derive_entity_status, PublishingStatus};
pub use version::VersionNumber;
