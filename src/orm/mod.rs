//! SeaORM entities for the directory schema

pub mod daily_opening_times;
pub mod language_availabilities;
pub mod localized_texts;
pub mod postal_codes;
pub mod roots;
pub mod service_channel_connections;
pub mod service_hours;
pub mod versioned_entities;
pub mod versionings;
