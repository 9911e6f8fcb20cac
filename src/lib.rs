pub mod app_config;
pub mod connections;
pub mod db;
pub mod integrity;
pub mod jobs;
pub mod lifecycle;
pub mod opening_hours;
pub mod orm;
pub mod schema;
pub mod versioning;
pub mod web;
