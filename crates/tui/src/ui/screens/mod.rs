pub mod assistant;
pub mod auth;
pub mod dashboard;
pub mod entity;
pub mod profile;
pub mod reports;
