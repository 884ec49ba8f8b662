pub mod delivery;
pub mod health;
pub mod models;
pub mod releases;
pub mod stats;
