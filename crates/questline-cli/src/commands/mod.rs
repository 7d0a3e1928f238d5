pub mod catalog;
pub mod challenge;
pub mod config;
pub mod stats;
