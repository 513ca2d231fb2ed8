// src/handlers/mod.rs

pub mod create;
pub mod detail;
pub mod edit;
pub mod listing;
