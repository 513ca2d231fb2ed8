// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod queries;
pub mod routes;
pub mod state;
pub mod supabase;
pub mod utils;

pub use routes::create_router;
