// src/models/mod.rs

pub mod comment;
pub mod listing;
pub mod post;
pub mod tag;
pub mod view;
