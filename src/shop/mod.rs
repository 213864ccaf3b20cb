// src/shop/mod.rs
pub mod client;
pub mod models;
