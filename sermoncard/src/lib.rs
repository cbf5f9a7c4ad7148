pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod llm;
pub mod models;
pub mod processing;
pub mod views;
