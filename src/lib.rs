pub mod app;
pub mod catalog;
pub mod config;
pub mod embed;
pub mod error;
pub mod feed;
pub mod models;
pub mod ratings;
pub mod sort;
pub mod tmdb;
pub mod utils;
