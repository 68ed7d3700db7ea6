// src/lib.rs

//! epiotrkow.pl news scraper and RSS feed generator.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
