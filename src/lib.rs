// src/lib.rs

//! Homework review status bot library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
