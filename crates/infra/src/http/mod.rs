//! HTTP client shared by the API adapters

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
