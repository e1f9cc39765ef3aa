mod client;
mod models;

pub use client::{ApiClient, ApiError, Result};
pub use models::{ApiConfig, DEFAULT_API_URL};
