//! Journeys query API client
//!
//! Optional: journeys can also be read from JSON files. Configure the backend
//! in `~/.config/journeyscope/config.toml`:
//!
//! ```toml
//! [api]
//! base_url = "https://analytics.example.com/api"
//! website_id = "your-website-id"
//! api_key = "xxxxxxxxxxxx"
//! ```

mod client;

pub use client::{JourneyQuery, QueryClient, SyncQueryClient, MAX_STEPS};
