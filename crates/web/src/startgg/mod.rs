pub mod client;
pub mod models;

pub use client::StartggClient;
pub use models::{TokenResponse, TournamentSummary, Viewer};
