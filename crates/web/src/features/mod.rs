pub mod auth;
pub mod kiosk;
pub mod participants;
pub mod pricing;
pub mod tournaments;
