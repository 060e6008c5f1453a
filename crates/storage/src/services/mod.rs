pub mod checkin;
pub mod pricing;
