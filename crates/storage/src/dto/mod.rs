pub mod participant;
pub mod pricing;
