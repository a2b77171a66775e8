pub mod environment;
pub mod propulsion;
pub mod sweep;
pub mod vehicle;
