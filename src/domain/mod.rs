//! Domain types and the ports the application layer depends on.

pub mod feedback;
pub mod outcome;
pub mod payment;
pub mod ports;
pub mod signature;
