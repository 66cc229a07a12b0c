//! Repository layer: parameterized SQL over registry-described collections

pub mod movements;
pub mod records;

pub use movements::MovementRepo;
pub use records::RecordRepo;
