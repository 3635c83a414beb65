/// Database model definitions.
pub mod models;
/// Roster document storage and retrieval operations.
pub mod roster_store;
/// Storage abstraction layer for database operations.
pub mod storage;
