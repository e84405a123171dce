// Library root: the auction plan state model, candidate pool, local store,
// persistence adapter and configuration.

pub mod config;
pub mod draft;
pub mod persist;
pub mod pool;
pub mod store;
