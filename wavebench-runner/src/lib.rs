pub mod checker;
pub mod error;
pub mod instance_store;
pub mod result_cache;
pub mod runner;
pub mod solver;
