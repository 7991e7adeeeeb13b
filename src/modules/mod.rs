// Declare all modules
pub mod cli;
pub mod email;
pub mod utils;

// No re-exports here as they're handled in lib.rs
