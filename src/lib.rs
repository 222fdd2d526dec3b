// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod config;
pub mod console;
pub mod exercises;
pub mod hospital;
pub mod model;
pub mod results_grid;

#[cfg(test)]
pub(crate) mod test_utils;
