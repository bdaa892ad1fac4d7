//! Collaborators around the query core: reading CSV files and rendering results.

pub mod loader;
pub mod render;
