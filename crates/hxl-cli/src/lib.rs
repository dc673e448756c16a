//! Library side of the `hxl` console tool.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
