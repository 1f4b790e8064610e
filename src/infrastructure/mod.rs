//! Infrastructure layer
//!
//! Hardware drivers, flash repositories, the background tasks and the glue
//! that connects them to the knitting controller.

pub mod adapters;
pub mod drivers;
pub mod repositories;
pub mod services;
pub mod tasks;
pub mod types;
