//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Sweep: Eagerly drops expired entries from every scope

mod sweep;

pub use sweep::spawn_sweep_task;
