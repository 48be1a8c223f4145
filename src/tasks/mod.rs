//! Background Tasks Module
//!
//! Periodic cache maintenance loops.

mod cleanup;

pub use cleanup::{spawn_expired_cleanup_task, spawn_smart_cleanup_task};
