//! Background Tasks Module
//!
//! - Cache cleanup: purges expired entries of an [`LruApiCache`](crate::cache::LruApiCache)
//!   at a fixed interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
