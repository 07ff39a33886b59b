//! Joystick SDK - Client for the Joystick remote configuration service
//!
//! Fetches config content by id, caches the formatted responses in a bounded
//! TTL cache and publishes content updates.

pub mod cache;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod tasks;
pub mod transport;

pub use cache::{ApiCache, LruApiCache};
pub use client::JoystickClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{ConfigurationError, JoystickError, Result};
pub use models::{ContentOptions, FullContent, Meta, PublishData, ResponseType};
pub use tasks::spawn_cleanup_task;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
