//! Request and response models
//!
//! Wire bodies sent to the Joystick API and the typed results handed back
//! to callers.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ContentOptions, PublishData, PublishDataBuilder, RequestBody, ResponseType};
pub use responses::{deserialize_data, serialized_text, strip_enclosing_quotes, FullContent, Meta};
