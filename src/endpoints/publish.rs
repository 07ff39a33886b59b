//! Content update: `PUT /config/{id}` on the management host.

use super::{checked_content_id, PUBLISH_API_BASE};
use crate::error::Result;
use crate::models::PublishData;

#[derive(Debug, Clone, PartialEq)]
pub struct PublishUpdateEndpoint {
    content_id: String,
    data: PublishData,
}

impl PublishUpdateEndpoint {
    pub fn new(content_id: &str, data: PublishData) -> Result<Self> {
        Ok(Self {
            content_id: checked_content_id(content_id)?,
            data,
        })
    }

    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    pub fn data(&self) -> &PublishData {
        &self.data
    }

    pub fn url(&self) -> String {
        format!("{}/config/{}", PUBLISH_API_BASE, self.content_id)
    }
}
