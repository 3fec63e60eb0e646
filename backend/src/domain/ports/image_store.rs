//! Port for storing encoded recipe images.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// The payload is not a decodable image.
        InvalidPayload { message: String } =>
            "invalid image payload: {message}",
        /// The decoded image could not be written.
        Storage { message: String } =>
            "image storage failed: {message}",
    }
}

/// Port turning an encoded image payload into a stable reference.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Decode and persist `payload`, returning the reference clients use to
    /// fetch the image.
    async fn store(&self, payload: String) -> Result<String, ImageStoreError>;

    /// Delete an image previously returned by [`ImageStore::store`].
    ///
    /// References this store did not issue, and images already gone, are
    /// ignored.
    async fn remove(&self, reference: String) -> Result<(), ImageStoreError>;
}
