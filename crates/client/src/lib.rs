//! Client side of the marketplace: the provider profile form and the HTTP
//! adapters it submits through.

pub mod errors;
pub mod form;
pub mod gateway;
pub mod upload;

pub use errors::ClientError;
pub use form::{Notification, ProfileForm, ProfileValues, SelectedFile, ValidationErrors};
pub use gateway::{HttpGateway, ProfileGateway};
pub use upload::HttpUploader;
