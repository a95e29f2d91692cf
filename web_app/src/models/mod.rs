pub mod adoption;
pub mod favorite;
pub mod notification;
pub mod pet;
pub mod user_app;
pub mod vet;

/// Raw picture bytes received from a form, with the extension taken from its filename
#[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
pub struct Pic {
    pub body: Vec<u8>,
    pub filename_extension: String,
}
