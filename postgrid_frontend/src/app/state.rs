use crate::models::User;

/// Read-only user roster shown next to the posts grid.
#[derive(Debug)]
pub struct UsersState {
    pub users: Vec<User>,
    pub loading: bool,
    pub error: Option<String>,
    pub open: bool,
}

impl Default for UsersState {
    /// The roster panel starts open.
    fn default() -> Self {
        Self {
            users: Vec::new(),
            loading: false,
            error: None,
            open: true,
        }
    }
}

/// Decoded RGBA pixels waiting to be uploaded as a texture on the UI thread.
#[derive(Clone)]
pub struct LoadedImage {
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

impl LoadedImage {
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let decoded = image::load_from_memory(bytes)?;
        let size = [decoded.width() as usize, decoded.height() as usize];
        Ok(Self {
            size,
            pixels: decoded.to_rgba8().into_raw(),
        })
    }
}
