//! Error types for document rendering.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    /// Rendering was requested before any registration was accepted.
    #[error("no registration snapshot to render")]
    MissingSnapshot,

    /// One image could not be placed. Caught per image by the renderer.
    #[error("image {name}: {reason}")]
    Image { name: String, reason: String },

    /// The finished document could not be handed to the browser.
    #[error("save: {0}")]
    Save(String),
}

impl RenderError {
    /// Text shown to the applicant in the blocking alert.
    pub fn user_message(&self) -> String {
        match self {
            RenderError::MissingSnapshot => "❌ No registration data found!".to_string(),
            _ => "❌ Error generating PDF. Please try again or contact support.".to_string(),
        }
    }
}
