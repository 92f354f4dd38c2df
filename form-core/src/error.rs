//! Error types for form collection and submission.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FormError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Submission attempted before a photo was selected.
    #[error("photo has not been uploaded")]
    MissingPhoto,

    /// Submission attempted with an untouched signature surface.
    #[error("signature surface is blank")]
    BlankSignature,

    /// A required field was blank when the snapshot was built.
    #[error("required field `{0}` is empty")]
    EmptyField(String),

    #[error("photo is {size} bytes, above the {limit} byte upload limit")]
    PhotoTooLarge { size: u64, limit: u64 },

    #[error("file type `{0}` is not an image")]
    NotAnImage(String),

    /// The signature raster could not be serialized.
    #[error("signature capture failed: {0}")]
    SignatureCapture(String),
}

impl FormError {
    /// Text shown to the applicant in the blocking alert.
    pub fn user_message(&self) -> String {
        match self {
            FormError::MissingPhoto => "❌ Please upload your passport size photo!".to_string(),
            FormError::BlankSignature => "❌ Please provide your signature!".to_string(),
            FormError::EmptyField(name) => format!("❌ Please fill in the {name} field!"),
            FormError::PhotoTooLarge { limit, .. } => {
                format!("❌ File size must be less than {}!", megabytes(*limit))
            }
            FormError::NotAnImage(_) => "❌ Please upload an image file!".to_string(),
            FormError::SignatureCapture(_) => "❌ Please provide your signature!".to_string(),
        }
    }
}

fn megabytes(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{:.1}MB", bytes as f64 / MIB as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_message_follows_the_limit() {
        let err = |limit| FormError::PhotoTooLarge { size: limit + 1, limit };
        assert_eq!(
            err(5 * 1024 * 1024).user_message(),
            "❌ File size must be less than 5MB!"
        );
        assert_eq!(
            err(2 * 1024 * 1024).user_message(),
            "❌ File size must be less than 2MB!"
        );
        assert_eq!(
            err(1536 * 1024).user_message(),
            "❌ File size must be less than 1.5MB!"
        );
    }
}
