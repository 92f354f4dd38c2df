pub mod error;
pub mod models;
pub mod profile;
pub mod registration;
pub mod session;
pub mod validation;

pub use error::{FormError, Result};
pub use models::{CapturedImage, FieldValues, ImageFormat, LogoSlot, RegistrationSnapshot};
pub use profile::{EventProfile, InputLimits, parse_hex_color};
pub use registration::{Timestamp, format_date_en_in, format_datetime_en_in, registration_id};
pub use session::{Session, SignatureSource};
pub use validation::{DigitField, FieldEvent, FieldMark, check_photo_file, filter_digits, next_mark};
