//! Single-page session: captured images plus the accepted snapshot.

use crate::error::{FormError, Result};
use crate::models::{CapturedImage, FieldValues, LogoSlot, RegistrationSnapshot};
use crate::profile::EventProfile;
use crate::registration::{Timestamp, format_date_en_in, registration_id};

/// Anything that can answer "is there ink?" and hand over its raster.
pub trait SignatureSource {
    fn is_blank(&self) -> bool;
    fn capture(&self) -> Result<CapturedImage>;
}

/// State owned by one page session. Dropped on reload.
#[derive(Debug, Default)]
pub struct Session {
    profile: EventProfile,
    photo: Option<CapturedImage>,
    signature: Option<CapturedImage>,
    logos: [Option<CapturedImage>; 2],
    snapshot: Option<RegistrationSnapshot>,
}

impl Session {
    pub fn new(profile: EventProfile) -> Self {
        Session {
            profile,
            ..Default::default()
        }
    }

    pub fn profile(&self) -> &EventProfile {
        &self.profile
    }

    pub fn photo(&self) -> Option<&CapturedImage> {
        self.photo.as_ref()
    }

    /// Replace the photo wholesale.
    pub fn set_photo(&mut self, photo: CapturedImage) {
        self.photo = Some(photo);
    }

    pub fn signature(&self) -> Option<&CapturedImage> {
        self.signature.as_ref()
    }

    pub fn logo(&self, slot: LogoSlot) -> Option<&CapturedImage> {
        self.logos[slot.index()].as_ref()
    }

    pub fn set_logo(&mut self, slot: LogoSlot, image: CapturedImage) {
        self.logos[slot.index()] = Some(image);
    }

    pub fn snapshot(&self) -> Option<&RegistrationSnapshot> {
        self.snapshot.as_ref()
    }

    /// Gate checks run before any field is read: photo first, then ink.
    pub fn check_ready(&self, signature: &dyn SignatureSource) -> Result<()> {
        if self.photo.is_none() {
            return Err(FormError::MissingPhoto);
        }
        if signature.is_blank() {
            return Err(FormError::BlankSignature);
        }
        Ok(())
    }

    /// Accept a submission.
    ///
    /// Nothing in the session changes unless every step succeeds; on success
    /// the signature raster and the new snapshot replace any previous ones.
    pub fn submit(
        &mut self,
        signature: &dyn SignatureSource,
        fields: FieldValues,
        now: Timestamp,
        unit_random: f64,
    ) -> Result<&RegistrationSnapshot> {
        self.check_ready(signature)?;
        let captured = signature.capture()?;
        let id = registration_id(&self.profile.id_prefix, now.epoch_ms, unit_random);
        let snapshot = RegistrationSnapshot::new(id, format_date_en_in(&now.local), fields)?;

        log::info!("registration accepted: {}", snapshot.registration_id());
        log::debug!("{snapshot:?}");
        self.signature = Some(captured);
        Ok(self.snapshot.insert(snapshot))
    }
}
