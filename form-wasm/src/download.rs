use document_core::{RenderError, RenderedDocument, render_session};
use form_core::format_datetime_en_in;
use wasm_bindgen::JsValue;

use crate::state::State;
use crate::utils::{alert, now, save_bytes_as_file};

/// Render the submitted registration and hand it to the browser as a file.
///
/// Render and save failures are both reported to the applicant.
pub fn download_document(state: &State) -> Result<(), JsValue> {
    let generated_at = format_datetime_en_in(&now()?.local);
    let outcome = deliver(render_session(&state.session, &generated_at), |doc| {
        save_bytes_as_file(&state.document, &doc.filename, "application/pdf", &doc.bytes)
            .map_err(|e| format!("{e:?}"))
    });
    match outcome {
        Ok(filename) => log::info!("PDF generated successfully: {filename}"),
        Err(e) => {
            log::error!("error generating PDF: {e}");
            alert(&state.window, &e.user_message());
        }
    }
    Ok(())
}

/// Pass a rendered document to `save`, folding both stages into one error.
fn deliver<F>(
    rendered: document_core::Result<RenderedDocument>,
    save: F,
) -> document_core::Result<String>
where
    F: FnOnce(&RenderedDocument) -> Result<(), String>,
{
    let doc = rendered?;
    save(&doc).map_err(RenderError::Save)?;
    Ok(doc.filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> RenderedDocument {
        RenderedDocument {
            filename: "Registration_BTPL2026-1-2.pdf".into(),
            bytes: b"%PDF-1.7".to_vec(),
            cursor_end: 0.0,
            failed_images: Vec::new(),
        }
    }

    #[test]
    fn saved_document_reports_filename() {
        let got = deliver(Ok(doc()), |d| {
            assert!(d.bytes.starts_with(b"%PDF"));
            Ok(())
        });
        assert_eq!(got.unwrap(), "Registration_BTPL2026-1-2.pdf");
    }

    #[test]
    fn failed_save_becomes_alertable_error() {
        let err = deliver(Ok(doc()), |_| Err("blob refused".into())).unwrap_err();
        assert!(matches!(&err, RenderError::Save(m) if m == "blob refused"));
        assert_eq!(
            err.user_message(),
            "❌ Error generating PDF. Please try again or contact support."
        );
    }

    #[test]
    fn render_failure_skips_save() {
        let err = deliver(Err(RenderError::MissingSnapshot), |_| {
            panic!("nothing to save")
        })
        .unwrap_err();
        assert_eq!(err.user_message(), "❌ No registration data found!");
    }
}
