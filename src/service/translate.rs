use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;

use super::disposition::suggested_filename;
use super::{ServiceError, TranslationService};
use crate::workflow::{ResultOutcome, TranslatedArchive, ValidatedSelection};

/// Response header carrying advisory text about partially failed languages.
pub const WARNINGS_HEADER: &str = "X-Translation-Warnings";

const PPTX_MIME: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";
const GENERIC_FAILURE: &str = "Translation failed. Please try again.";

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl TranslationService {
    /// Upload the presentation and wait for the translated archive.
    ///
    /// Every failure is folded into `ResultOutcome::Failure`, so exactly one
    /// outcome comes back per call.
    pub async fn translate(&self, selection: &ValidatedSelection) -> ResultOutcome {
        match self.post_translation(selection).await {
            Ok((status, headers, body)) => interpret_response(status, &headers, &body),
            Err(e) => {
                log::error!("Translation request failed: {e}");
                ResultOutcome::failure(transport_message(&e))
            }
        }
    }

    async fn post_translation(
        &self,
        selection: &ValidatedSelection,
    ) -> Result<(StatusCode, HeaderMap, Vec<u8>), ServiceError> {
        let path = &selection.file.path;
        let bytes = tokio::fs::read(path).await.map_err(|source| ServiceError::Io {
            path: path.display().to_string(),
            source,
        })?;

        log::info!(
            "Uploading {} ({} bytes) for {:?} as {:?} via {}",
            selection.file.name,
            bytes.len(),
            selection.target_languages,
            selection.formats,
            selection.service
        );

        let file_part = Part::bytes(bytes)
            .file_name(selection.file.name.clone())
            .mime_str(PPTX_MIME)?;

        let mut form = Form::new().part("file", file_part);
        for lang in &selection.target_languages {
            form = form.text("target_langs", lang.clone());
        }
        for format in &selection.formats {
            form = form.text("formats", format.clone());
        }
        form = form.text("service", selection.service.clone());

        let resp = self
            .client
            .post(self.endpoint("/translate"))
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?.to_vec();
        Ok((status, headers, body))
    }
}

/// Turn a completed HTTP exchange into an outcome.
///
/// A JSON body on a success status is the server reporting a logical
/// failure. Any other success body is the archive.
pub fn interpret_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> ResultOutcome {
    if !status.is_success() {
        log::error!("Translation endpoint returned {status}");
        return ResultOutcome::failure(GENERIC_FAILURE);
    }

    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"));
    if is_json {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        log::warn!("Server reported translation error: {message}");
        return ResultOutcome::failure(message);
    }

    let warnings = headers
        .get(WARNINGS_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string);
    let filename = suggested_filename(
        headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok()),
    );

    log::info!("Received {} ({} bytes)", filename, body.len());
    if let Some(ref w) = warnings {
        log::warn!("Translation warnings: {w}");
    }

    ResultOutcome::Success(TranslatedArchive {
        bytes: body.to_vec(),
        filename,
        warnings,
    })
}

fn transport_message(error: &ServiceError) -> String {
    match error {
        ServiceError::Http(e) => e.to_string(),
        other => other.to_string(),
    }
}
