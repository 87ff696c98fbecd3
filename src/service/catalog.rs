use std::collections::HashMap;

use serde::Deserialize;

use super::{ServiceError, TranslationService};

/// A target language offered by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub code: String,
    pub name: String,
}

/// Response of `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub total_languages: usize,
}

#[derive(Deserialize)]
struct LanguagesResponse {
    languages: HashMap<String, String>,
}

impl TranslationService {
    /// Fetch the supported target languages, sorted by display name.
    pub async fn fetch_languages(&self) -> Result<Vec<Language>, ServiceError> {
        let body = self.get_text("/api/languages").await?;
        let parsed: LanguagesResponse =
            serde_json::from_str(&body).map_err(|e| ServiceError::Api {
                status: 200,
                body: format!("unexpected languages payload: {e}"),
            })?;
        let languages = sorted_languages(parsed.languages);
        log::info!("Loaded {} languages", languages.len());
        Ok(languages)
    }

    /// Fetch server status, including the available translation services.
    pub async fn fetch_status(&self) -> Result<ServiceStatus, ServiceError> {
        let body = self.get_text("/api/status").await?;
        serde_json::from_str(&body).map_err(|e| ServiceError::Api {
            status: 200,
            body: format!("unexpected status payload: {e}"),
        })
    }

    async fn get_text(&self, path: &str) -> Result<String, ServiceError> {
        let resp = self.client.get(self.endpoint(path)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            // Best effort: the status alone is enough to report.
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.text().await?)
    }
}

fn sorted_languages(map: HashMap<String, String>) -> Vec<Language> {
    let mut languages: Vec<Language> = map
        .into_iter()
        .map(|(code, name)| Language { code, name })
        .collect();
    languages.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));
    languages
}
