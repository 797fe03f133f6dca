use std::path::PathBuf;

use async_trait::async_trait;
use recite_config::fetcher::FetcherConfig;
use recite_core::fetcher::{AudioOutcome, AudioReport, DictionaryFetcher, FetchError};
use recite_core::words::audio_path;
use recite_types::{Accent, RawDefinition};

use crate::audio::{download_to_file, file_ready};
use crate::parse::parse_page;

/// Fetches word pages from iciba and keeps the local pronunciation audio tree filled
#[derive(Clone)]
pub struct IcibaFetcher {
    client: reqwest::Client,
    base_url: String,
    audio_root: PathBuf,
}

impl IcibaFetcher {
    pub fn new(config: &FetcherConfig, audio_root: PathBuf) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            audio_root,
        })
    }

    async fn fetch_definition(&self, word: &str) -> Result<RawDefinition, FetchError> {
        let url = format!("{}/word", self.base_url);
        tracing::debug!("Fetching definition for '{}' from {}", word, url);

        let response = self.client.get(&url).query(&[("w", word)]).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        parse_page(word, &body)
    }

    /// Download every accent whose file is missing; never fails as a whole
    async fn download_missing(&self, word: &str, definition: &RawDefinition) -> AudioReport {
        let mut report = AudioReport::skipped();

        for accent in Accent::ALL {
            let target = audio_path(&self.audio_root, accent, word);
            if file_ready(&target).await {
                continue;
            }

            let source = definition.audio_source(accent);
            let outcome = if source.is_empty() {
                AudioOutcome::Failed("no audio source".to_string())
            } else {
                match download_to_file(&self.client, source, &target).await {
                    Ok(()) => AudioOutcome::Downloaded,
                    Err(e) => AudioOutcome::Failed(e.to_string()),
                }
            };

            match &outcome {
                AudioOutcome::Failed(reason) => {
                    tracing::warn!("Audio {} for '{}' not downloaded: {}", accent, word, reason)
                }
                _ => tracing::debug!("Audio {} for '{}': {}", accent, word, outcome),
            }
            report.set(accent, outcome);
        }

        report
    }
}

#[async_trait]
impl DictionaryFetcher for IcibaFetcher {
    async fn fetch(&self, word: &str) -> Result<RawDefinition, FetchError> {
        let definition = self.fetch_definition(word).await?;

        // Audio is best effort here, ensure_audio_files can retry later
        let report = self.download_missing(word, &definition).await;
        tracing::info!(
            "Fetched '{}' (audio en: {}, am: {})",
            word,
            report.en,
            report.am
        );

        Ok(definition)
    }

    async fn ensure_audio_files(&self, word: &str) -> Result<AudioReport, FetchError> {
        let en_ready = file_ready(&audio_path(&self.audio_root, Accent::En, word)).await;
        let am_ready = file_ready(&audio_path(&self.audio_root, Accent::Am, word)).await;
        if en_ready && am_ready {
            return Ok(AudioReport::skipped());
        }

        let definition = self.fetch_definition(word).await?;
        self.download_missing(word, &definition)
            .await
            .into_result(word)
    }
}
