use std::{sync::Arc, time::Duration};

use reqwest::Client;

use crate::{
    client::groq_client::GroqClient, config::config::AppConfig,
    ingest::ingestor::DocumentIngestor, server::error::ServerError,
};

pub struct AppState {
    client: Client,
    groq_client: GroqClient,
    ingestor: DocumentIngestor,
    max_json_bytes: usize,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Arc<Self>, ServerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.groq.timeout_secs))
            .build()
            .map_err(|e| ServerError::Internal(format!("Failed to build http client: {}", e)))?;

        let groq_client = GroqClient::from_config(&config.groq);
        let ingestor = DocumentIngestor::new(config.upload.max_file_bytes, config.upload_dir());

        let state = Arc::new(Self {
            client,
            groq_client,
            ingestor,
            max_json_bytes: config.upload.max_json_bytes as usize,
        });

        Ok(state)
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }

    pub fn get_groq_client(&self) -> &GroqClient {
        &self.groq_client
    }

    pub fn get_ingestor(&self) -> &DocumentIngestor {
        &self.ingestor
    }

    pub fn get_max_json_bytes(&self) -> usize {
        self.max_json_bytes
    }
}
