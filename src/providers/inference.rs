use anyhow::{ensure, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::SynergyModel;

#[derive(Serialize)]
struct ScoreRequest<'a> {
    node_features: &'a [Vec<f64>],
    edge_index: &'a [(usize, usize)],
}

#[derive(Deserialize)]
struct ScoreResponse {
    scores: Vec<f64>,
}

/// Synergy model hosted behind a JSON endpoint.
pub struct HttpSynergyModel {
    client: Client,
    endpoint: String,
}

impl HttpSynergyModel {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SynergyModel for HttpSynergyModel {
    async fn score(&self, node_features: &[Vec<f64>], edge_index: &[(usize, usize)]) -> Result<Vec<f64>> {
        let res = self
            .client
            .post(&self.endpoint)
            .json(&ScoreRequest { node_features, edge_index })
            .send()
            .await?
            .error_for_status()?;

        let body: ScoreResponse = res.json().await?;
        ensure!(
            body.scores.len() == edge_index.len(),
            "model returned {} scores for {} edges",
            body.scores.len(),
            edge_index.len()
        );
        Ok(body.scores)
    }
}
