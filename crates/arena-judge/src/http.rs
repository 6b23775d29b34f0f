use crate::metadata::normalize_metadata;
use crate::traits::{normalize_response, JudgeBackend};
use arena_core::{ArenaError, ExecuteRequest, GenericResponse, ProblemMetadata, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

/// Longest slice of an unstructured error body echoed into an error message.
const BODY_PREVIEW: usize = 200;

/// Judge reached over HTTP.
///
/// No request timeout is set: how long judging may take is the judge's call.
pub struct HttpJudge {
    client: reqwest::Client,
    base_url: String,
}

impl HttpJudge {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn transport(e: reqwest::Error) -> ArenaError {
    ArenaError::Network(e.to_string())
}

fn preview(body: &str) -> &str {
    let body = body.trim();
    match body.char_indices().nth(BODY_PREVIEW) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[async_trait]
impl JudgeBackend for HttpJudge {
    async fn execute(&self, request: &ExecuteRequest) -> Result<GenericResponse> {
        if request.problem_id.trim().is_empty() {
            return Err(ArenaError::NotFound("empty problem id".to_string()));
        }

        let url = format!("{}/problems/execute", self.base_url);
        debug!(
            problem_id = %request.problem_id,
            language = %request.language,
            mode = %request.mode(),
            test_cases = request.test_cases.len(),
            source_size = request.user_code.len(),
            "Sending execution request"
        );

        let res = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        let status = res.status();
        let body = res.text().await.map_err(transport)?;

        if status == StatusCode::NOT_FOUND {
            return Err(ArenaError::NotFound(request.problem_id.clone()));
        }

        match serde_json::from_str::<GenericResponse>(&body) {
            Ok(mut response) => {
                if response.status == 0 {
                    response.status = status.as_u16();
                }
                info!(
                    problem_id = %request.problem_id,
                    status = response.status,
                    success = response.success,
                    "Judge responded"
                );
                Ok(normalize_response(response))
            }
            Err(e) if status.is_success() => {
                warn!(problem_id = %request.problem_id, error = %e, "Malformed judge response");
                Err(ArenaError::Network(format!("Malformed judge response: {}", e)))
            }
            Err(_) => Err(ArenaError::Network(format!(
                "Judge returned {}: {}",
                status,
                preview(&body)
            ))),
        }
    }

    async fn fetch_metadata(&self, problem_id: &str) -> Result<ProblemMetadata> {
        if problem_id.trim().is_empty() {
            return Err(ArenaError::NotFound("empty problem id".to_string()));
        }

        let url = format!("{}/problems/metadata", self.base_url);
        debug!(problem_id = %problem_id, "Fetching problem metadata");

        let res = self
            .client
            .get(&url)
            .query(&[("problem_id", problem_id)])
            .send()
            .await
            .map_err(transport)?;
        let status = res.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ArenaError::NotFound(problem_id.to_string()));
        }
        if !status.is_success() {
            let body = res.text().await.map_err(transport)?;
            return Err(ArenaError::Network(format!(
                "Judge returned {}: {}",
                status,
                preview(&body)
            )));
        }

        let value: serde_json::Value = res
            .json()
            .await
            .map_err(|e| ArenaError::Network(format!("Malformed problem metadata: {}", e)))?;

        normalize_metadata(value).map_err(|e| match e {
            ArenaError::NotFound(_) => ArenaError::NotFound(problem_id.to_string()),
            other => other,
        })
    }
}
