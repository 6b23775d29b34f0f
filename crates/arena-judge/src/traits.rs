use arena_core::{ExecuteRequest, GenericResponse, ProblemMetadata, Result};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait JudgeBackend: Send + Sync {
    /// Judge one run or submit request.
    ///
    /// Wrong answers and compile errors come back inside the envelope. Only a
    /// transport failure or an unresolvable problem is an `Err`.
    async fn execute(&self, request: &ExecuteRequest) -> Result<GenericResponse>;

    /// Fetch the problem definition used to start a session.
    async fn fetch_metadata(&self, problem_id: &str) -> Result<ProblemMetadata>;
}

#[async_trait]
impl<T: JudgeBackend + ?Sized> JudgeBackend for Arc<T> {
    async fn execute(&self, request: &ExecuteRequest) -> Result<GenericResponse> {
        (**self).execute(request).await
    }

    async fn fetch_metadata(&self, problem_id: &str) -> Result<ProblemMetadata> {
        (**self).fetch_metadata(problem_id).await
    }
}

/// Bring the counters of a judge response back in line with each other.
pub fn normalize_response(mut response: GenericResponse) -> GenericResponse {
    if let Some(payload) = response.payload.as_mut() {
        if let Some(raw) = payload.rawoutput.take() {
            if raw.passed_test_cases > raw.total_test_cases {
                tracing::warn!(
                    passed = raw.passed_test_cases,
                    total = raw.total_test_cases,
                    "Judge reported more passed cases than it ran"
                );
            }
            payload.rawoutput = Some(raw.normalized());
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{ExecutePayload, ExecutionResult};

    #[test]
    fn test_normalize_response_clamps_rawoutput() {
        let response = GenericResponse {
            success: true,
            status: 200,
            payload: Some(ExecutePayload {
                problem_id: "p1".into(),
                language: "python".into(),
                is_run_testcase: true,
                rawoutput: Some(ExecutionResult {
                    total_test_cases: 2,
                    passed_test_cases: 5,
                    ..Default::default()
                }),
            }),
            error: None,
        };
        let raw = normalize_response(response).raw_output().cloned().unwrap();
        assert_eq!(raw.passed_test_cases, 2);
        assert!(raw.overall_pass);
    }

    #[test]
    fn test_normalize_response_without_payload_is_untouched() {
        let response = GenericResponse::harness_error(500, "Timeout", "judge timed out");
        assert_eq!(normalize_response(response.clone()), response);
    }
}
