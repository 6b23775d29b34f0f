use crate::traits::JudgeBackend;
use arena_core::{ArenaError, ExecuteRequest, GenericResponse, ProblemMetadata, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

/// What a [`ScriptedJudge`] does with the next execution request.
#[derive(Debug)]
pub enum Reply {
    Respond(GenericResponse),
    Fail(ArenaError),
    /// Never resolves.
    Hang,
}

/// Deterministic judge that answers from a prepared script.
///
/// Replies are consumed in order, one per `execute` call. Every request is
/// recorded so callers can check what was sent.
#[derive(Default)]
pub struct ScriptedJudge {
    replies: Mutex<VecDeque<Reply>>,
    problems: HashMap<String, ProblemMetadata>,
    requests: Mutex<Vec<ExecuteRequest>>,
}

impl ScriptedJudge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_problem(mut self, metadata: ProblemMetadata) -> Self {
        self.problems.insert(metadata.problem_id.clone(), metadata);
        self
    }

    pub fn push(&self, reply: Reply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    pub fn respond(&self, response: GenericResponse) {
        self.push(Reply::Respond(response));
    }

    pub fn fail(&self, error: ArenaError) {
        self.push(Reply::Fail(error));
    }

    pub fn hang(&self) {
        self.push(Reply::Hang);
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ExecuteRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_reply(&self) -> Option<Reply> {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

#[async_trait]
impl JudgeBackend for ScriptedJudge {
    async fn execute(&self, request: &ExecuteRequest) -> Result<GenericResponse> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        match self.next_reply() {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(error)) => Err(error),
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(ArenaError::Network("no scripted reply left".to_string())),
        }
    }

    async fn fetch_metadata(&self, problem_id: &str) -> Result<ProblemMetadata> {
        self.problems
            .get(problem_id)
            .cloned()
            .ok_or_else(|| ArenaError::NotFound(problem_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::ExecutionResult;
    use std::time::Duration;

    fn request() -> ExecuteRequest {
        ExecuteRequest {
            problem_id: "p1".into(),
            language: "python".into(),
            user_code: "print(1)".into(),
            is_run_testcase: false,
            test_cases: vec![],
        }
    }

    #[tokio::test]
    async fn test_replies_are_consumed_in_order() {
        let judge = ScriptedJudge::new();
        let req = request();
        judge.respond(GenericResponse::judged(&req, ExecutionResult::default()));
        judge.fail(ArenaError::Network("Network timeout".into()));

        assert!(judge.execute(&req).await.is_ok());
        let err = judge.execute(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "Network error: Network timeout");
        assert!(matches!(
            judge.execute(&req).await,
            Err(ArenaError::Network(_))
        ));
        assert_eq!(judge.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_hang_never_resolves() {
        let judge = ScriptedJudge::new();
        judge.hang();
        let req = request();
        let outcome = tokio::time::timeout(Duration::from_millis(20), judge.execute(&req)).await;
        assert!(outcome.is_err());
        assert_eq!(judge.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_problem_is_not_found() {
        let judge = ScriptedJudge::new();
        let err = judge.fetch_metadata("nope").await.unwrap_err();
        assert!(matches!(err, ArenaError::NotFound(id) if id == "nope"));
    }
}
