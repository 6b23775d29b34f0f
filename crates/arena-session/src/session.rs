use crate::message::{failure_message, GENERIC_FAILURE};
use crate::state::{ConsoleTab, Notice, NoticeLevel, Phase};
use arena_core::{
    ArenaError, ExecuteRequest, ExecutionMode, ExecutionResult, FailedTestCaseDetail,
    GenericResponse, ProblemMetadata, Result, TestCase,
};
use arena_judge::{normalize_response, JudgeBackend};
use arena_store::CodeStore;
use tracing::{debug, info, warn};

/// Client-side run/submit state for one problem view.
///
/// `idle -> pending -> success | failure`, back to `idle` on [`Session::reset`].
/// Only one execution is in flight at a time: `run` and `submit` take
/// `&mut self`, and a session left `Pending` by an abandoned call refuses new
/// executions until it is reset.
pub struct Session<B, S> {
    metadata: ProblemMetadata,
    language: String,
    code: String,
    custom_cases: Vec<TestCase>,
    phase: Phase,
    output: Vec<String>,
    result: Option<ExecutionResult>,
    notice: Option<Notice>,
    focused_tab: ConsoleTab,
    last_mode: Option<ExecutionMode>,
    backend: B,
    store: S,
}

impl<B: JudgeBackend, S: CodeStore> Session<B, S> {
    /// Start a session on already fetched metadata.
    ///
    /// The editor starts with the persisted code for `(problem, language)`, or
    /// the problem's placeholder when nothing was persisted.
    pub fn new(metadata: ProblemMetadata, language: &str, backend: B, store: S) -> Result<Self> {
        ensure_supported(&metadata, language)?;

        let code = restore_code(&store, &metadata, language);
        info!(
            problem_id = %metadata.problem_id,
            language = %language,
            samples = metadata.sample_cases().len(),
            "Session opened"
        );

        Ok(Self {
            metadata,
            language: language.to_string(),
            code,
            custom_cases: Vec::new(),
            phase: Phase::Idle,
            output: Vec::new(),
            result: None,
            notice: None,
            focused_tab: ConsoleTab::TestCases,
            last_mode: None,
            backend,
            store,
        })
    }

    /// Fetch the problem through `backend` and start a session on it.
    pub async fn open(backend: B, store: S, problem_id: &str, language: &str) -> Result<Self> {
        let metadata = backend.fetch_metadata(problem_id).await?;
        Self::new(metadata, language, backend, store)
    }

    pub fn metadata(&self) -> &ProblemMetadata {
        &self.metadata
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn custom_cases(&self) -> &[TestCase] {
        &self.custom_cases
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn result(&self) -> Option<&ExecutionResult> {
        self.result.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn focused_tab(&self) -> ConsoleTab {
        self.focused_tab
    }

    /// Mode of the most recent execution since the last reset.
    pub fn last_mode(&self) -> Option<ExecutionMode> {
        self.last_mode
    }

    /// Index of the failing case to highlight, when the judge named one.
    pub fn highlighted_case(&self) -> Option<usize> {
        self.result
            .as_ref()
            .and_then(|r| r.failed_test_case.as_ref())
            .and_then(FailedTestCaseDetail::index)
    }

    /// Cases sent with a request in `mode`.
    ///
    /// Run uses the built-in samples followed by the custom cases, each group
    /// in insertion order. Submit uses the official cases only.
    pub fn test_set(&self, mode: ExecutionMode) -> Vec<TestCase> {
        let mut cases = self.metadata.sample_cases().to_vec();
        if mode.is_run() {
            cases.extend(self.custom_cases.iter().cloned());
        }
        cases
    }

    /// Replace the editor contents and persist them for the current language.
    ///
    /// The in-memory code is updated even when persisting fails.
    pub fn set_code(&mut self, code: impl Into<String>) -> Result<()> {
        self.code = code.into();
        self.store
            .save(&self.metadata.problem_id, &self.language, &self.code)
    }

    /// Switch the editor to `language`, restoring its persisted code or
    /// falling back to the placeholder.
    pub fn switch_language(&mut self, language: &str) -> Result<()> {
        ensure_supported(&self.metadata, language)?;
        if language == self.language {
            return Ok(());
        }

        self.code = restore_code(&self.store, &self.metadata, language);
        self.language = language.to_string();
        debug!(
            problem_id = %self.metadata.problem_id,
            language = %language,
            "Switched language"
        );
        Ok(())
    }

    /// Append a user-supplied case. Both fields must be non-empty; nothing else
    /// about them is checked.
    pub fn add_custom_case(
        &mut self,
        input: impl Into<String>,
        expected: impl Into<String>,
    ) -> Result<&TestCase> {
        let input = input.into();
        let expected = expected.into();
        if input.is_empty() {
            return Err(ArenaError::InvalidTestCase("input is empty".to_string()));
        }
        if expected.is_empty() {
            return Err(ArenaError::InvalidTestCase(
                "expected output is empty".to_string(),
            ));
        }

        let id = format!("custom-{}", uuid::Uuid::new_v4());
        self.custom_cases.push(TestCase::new(input, expected).with_id(id));
        let idx = self.custom_cases.len() - 1;
        Ok(&self.custom_cases[idx])
    }

    /// Drop a custom case by id. Returns whether one was removed.
    pub fn remove_custom_case(&mut self, id: &str) -> bool {
        let before = self.custom_cases.len();
        self.custom_cases.retain(|case| case.id.as_deref() != Some(id));
        before != self.custom_cases.len()
    }

    /// Run the current code against the samples and custom cases.
    pub async fn run(&mut self) -> Result<Phase> {
        self.execute(ExecutionMode::Run).await
    }

    /// Submit the current code against the full suite.
    pub async fn submit(&mut self) -> Result<Phase> {
        self.execute(ExecutionMode::Submit).await
    }

    /// Return to `Idle`: clear output, result and custom cases, and put the
    /// placeholder back in the editor, forgetting persisted code for the
    /// current language. Accepted in every phase.
    pub fn reset(&mut self) -> Result<()> {
        self.output.clear();
        self.result = None;
        self.notice = None;
        self.custom_cases.clear();
        self.code = self.metadata.placeholder(&self.language).to_string();
        self.phase = Phase::Idle;
        self.focused_tab = ConsoleTab::TestCases;
        self.last_mode = None;

        info!(
            problem_id = %self.metadata.problem_id,
            language = %self.language,
            "Session reset"
        );
        self.store
            .remove(&self.metadata.problem_id, &self.language)
    }

    /// Judge the editor snapshot in `mode`.
    ///
    /// Backend faults never escape: they end the execution in `Failure`. The
    /// only error returned is [`ArenaError::Busy`].
    async fn execute(&mut self, mode: ExecutionMode) -> Result<Phase> {
        if self.phase == Phase::Pending {
            return Err(ArenaError::Busy);
        }

        let test_set = self.test_set(mode);
        let request = ExecuteRequest {
            problem_id: self.metadata.problem_id.clone(),
            language: self.language.clone(),
            user_code: self.code.clone(),
            is_run_testcase: mode.is_run(),
            test_cases: if mode.is_run() {
                test_set.clone()
            } else {
                Vec::new()
            },
        };

        self.phase = Phase::Pending;
        self.last_mode = Some(mode);
        self.result = None;
        self.notice = None;
        self.output.push(match mode {
            ExecutionMode::Run => format!("Running {} test cases...", test_set.len()),
            ExecutionMode::Submit => "Submitting solution...".to_string(),
        });
        info!(
            problem_id = %request.problem_id,
            language = %request.language,
            mode = %mode,
            test_cases = test_set.len(),
            "Execution started"
        );

        match self.backend.execute(&request).await {
            Ok(response) => self.settle(normalize_response(response), test_set.len()),
            Err(e) => self.abort(e, test_set.len()),
        }

        Ok(self.phase)
    }

    fn settle(&mut self, response: GenericResponse, total: usize) {
        let raw = response.raw_output().cloned();

        match raw {
            Some(result) if response.success && result.overall_pass => {
                self.output.push(format!(
                    "Accepted: {}/{} test cases passed",
                    result.passed_test_cases, result.total_test_cases
                ));
                info!(
                    problem_id = %self.metadata.problem_id,
                    passed = result.passed_test_cases,
                    total = result.total_test_cases,
                    "All test cases passed"
                );
                self.finish(
                    Phase::Success,
                    Notice::new(NoticeLevel::Success, "All test cases passed"),
                    ConsoleTab::Output,
                    result,
                );
            }
            // A syntax error is reported as an error even when the envelope says success.
            Some(result) if response.success && result.syntax_error.is_none() => {
                let summary = format!(
                    "{}/{} test cases passed",
                    result.passed_test_cases, result.total_test_cases
                );
                self.output.push(format!("Wrong Answer: {}", summary));
                if let Some(idx) = result.failed_test_case.as_ref().and_then(|d| d.index()) {
                    self.output.push(format!("Failed on test case #{}", idx + 1));
                }
                info!(
                    problem_id = %self.metadata.problem_id,
                    passed = result.passed_test_cases,
                    total = result.total_test_cases,
                    "Some test cases failed"
                );
                self.finish(
                    Phase::Failure,
                    Notice::new(NoticeLevel::Warning, summary),
                    ConsoleTab::TestCases,
                    result,
                );
            }
            raw => {
                let message = failure_message(&response);
                let mut result =
                    raw.unwrap_or_else(|| ExecutionResult::aborted(total, message.clone()));
                if result.failed_test_case.is_none() {
                    result.failed_test_case =
                        Some(FailedTestCaseDetail::unidentified(message.clone()));
                }

                self.output.push(format!("Error: {}", message));
                warn!(
                    problem_id = %self.metadata.problem_id,
                    status = response.status,
                    error = %message,
                    "Judge reported an error"
                );
                self.finish(
                    Phase::Failure,
                    Notice::new(NoticeLevel::Error, message),
                    ConsoleTab::Output,
                    result,
                );
            }
        }
    }

    fn abort(&mut self, error: ArenaError, total: usize) {
        let mut message = error.detail();
        if message.trim().is_empty() {
            message = GENERIC_FAILURE.to_string();
        }

        self.output.push(format!("Error: {}", message));
        warn!(
            problem_id = %self.metadata.problem_id,
            error = %error,
            "Execution request failed"
        );
        let result = ExecutionResult::aborted(total, message.clone());
        self.finish(
            Phase::Failure,
            Notice::new(NoticeLevel::Error, message),
            ConsoleTab::Output,
            result,
        );
    }

    fn finish(&mut self, phase: Phase, notice: Notice, tab: ConsoleTab, result: ExecutionResult) {
        self.phase = phase;
        self.notice = Some(notice);
        self.focused_tab = tab;
        self.result = Some(result);
    }
}

fn ensure_supported(metadata: &ProblemMetadata, language: &str) -> Result<()> {
    if metadata.supports(language) {
        Ok(())
    } else {
        Err(ArenaError::UnsupportedLanguage {
            problem_id: metadata.problem_id.clone(),
            language: language.to_string(),
        })
    }
}

fn restore_code<S: CodeStore>(store: &S, metadata: &ProblemMetadata, language: &str) -> String {
    match store.load(&metadata.problem_id, language) {
        Ok(Some(code)) => code,
        Ok(None) => metadata.placeholder(language).to_string(),
        Err(e) => {
            warn!(
                problem_id = %metadata.problem_id,
                language = %language,
                error = %e,
                "Could not read persisted code, using placeholder"
            );
            metadata.placeholder(language).to_string()
        }
    }
}
