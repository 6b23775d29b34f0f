use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Index reported when no specific test case could be blamed for a failure.
pub const UNIDENTIFIED_CASE: i64 = -1;

fn unidentified_case() -> i64 {
    UNIDENTIFIED_CASE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub input: String,
    pub expected: String,
}

impl TestCase {
    pub fn new(input: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            id: None,
            input: input.into(),
            expected: expected.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Detail of the single test case blamed for a failed execution.
///
/// `input` and `expected` echo the problem's native parameter shape, so they are
/// kept as raw JSON values rather than strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedTestCaseDetail {
    #[serde(default = "unidentified_case")]
    pub test_case_index: i64,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub expected: Value,
    #[serde(default)]
    pub received: Option<Value>,
    #[serde(default)]
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FailedTestCaseDetail {
    /// A failure that happened before any test case ran.
    pub fn unidentified(message: impl Into<String>) -> Self {
        Self {
            test_case_index: UNIDENTIFIED_CASE,
            input: Value::Null,
            expected: Value::Null,
            received: None,
            passed: false,
            error: Some(message.into()),
        }
    }

    /// Zero-based position of the failing case, if one was identified.
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.test_case_index).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    #[serde(default)]
    pub total_test_cases: u32,
    #[serde(default)]
    pub passed_test_cases: u32,
    #[serde(default)]
    pub failed_test_cases: u32,
    #[serde(default)]
    pub overall_pass: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_test_case: Option<FailedTestCaseDetail>,
}

impl ExecutionResult {
    /// Re-derive the counters so that they always agree with each other.
    ///
    /// `passed` never exceeds `total`, a syntax error means nothing passed,
    /// `failed` is whatever did not pass, and `overall_pass` holds only for a
    /// non-empty, fully passing run.
    pub fn normalized(mut self) -> Self {
        if self.syntax_error.is_some() {
            self.passed_test_cases = 0;
        }
        self.passed_test_cases = self.passed_test_cases.min(self.total_test_cases);
        self.failed_test_cases = self.total_test_cases - self.passed_test_cases;
        self.overall_pass = self.syntax_error.is_none()
            && self.total_test_cases > 0
            && self.passed_test_cases == self.total_test_cases;
        if self.overall_pass {
            self.failed_test_case = None;
        }
        if let Some(detail) = self.failed_test_case.as_mut() {
            detail.passed = false;
        }
        self
    }

    /// Result used when the judge never produced one: nothing passed and the
    /// failure is attributed to no particular case.
    pub fn aborted(total: usize, message: impl Into<String>) -> Self {
        let total = u32::try_from(total).unwrap_or(u32::MAX);
        Self {
            total_test_cases: total,
            passed_test_cases: 0,
            failed_test_cases: total,
            overall_pass: false,
            syntax_error: None,
            failed_test_case: Some(FailedTestCaseDetail::unidentified(message)),
        }
    }
}

/// Render a judge value the way a user typed it: bare strings, JSON otherwise.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl std::fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(syntax) = &self.syntax_error {
            writeln!(f, "Syntax Error: {}", syntax)?;
        }
        writeln!(
            f,
            "Passed: {}/{}",
            self.passed_test_cases, self.total_test_cases
        )?;

        if let Some(detail) = &self.failed_test_case {
            match detail.index() {
                Some(idx) => writeln!(f, "Failed Test Case: #{}", idx + 1)?,
                None => writeln!(f, "Failed Test Case: (none identified)")?,
            }
            if !detail.input.is_null() {
                writeln!(f, "  Input: {}", render_value(&detail.input))?;
            }
            if !detail.expected.is_null() {
                writeln!(f, "  Expected: {}", render_value(&detail.expected))?;
            }
            if let Some(received) = &detail.received {
                writeln!(f, "  Received: {}", render_value(received))?;
            }
            if let Some(error) = &detail.error {
                writeln!(f, "  Error: {}", error)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Sample and custom cases only.
    Run,
    /// The full hidden suite.
    Submit,
}

impl ExecutionMode {
    pub fn is_run(self) -> bool {
        matches!(self, ExecutionMode::Run)
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Run => write!(f, "run"),
            ExecutionMode::Submit => write!(f, "submit"),
        }
    }
}

/// Body of `POST /problems/execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub problem_id: String,
    pub language: String,
    pub user_code: String,
    pub is_run_testcase: bool,
    /// Run-mode test set, built-in cases first. Empty (and omitted) on submit.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_cases: Vec<TestCase>,
}

impl ExecuteRequest {
    pub fn mode(&self) -> ExecutionMode {
        if self.is_run_testcase {
            ExecutionMode::Run
        } else {
            ExecutionMode::Submit
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutePayload {
    #[serde(default)]
    pub problem_id: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub is_run_testcase: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rawoutput: Option<ExecutionResult>,
}

impl ExecutePayload {
    pub fn for_request(request: &ExecuteRequest, rawoutput: ExecutionResult) -> Self {
        Self {
            problem_id: request.problem_id.clone(),
            language: request.language.clone(),
            is_run_testcase: request.is_run_testcase,
            rawoutput: Some(rawoutput),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseError {
    #[serde(default)]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
}

/// Transport envelope returned by the judge.
///
/// `success` reports whether the judging harness itself worked; whether the
/// user's code is correct lives in `rawoutput.overall_pass`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericResponse {
    pub success: bool,
    #[serde(default)]
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ExecutePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl GenericResponse {
    /// The judge ran the code; `result` says how it did.
    pub fn judged(request: &ExecuteRequest, result: ExecutionResult) -> Self {
        Self {
            success: true,
            status: 200,
            payload: Some(ExecutePayload::for_request(request, result)),
            error: None,
        }
    }

    /// The harness itself failed.
    pub fn harness_error(
        status: u16,
        error_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            status,
            payload: None,
            error: Some(ResponseError {
                error_type: error_type.into(),
                message: message.into(),
            }),
        }
    }

    pub fn raw_output(&self) -> Option<&ExecutionResult> {
        self.payload.as_ref().and_then(|p| p.rawoutput.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTestCases {
    #[serde(default)]
    pub run: Vec<TestCase>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemMetadata {
    pub problem_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub testcase_run: RunTestCases,
    #[serde(default)]
    pub supported_languages: Vec<String>,
    #[serde(default)]
    pub placeholder_maps: BTreeMap<String, String>,
}

impl ProblemMetadata {
    pub fn supports(&self, language: &str) -> bool {
        self.supported_languages.iter().any(|l| l == language)
    }

    /// Starter code for `language`, empty when the problem ships none.
    pub fn placeholder(&self, language: &str) -> &str {
        self.placeholder_maps
            .get(language)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn sample_cases(&self) -> &[TestCase] {
        &self.testcase_run.run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failed_detail_defaults_to_unidentified_index() {
        let detail: FailedTestCaseDetail =
            serde_json::from_value(json!({ "error": "boom" })).unwrap();
        assert_eq!(detail.test_case_index, UNIDENTIFIED_CASE);
        assert_eq!(detail.index(), None);
        assert!(!detail.passed);
        assert_eq!(detail.received, None);
    }

    #[test]
    fn test_failed_detail_keeps_structured_payloads() {
        let detail: FailedTestCaseDetail = serde_json::from_value(json!({
            "testCaseIndex": 3,
            "input": { "nums": [2, 7, 11, 15], "target": 9 },
            "expected": [0, 1],
            "received": null,
            "passed": false
        }))
        .unwrap();
        assert_eq!(detail.index(), Some(3));
        assert_eq!(detail.expected, json!([0, 1]));
        assert_eq!(detail.received, None);
        assert_eq!(render_value(&detail.expected), "[0,1]");
    }

    #[test]
    fn test_normalized_clamps_passed_to_total() {
        let result = ExecutionResult {
            total_test_cases: 2,
            passed_test_cases: 7,
            ..Default::default()
        }
        .normalized();
        assert_eq!(result.passed_test_cases, 2);
        assert_eq!(result.failed_test_cases, 0);
        assert!(result.overall_pass);
    }

    #[test]
    fn test_normalized_syntax_error_means_nothing_passed() {
        let result = ExecutionResult {
            total_test_cases: 4,
            passed_test_cases: 4,
            overall_pass: true,
            syntax_error: Some("Unexpected token".into()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(result.passed_test_cases, 0);
        assert!(!result.overall_pass);
    }

    #[test]
    fn test_normalized_failing_case_is_never_marked_passed() {
        let result = ExecutionResult {
            total_test_cases: 3,
            passed_test_cases: 2,
            failed_test_case: Some(FailedTestCaseDetail {
                test_case_index: 2,
                passed: true,
                ..FailedTestCaseDetail::unidentified("")
            }),
            ..Default::default()
        }
        .normalized();
        assert!(!result.failed_test_case.unwrap().passed);
    }

    #[test]
    fn test_normalized_empty_run_never_passes() {
        let result = ExecutionResult {
            overall_pass: true,
            ..Default::default()
        }
        .normalized();
        assert!(!result.overall_pass);
        assert_eq!(result.failed_test_cases, 0);
    }

    #[test]
    fn test_normalized_counts_add_up() {
        for (total, passed) in [(5, 3), (1, 0), (10, 10), (3, 9)] {
            let result = ExecutionResult {
                total_test_cases: total,
                passed_test_cases: passed,
                failed_test_cases: 42,
                ..Default::default()
            }
            .normalized();
            assert_eq!(
                result.passed_test_cases + result.failed_test_cases,
                result.total_test_cases
            );
        }
    }

    #[test]
    fn test_aborted_result() {
        let result = ExecutionResult::aborted(3, "Network timeout");
        assert_eq!(result.total_test_cases, 3);
        assert_eq!(result.passed_test_cases, 0);
        assert!(!result.overall_pass);
        let detail = result.failed_test_case.unwrap();
        assert_eq!(detail.test_case_index, -1);
        assert_eq!(detail.error.as_deref(), Some("Network timeout"));
    }

    #[test]
    fn test_execute_request_wire_format() {
        let submit = ExecuteRequest {
            problem_id: "p1".into(),
            language: "python".into(),
            user_code: "".into(),
            is_run_testcase: false,
            test_cases: vec![],
        };
        let value = serde_json::to_value(&submit).unwrap();
        assert_eq!(
            value,
            json!({
                "problem_id": "p1",
                "language": "python",
                "user_code": "",
                "is_run_testcase": false
            })
        );
        assert_eq!(submit.mode(), ExecutionMode::Submit);
    }

    #[test]
    fn test_generic_response_from_wire() {
        let response: GenericResponse = serde_json::from_value(json!({
            "success": false,
            "status": 400,
            "payload": {
                "problem_id": "p1",
                "language": "python",
                "is_run_testcase": true,
                "rawoutput": { "syntaxError": "Unexpected token in line 3" }
            },
            "error": { "errorType": "CompileError", "message": "bad code" }
        }))
        .unwrap();
        assert!(!response.success);
        let raw = response.raw_output().unwrap();
        assert_eq!(raw.syntax_error.as_deref(), Some("Unexpected token in line 3"));
        assert_eq!(raw.total_test_cases, 0);
        assert_eq!(response.error.unwrap().error_type, "CompileError");
    }

    #[test]
    fn test_display_lists_failing_case() {
        let result = ExecutionResult {
            total_test_cases: 5,
            passed_test_cases: 3,
            failed_test_cases: 2,
            overall_pass: false,
            syntax_error: None,
            failed_test_case: Some(FailedTestCaseDetail {
                test_case_index: 3,
                input: json!("[3,3],6"),
                expected: json!("[0,1]"),
                received: Some(json!("[1,0]")),
                passed: false,
                error: None,
            }),
        };
        let text = result.to_string();
        assert!(text.contains("Passed: 3/5"));
        assert!(text.contains("Failed Test Case: #4"));
        assert!(text.contains("Received: [1,0]"));
    }

    #[test]
    fn test_placeholder_falls_back_to_empty() {
        let meta = ProblemMetadata {
            problem_id: "p1".into(),
            title: "Two Sum".into(),
            description: String::new(),
            tags: vec![],
            difficulty: "easy".into(),
            testcase_run: RunTestCases::default(),
            supported_languages: vec!["python".into()],
            placeholder_maps: BTreeMap::from([("python".into(), "def f(): pass".into())]),
        };
        assert!(meta.supports("python"));
        assert!(!meta.supports("go"));
        assert_eq!(meta.placeholder("python"), "def f(): pass");
        assert_eq!(meta.placeholder("go"), "");
    }
}
