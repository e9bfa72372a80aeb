//! Pattern-based extraction of failure facts from a job's raw stdout.
//!
//! The patterns here encode the line shapes produced by the execution engine's
//! default log formatter. If that format drifts, this is the only file to touch.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const NO_PLAY_RECAP: &str = "No play recap found";
pub const UNKNOWN_ERROR: &str = "Unknown error (Regex for msg extraction failed or no msg found)";

// `.` never crosses a line terminator in any of these.
static FATAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"fatal:.*FAILED!").expect("fatal regex is valid"));
static FAILURE_BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^TASK.*\n.*fatal:.*FAILED!.*=>.*$").expect("failure block regex is valid")
});
static PLAY_RECAP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^.*PLAY RECAP.*\n.*$").expect("play recap regex is valid")
});
static FAILED_HOST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\S+)\s+:\s+.*\bfailed=[1-9]\d*").expect("failed host regex is valid")
});
static FATAL_MSG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"fatal:.*FAILED!.*=>.*?"msg":\s*"((?:[^"\\\n]|\\.)*)""#)
        .expect("fatal msg regex is valid")
});

/// Structured failure facts recovered from one job's log.
///
/// Every field has a concrete value; missing signals resolve to
/// [`NO_PLAY_RECAP`] / [`UNKNOWN_ERROR`] rather than to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub job_name: String,
    pub has_failures: bool,
    pub failed_task_count: usize,
    pub failure_lines: Vec<String>,
    pub play_recap: String,
    pub failed_hosts: BTreeSet<String>,
    pub final_error: String,
}

/// Applies the fixed pattern set to job logs.
pub struct FailureExtractor;

impl FailureExtractor {
    /// Analyze `log_text` for the job called `job_name`. Never fails.
    pub fn analyze(job_name: &str, log_text: &str) -> JobAnalysis {
        let failed_task_count = FATAL_PATTERN.find_iter(log_text).count();

        let failure_lines = FAILURE_BLOCK_PATTERN
            .find_iter(log_text)
            .map(|m| m.as_str().to_string())
            .collect();

        let play_recap = PLAY_RECAP_PATTERN
            .find(log_text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| NO_PLAY_RECAP.to_string());

        let failed_hosts = FAILED_HOST_PATTERN
            .captures_iter(log_text)
            .filter_map(|caps| caps.get(1))
            .map(|host| host.as_str().to_string())
            .collect();

        let final_error = FATAL_MSG_PATTERN
            .captures(log_text)
            .and_then(|caps| caps.get(1))
            .map(|msg| msg.as_str())
            .filter(|msg| !msg.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());

        JobAnalysis {
            job_name: job_name.to_string(),
            has_failures: failed_task_count > 0,
            failed_task_count,
            failure_lines,
            play_recap,
            failed_hosts,
            final_error,
        }
    }
}
