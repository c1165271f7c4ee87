//! 検証レポート

use crate::orchestration::{RunReport, RunStats};
use kotoba_rules::model::{Issue, Severity};
use serde::{Deserialize, Serialize};

/// Validation Report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when no validator raised an issue
    pub conforms: bool,
    pub issues: Vec<Issue>,
    pub stats: RunStats,
}

impl ValidationReport {
    /// Report for a run that raised no issues
    pub fn conforming() -> Self {
        Self {
            conforms: true,
            issues: Vec::new(),
            stats: RunStats {
                rules_evaluated: 0,
                inference_count: 0,
                issue_count: 0,
                duration_ms: 0,
            },
        }
    }

    /// Build a report from an orchestrated validator run
    pub fn from_run(run: &RunReport) -> Self {
        Self {
            conforms: run.issues.is_empty(),
            issues: run.issues.clone(),
            stats: run.stats.clone(),
        }
    }

    /// エラーの数を取得
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| matches!(issue.severity, Severity::Error))
            .count()
    }

    /// 警告の数を取得
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| matches!(issue.severity, Severity::Warning))
            .count()
    }

    /// JSON 形式でシリアライズ
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// 人間可読形式で出力
    pub fn to_simple_string(&self) -> String {
        let mut output = format!(
            "Validation Report: {}\n",
            if self.conforms {
                "CONFORMS"
            } else {
                "DOES NOT CONFORM"
            }
        );

        for (i, issue) in self.issues.iter().enumerate() {
            output.push_str(&format!("Issue {}: {}\n", i + 1, issue.description));
            output.push_str(&format!("  Severity: {:?}\n", issue.severity));
            output.push_str(&format!("  Rule: {}\n", issue.rule));
            if !issue.suggestion.is_empty() {
                output.push_str(&format!("  Suggestion: {}\n", issue.suggestion));
            }
            for subject in &issue.subjects {
                output.push_str(&format!("  Subject: {}\n", subject));
            }
            output.push('\n');
        }

        output
    }
}
