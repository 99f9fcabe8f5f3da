//! AnalysisReport -- aggregated output of every wizard analysis.
//!
//! The report collects the result of each analysis and extracts the
//! notable findings (warnings, info) for summary display.

use serde::Serialize;

use crate::forks::ForkResult;
use crate::reachability::ReachabilityResult;
use crate::terminals::TerminalResult;

/// Severity level for an analysis finding.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum FindingSeverity {
    Info,
    Warning,
}

/// A notable finding from analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub analysis: String,
    pub severity: FindingSeverity,
    pub message: String,
    pub step: Option<String>,
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisReport {
    pub reachability: Option<ReachabilityResult>,
    pub terminals: Option<TerminalResult>,
    pub forks: Option<ForkResult>,
    pub analyses_run: Vec<String>,
    pub findings: Vec<Finding>,
}

impl AnalysisReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_warnings(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.severity == FindingSeverity::Warning)
    }

    /// Extract findings from populated analysis results.
    pub fn extract_findings(&mut self) {
        self.findings.clear();

        if let Some(ref reachability) = self.reachability {
            if !reachability.unreachable_steps.is_empty() {
                let unreachable: Vec<String> =
                    reachability.unreachable_steps.iter().cloned().collect();
                self.findings.push(Finding {
                    analysis: "reachability".to_string(),
                    severity: FindingSeverity::Warning,
                    message: format!(
                        "{} step(s) unreachable from entry '{}': {}",
                        unreachable.len(),
                        reachability.entry,
                        unreachable.join(", ")
                    ),
                    step: None,
                    details: Some(serde_json::json!({
                        "entry": reachability.entry,
                        "unreachable_steps": unreachable,
                    })),
                });
            }
        }

        if let Some(ref terminals) = self.terminals {
            for terminal in terminals.steps.values() {
                let effect = if terminal.clears_session {
                    "clears the session"
                } else {
                    "keeps the session"
                };
                let message = if terminal.fork_count > 0 {
                    format!(
                        "Step '{}' has no next step; when none of its {} fork(s) match it redirects to itself and {}",
                        terminal.step, terminal.fork_count, effect
                    )
                } else {
                    format!("Step '{}' ends the journey and {}", terminal.step, effect)
                };
                self.findings.push(Finding {
                    analysis: "terminals".to_string(),
                    severity: FindingSeverity::Info,
                    message,
                    step: Some(terminal.step.clone()),
                    details: None,
                });
            }
        }

        if let Some(ref forks) = self.forks {
            for (step, targets) in &forks.unconditional {
                self.findings.push(Finding {
                    analysis: "forks".to_string(),
                    severity: FindingSeverity::Warning,
                    message: format!(
                        "Step '{}' has fork(s) without a condition that never match: {}",
                        step,
                        targets.join(", ")
                    ),
                    step: Some(step.clone()),
                    details: Some(serde_json::json!({ "targets": targets })),
                });
            }
            for (step, targets) in &forks.duplicate_targets {
                self.findings.push(Finding {
                    analysis: "forks".to_string(),
                    severity: FindingSeverity::Warning,
                    message: format!(
                        "Step '{}' declares several forks to the same target: {}",
                        step,
                        targets.join(", ")
                    ),
                    step: Some(step.clone()),
                    details: Some(serde_json::json!({ "targets": targets })),
                });
            }
            for (step, targets) in &forks.redundant_targets {
                self.findings.push(Finding {
                    analysis: "forks".to_string(),
                    severity: FindingSeverity::Info,
                    message: format!(
                        "Step '{}' forks to its own next step: {}",
                        step,
                        targets.join(", ")
                    ),
                    step: Some(step.clone()),
                    details: None,
                });
            }
        }

        // Sort findings for deterministic output
        self.findings.sort_by(|a, b| {
            a.analysis
                .cmp(&b.analysis)
                .then_with(|| format!("{:?}", a.severity).cmp(&format!("{:?}", b.severity)))
                .then_with(|| a.message.cmp(&b.message))
        });
    }
}
