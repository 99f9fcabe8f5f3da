//! Stepflow static analyzer -- checks a loaded wizard's step graph.
//!
//! Each analysis is a separate module producing a serializable result.
//! [`analyze`] runs all of them and aggregates the results into an
//! [`AnalysisReport`].

pub mod forks;
pub mod reachability;
pub mod report;
pub mod terminals;

pub use forks::ForkResult;
pub use reachability::ReachabilityResult;
pub use report::{AnalysisReport, Finding, FindingSeverity};
pub use terminals::{TerminalResult, TerminalStep};

use stepflow_core::Wizard;
use tracing::warn;

/// Run every analysis on a wizard.
pub fn analyze(wizard: &Wizard) -> AnalysisReport {
    let mut report = AnalysisReport::new();
    report.reachability = Some(reachability::analyze_reachability(wizard));
    report.terminals = Some(terminals::analyze_terminals(wizard));
    report.forks = Some(forks::analyze_forks(wizard));
    report.analyses_run = vec![
        "reachability".to_string(),
        "terminals".to_string(),
        "forks".to_string(),
    ];

    report.extract_findings();

    for finding in &report.findings {
        if finding.severity == FindingSeverity::Warning {
            warn!(analysis = %finding.analysis, "{}", finding.message);
        }
    }

    report
}
