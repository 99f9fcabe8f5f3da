use std::path::Path;
use std::process;

use stepflow_analyze::FindingSeverity;

use crate::commands::{load_wizard, to_pretty};
use crate::OutputFormat;

pub(crate) fn cmd_check(config_path: &Path, output: OutputFormat, quiet: bool) {
    // Predicates are never evaluated during analysis.
    let wizard = load_wizard(config_path, true, output, quiet);
    let report = stepflow_analyze::analyze(&wizard);

    if !quiet {
        match output {
            OutputFormat::Json => {
                let value = serde_json::to_value(&report)
                    .unwrap_or_else(|e| serde_json::json!({ "error": format!("serialization: {}", e) }));
                println!("{}", to_pretty(&value));
            }
            OutputFormat::Text => {
                println!("Wizard Analysis Report");
                println!("======================");
                println!();
                println!(
                    "  Steps: {} steps, {} edges, confirm step '{}'",
                    wizard.steps().len(),
                    wizard.graph().edge_count(),
                    wizard.confirm_step()
                );

                if let Some(ref reachability) = report.reachability {
                    if reachability.unreachable_steps.is_empty() {
                        println!(
                            "  Reachability: all steps reachable from '{}'",
                            reachability.entry
                        );
                    } else {
                        println!(
                            "  Reachability: WARNING: {} unreachable step(s)",
                            reachability.unreachable_steps.len()
                        );
                    }
                    if !reachability.confirm_reachable {
                        println!("  Confirm step is not reachable from the entry");
                    }
                }

                if let Some(ref terminals) = report.terminals {
                    println!("  Terminal steps: {}", terminals.steps.len());
                }

                if let Some(ref forks) = report.forks {
                    println!("  Forks: {} declared", forks.fork_count);
                }

                println!();
                println!("Findings:");

                if report.findings.is_empty() {
                    println!("  No findings.");
                }
                for finding in &report.findings {
                    let severity = match finding.severity {
                        FindingSeverity::Warning => "WARNING",
                        FindingSeverity::Info => "INFO",
                    };
                    let context = finding
                        .step
                        .as_ref()
                        .map(|id| format!(" [{}]", id))
                        .unwrap_or_default();
                    println!(
                        "  [{}/{}]{}: {}",
                        finding.analysis, severity, context, finding.message
                    );
                }
            }
        }
    }

    if report.has_warnings() {
        process::exit(1);
    }
}
