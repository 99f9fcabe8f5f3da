use std::path::Path;
use std::process;

use crate::commands::read_json;
use crate::{report_error, OutputFormat};

static WIZARD_SCHEMA_STR: &str = include_str!("../../../../schema/wizard-config-schema.json");

pub(crate) fn cmd_validate(config_path: &Path, output: OutputFormat, quiet: bool) {
    let schema: serde_json::Value = match serde_json::from_str(WIZARD_SCHEMA_STR) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("internal error: failed to parse embedded wizard schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("internal error: failed to compile schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc = read_json(config_path, output, quiet);

    let errors: Vec<String> = validator
        .iter_errors(&doc)
        .map(|e| format!("{}", e))
        .collect();

    if errors.is_empty() {
        if !quiet {
            match output {
                OutputFormat::Text => println!("valid"),
                OutputFormat::Json => println!("{}", serde_json::json!({ "valid": true })),
            }
        }
        return;
    }

    if !quiet {
        match output {
            OutputFormat::Text => {
                eprintln!("invalid wizard configuration");
                for err in &errors {
                    eprintln!("  - {}", err);
                }
            }
            OutputFormat::Json => {
                let result = serde_json::json!({
                    "valid": false,
                    "errors": errors,
                });
                eprintln!("{}", result);
            }
        }
    }
    process::exit(1);
}
