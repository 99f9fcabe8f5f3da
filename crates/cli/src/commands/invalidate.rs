use std::path::Path;
use std::process;

use stepflow_controller::invalidate::invalidate_path;

use crate::commands::{describe_mutation, load_session, load_wizard, to_pretty};
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_invalidate(
    config_path: &Path,
    from: &str,
    to: &str,
    session_path: Option<&Path>,
    output: OutputFormat,
    quiet: bool,
) {
    let wizard = load_wizard(config_path, true, output, quiet);
    let mut session = load_session(session_path, output, quiet);

    let invalidated = match invalidate_path(&wizard, from, to, &mut session) {
        Ok(steps) => steps,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => {
            if invalidated.is_empty() {
                println!("nothing to invalidate");
            } else {
                println!("invalidated: {}", invalidated.join(", "));
            }
            for mutation in session.journal() {
                println!("  {}", describe_mutation(mutation));
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "from": from,
                "to": to,
                "invalidated": invalidated,
                "session": session.to_json(),
                "journal": session.journal(),
            });
            println!("{}", to_pretty(&value));
        }
    }
}
