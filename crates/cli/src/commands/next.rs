use std::path::Path;
use std::process;
use std::sync::Arc;

use stepflow_controller::StepFlowController;
use stepflow_core::NavigationRequest;

use crate::commands::{describe_mutation, load_session, load_wizard, read_json, to_pretty};
use crate::{report_error, OutputFormat};

pub(crate) struct NextOptions<'a> {
    pub config: &'a Path,
    pub step: Option<&'a str>,
    pub request: Option<&'a Path>,
    pub session: Option<&'a Path>,
    pub complete: bool,
}

pub(crate) fn cmd_next(opts: NextOptions<'_>, output: OutputFormat, quiet: bool) {
    let wizard = Arc::new(load_wizard(opts.config, false, output, quiet));

    let mut request = match opts.request {
        Some(path) => {
            let doc = read_json(path, output, quiet);
            match serde_json::from_value::<NavigationRequest>(doc) {
                Ok(r) => r,
                Err(e) => {
                    let msg = format!("invalid request in '{}': {}", path.display(), e);
                    report_error(&msg, output, quiet);
                    process::exit(1);
                }
            }
        }
        None => NavigationRequest::new(""),
    };
    if let Some(step) = opts.step {
        request.step = step.to_string();
    }
    if request.step.is_empty() {
        report_error(
            "no step to submit: pass --step or a --request with a step",
            output,
            quiet,
        );
        process::exit(1);
    }

    let controller = match StepFlowController::with_defaults(wizard, &request.step) {
        Ok(c) => c,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };
    let mut session = load_session(opts.session, output, quiet);

    let candidate = controller.candidate_next_step(&request);
    let result = if opts.complete {
        controller.complete_step(&request, &mut session)
    } else {
        controller.next_step(&request, &session)
    };
    let next = match result {
        Ok(n) => n,
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
            println!("{}", next);
            if opts.complete {
                for mutation in session.journal() {
                    println!("  {}", describe_mutation(mutation));
                }
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "step": request.step,
                "edit": request.is_edit(),
                "candidate": candidate,
                "next": next,
                "session": session.to_json(),
                "journal": session.journal(),
            });
            println!("{}", to_pretty(&value));
        }
    }
}
