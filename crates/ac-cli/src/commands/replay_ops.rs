use std::path::Path;
use std::process;

use ac_core::Settings;
use ac_session::{FieldBuffer, OverlayModel};

use super::config_ops::die;
use crate::script::{load_script, run_script, Outcome};

pub fn replay(script: &str, config: Option<&str>, surface: Option<&str>, json: bool) {
    let settings = match config {
        Some(path) => die!(Settings::load(Path::new(path)), "Error: {}"),
        None => Settings::default(),
    };
    let steps = die!(load_script(Path::new(script)), "Error: {}");

    let mut model = OverlayModel::new(FieldBuffer::new(), settings);
    model.set_input_surface(surface);
    let reports = run_script(&mut model, &steps);

    for report in &reports {
        if json {
            println!("{}", die!(serde_json::to_string(report), "Error: {}"));
            continue;
        }
        let outcome = match report.outcome {
            Outcome::Command { result } => format!("{result:?}"),
            Outcome::Applied { ok } => (if ok { "applied" } else { "refused" }).to_string(),
            Outcome::Key { response } if response.accepted => "accepted".to_string(),
            Outcome::Key { response } if response.dismissed => "dismissed".to_string(),
            Outcome::Key { response } if response.consumed => "consumed".to_string(),
            Outcome::Key { .. } => "passed".to_string(),
            Outcome::Done => String::new(),
        };
        let request = if report.should_request { "  *request" } else { "" };
        println!(
            "{:>3}  {:<28} {:<12} {}{}",
            report.index,
            report.step.label(),
            outcome,
            report.display,
            request
        );
    }

    if !json {
        println!(
            "{} steps, {} reconciliations",
            reports.len(),
            model.reconciliation_count()
        );
    }
}
