//! Step-by-step decision scenarios with all-or-nothing completion credit.

mod run;
mod service;

pub use run::ScenarioRun;
pub use service::{ScenarioOutcome, ScenarioService};
