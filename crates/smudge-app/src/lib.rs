//! Smudge Application
//!
//! Reference host surface for the Smudge engine: loads a scene script,
//! replays its pointer and dialog input against a canvas registry, and
//! reports the resulting shapes and events.

mod error;
mod replay;
mod script;

pub use error::{ReplayError, ReplayResult};
pub use replay::{CanvasReport, ReplayReport, run};
pub use script::{SceneScript, ScriptEvent};

use std::path::Path;

/// Load the script at `path`, replay it and return the report as JSON.
pub fn replay_file(path: &Path) -> ReplayResult<String> {
    let script = SceneScript::load(path)?;
    run(&script)?.to_json()
}
