use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::config::SessionConfig;
use crate::script::parse_script;
use crate::session::Session;
use crate::types::RunReport;

/// Runs `script_path` against the session described by `config_path`.
///
/// Relative evaluator paths in the config resolve against the config file's
/// directory.
pub fn run_session(config_path: &Path, script_path: &Path) -> Result<RunReport> {
    let mut config = SessionConfig::load_from(config_path)?;
    if let Some(root) = config_path.parent() {
        config.resolve_paths(root);
    }

    let text = fs::read_to_string(script_path)
        .with_context(|| format!("read script {}", script_path.display()))?;
    let script = parse_script(&text).with_context(|| format!("parse script {}", script_path.display()))?;

    Session::start(&config)?.run_script(&script)
}

/// Writes the example session config. Refuses to overwrite unless `force`.
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    SessionConfig::example()?.save_to(path)?;
    tracing::info!(path = %path.display(), "session config written");
    Ok(())
}
