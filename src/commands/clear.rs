use std::path::Path;

use crate::error::{AgendaError, Result};
use crate::output::Format;
use crate::store::repo::Repo;

/// Delete every task. Requires explicit confirmation via --yes.
pub fn run(store_root: &Path, yes: bool, format: Format) -> Result<()> {
    if !yes {
        return Err(AgendaError::ConfirmationRequired);
    }

    let repo = Repo::open(store_root)?;
    let removed = repo.store.clear_all()?;
    repo.index.rebuild(&[])?;
    repo.refresh_fingerprint()?;

    match format {
        Format::Json => println!("{}", serde_json::json!({"cleared": removed})),
        _ => println!("cleared {removed} tasks"),
    }
    Ok(())
}
