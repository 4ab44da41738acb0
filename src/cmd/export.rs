//! CSV export command (`funnel export`).

use anyhow::Result;
use std::path::Path;
use tracing::info;

use funnel::config::{ExportTarget, FunnelConfig};
use funnel::errors::ExportError;
use funnel::pipeline::write_csv;

use super::super::{FilterArgs, SortArgs};

pub fn cmd_export(
    config: &FunnelConfig,
    input: &Path,
    filters: &FilterArgs,
    sort: &SortArgs,
) -> Result<()> {
    let session = super::load_session(input, filters, sort)?;
    let rows = session.export_rows();

    let path = match config.export_target() {
        ExportTarget::Stdout => {
            write_csv(&rows, std::io::stdout().lock())?;
            return Ok(());
        }
        ExportTarget::File(path) => path,
    };

    let file = std::fs::File::create(&path).map_err(|source| ExportError::CreateFailed {
        path: path.clone(),
        source,
    })?;
    let written = write_csv(&rows, std::io::BufWriter::new(file))?;

    info!(path = %path.display(), rows = written, "export complete");
    println!(
        "Exported {} of {} records to {}",
        written,
        session.records().len(),
        path.display()
    );
    Ok(())
}
