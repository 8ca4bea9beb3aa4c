//! Sync command

use anyhow::Result;

use crate::cli::GlobalOptions;
use crate::output;

pub async fn run(global: &GlobalOptions) -> Result<()> {
    let bine = super::open(global).await?;

    let spinner = output::spinner(&format!("Installing {} binaries...", bine.bins().len()));
    let result = bine.sync().await;
    spinner.finish_and_clear();
    result?;

    output::success(&format!("All binaries installed in {}", bine.bin_dir().display()));
    Ok(())
}
