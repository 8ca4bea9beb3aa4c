//! Path command

use anyhow::Result;

use crate::cli::GlobalOptions;

pub async fn run(global: &GlobalOptions) -> Result<()> {
    let bine = super::open(global).await?;
    println!("{}", bine.bin_dir().display());
    Ok(())
}
