//! Run command

use anyhow::Result;

use crate::cli::{GlobalOptions, RunArgs};

/// Returns the child's exit code
pub async fn run(args: RunArgs, global: &GlobalOptions) -> Result<i32> {
    let bine = super::open(global).await?;
    Ok(bine.run(&args.name, &args.args).await?)
}
