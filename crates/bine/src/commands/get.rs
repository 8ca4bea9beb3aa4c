//! Get command

use anyhow::Result;

use crate::cli::{GetArgs, GlobalOptions};

pub async fn run(args: GetArgs, global: &GlobalOptions) -> Result<()> {
    let bine = super::open(global).await?;
    let path = bine.get(&args.name).await?;
    println!("{}", path.display());
    Ok(())
}
