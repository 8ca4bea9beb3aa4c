//! Config commands

use anyhow::Result;

use crate::cli::{ConfigCommands, ConfigKey, GlobalOptions};

pub async fn run(cmd: ConfigCommands, global: &GlobalOptions) -> Result<()> {
    match cmd {
        ConfigCommands::Get(args) => {
            let bine = super::open(global).await?;
            match args.key {
                ConfigKey::Project => println!("{}", bine.project()),
            }
            Ok(())
        }
    }
}
