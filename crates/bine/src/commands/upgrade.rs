//! Upgrade command

use anyhow::{bail, Result};
use bine_install::ListItem;

use crate::cli::{GlobalOptions, UpgradeArgs};
use crate::output;

pub async fn run(args: UpgradeArgs, global: &GlobalOptions) -> Result<()> {
    let mut bine = super::open(global).await?;

    let spinner = output::spinner(if args.dry_run {
        "Checking upstream releases..."
    } else {
        "Upgrading binaries..."
    });
    let result = bine.upgrade(args.dry_run).await;
    spinner.finish_and_clear();
    let items = result?;

    let failed: Vec<&ListItem> = items
        .iter()
        .filter(|i| !i.outdated_check_error.is_empty())
        .collect();
    if !failed.is_empty() {
        for item in &failed {
            output::error(&format!("{}: {}", item.name, item.outdated_check_error));
        }
        bail!(
            "Could not check {} of {} binaries; the manifest was not changed",
            failed.len(),
            bine.bins().len()
        );
    }

    if items.is_empty() {
        println!("Everything is up to date");
        return Ok(());
    }

    for item in &items {
        println!("{}", change_line(item));
    }
    if args.dry_run {
        output::info("Dry run: the manifest was not changed");
    } else {
        output::success(&format!("Updated {}", bine.manifest_path().display()));
    }

    Ok(())
}

fn change_line(item: &ListItem) -> String {
    format!("{}: {} -> {}", item.name, item.version, item.latest)
}
