//! Installs through the Go toolchain (`go install pkg@version`)

use bine_core::command::display_command;
use bine_core::{BinSpec, CommandRunner, Error, Result};
use std::path::Path;
use tracing::info;

/// Version requested from the toolchain for an entry
pub fn toolchain_version(spec: &BinSpec) -> String {
    if spec.version.is_empty() {
        return "latest".to_string();
    }
    spec.usable_version()
}

/// Run `go install` with `GOBIN` pointed at `bin_dir`
pub async fn go_install(runner: &dyn CommandRunner, spec: &BinSpec, bin_dir: &Path) -> Result<()> {
    let package = spec.go_package.as_deref().unwrap_or_default();
    let target = format!("{}@{}", package, toolchain_version(spec));

    let bin_dir = std::path::absolute(bin_dir)?;
    let gobin = bin_dir.to_string_lossy();
    let args = ["install", target.as_str()];

    info!(name = %spec.name, package = %target, "installing with go toolchain");

    let output = runner.run("go", &args, &[("GOBIN", gobin.as_ref())]).await?;
    if !output.success() {
        return Err(Error::toolchain_install_failed(
            display_command("go", &args),
            output.status_text(),
            &output.stderr,
        ));
    }
    Ok(())
}
