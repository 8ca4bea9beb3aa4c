//! Env command
//!
//! ```text
//! source <(bine env --shell bash)
//! bine env --shell fish | source
//! eval "$(bine env)"
//! ```

use anyhow::Result;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::cli::{EnvArgs, GlobalOptions, Shell};

static UNSAFE_SHELL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w@%+=:,./-]").expect("valid regex"));

pub async fn run(args: EnvArgs, global: &GlobalOptions) -> Result<()> {
    let bine = super::open(global).await?;
    let shell = args
        .shell
        .unwrap_or_else(|| detect_shell(std::env::var("SHELL").ok().as_deref()));
    println!("{}", path_export(&bine.bin_dir(), shell));
    Ok(())
}

/// Pick a shell from the value of `$SHELL`, defaulting to bash
fn detect_shell(shell_var: Option<&str>) -> Shell {
    let name = shell_var
        .filter(|s| !s.is_empty())
        .and_then(|s| Path::new(s).file_name())
        .and_then(|n| n.to_str());
    match name {
        Some("fish") => Shell::Fish,
        Some("zsh") => Shell::Zsh,
        Some("sh") => Shell::Sh,
        _ => Shell::Bash,
    }
}

fn path_export(bin_dir: &Path, shell: Shell) -> String {
    let dir = quote(&bin_dir.to_string_lossy());
    match shell {
        Shell::Fish => format!("fish_add_path --path {}", dir),
        Shell::Bash | Shell::Zsh | Shell::Sh => format!("export PATH={}:$PATH", dir),
    }
}

/// Single-quote `s` when the shell would otherwise interpret it
fn quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if UNSAFE_SHELL_CHARS.is_match(s) {
        return format!("'{}'", s.replace('\'', r#"'"'"'"#));
    }
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_quote() {
        assert_eq!(quote("/home/u/.cache/bine/p/linux/amd64/bin"), "/home/u/.cache/bine/p/linux/amd64/bin");
        assert_eq!(quote(""), "''");
        assert_eq!(quote("/tmp/my dir"), "'/tmp/my dir'");
        assert_eq!(quote("/tmp/it's"), r#"'/tmp/it'"'"'s'"#);
        assert_eq!(quote("/tmp/$HOME"), "'/tmp/$HOME'");
    }

    #[test]
    fn test_path_export() {
        let dir = Path::new("/c/bin");
        assert_eq!(path_export(dir, Shell::Bash), "export PATH=/c/bin:$PATH");
        assert_eq!(path_export(dir, Shell::Sh), "export PATH=/c/bin:$PATH");
        assert_eq!(path_export(dir, Shell::Fish), "fish_add_path --path /c/bin");
        assert_eq!(
            path_export(Path::new("/c d/bin"), Shell::Zsh),
            "export PATH='/c d/bin':$PATH"
        );
    }

    #[test]
    fn test_detect_shell() {
        assert_eq!(detect_shell(Some("/usr/bin/fish")), Shell::Fish);
        assert_eq!(detect_shell(Some("/bin/zsh")), Shell::Zsh);
        assert_eq!(detect_shell(Some("/usr/local/bin/nu")), Shell::Bash);
        assert_eq!(detect_shell(Some("")), Shell::Bash);
        assert_eq!(detect_shell(None), Shell::Bash);
    }

    #[test]
    #[serial]
    fn test_detect_shell_from_environment() {
        let saved = std::env::var("SHELL").ok();
        std::env::set_var("SHELL", "/opt/homebrew/bin/fish");
        let detected = detect_shell(std::env::var("SHELL").ok().as_deref());
        match saved {
            Some(value) => std::env::set_var("SHELL", value),
            None => std::env::remove_var("SHELL"),
        }
        assert_eq!(detected, Shell::Fish);
    }
}
