//! Scripted command runner

use async_trait::async_trait;
use bine_core::{CommandOutput, CommandRunner, Result};
use std::path::Path;
use std::sync::Mutex;

/// What `go install` does when invoked
#[derive(Debug, Clone)]
pub enum GoBehavior {
    /// Write an executable with these bytes into `GOBIN`
    Install(Vec<u8>),
    /// Exit with the code and stderr
    Fail(i32, String),
}

/// A recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub command: String,
    pub env: Vec<(String, String)>,
}

/// Answers `uname`, `rustc -vV` and `go install`, recording every call
pub struct FakeRunner {
    go: GoBehavior,
    calls: Mutex<Vec<Call>>,
}

impl FakeRunner {
    pub fn new(go: GoBehavior) -> Self {
        Self {
            go,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, program: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.command.split(' ').next() == Some(program))
            .count()
    }
}

impl Default for FakeRunner {
    fn default() -> Self {
        Self::new(GoBehavior::Fail(1, String::new()))
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<CommandOutput> {
        let command = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(Call {
            command: command.clone(),
            env: env.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        });

        let output = match (program, args) {
            ("uname", ["-s"]) => CommandOutput::ok("Linux\n"),
            ("uname", ["-m"]) => CommandOutput::ok("x86_64\n"),
            ("rustc", ["-vV"]) => CommandOutput::ok("rustc 1.93.0\nhost: x86_64-unknown-linux-gnu\n"),
            ("go", ["install", target]) => match &self.go {
                GoBehavior::Install(bytes) => {
                    let gobin = env
                        .iter()
                        .find(|(k, _)| *k == "GOBIN")
                        .map(|(_, v)| *v)
                        .expect("GOBIN is set");
                    let package = target.split('@').next().unwrap_or_default();
                    let name = package.rsplit('/').next().unwrap_or_default();
                    let dest = Path::new(gobin).join(name);
                    std::fs::write(&dest, bytes).unwrap();
                    #[cfg(unix)]
                    {
                        use std::os::unix::fs::PermissionsExt;
                        std::fs::set_permissions(&dest, std::fs::Permissions::from_mode(0o755)).unwrap();
                    }
                    CommandOutput::ok("")
                }
                GoBehavior::Fail(code, stderr) => CommandOutput::failed(*code, stderr.clone()),
            },
            _ => CommandOutput::failed(127, format!("{}: command not found", command)),
        };
        Ok(output)
    }
}
