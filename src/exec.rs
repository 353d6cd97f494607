// WHY: external-tool lookup behind a trait so tests can substitute a fake
// that reports tools present or absent without touching the host system

use std::ffi::OsStr;
use std::io;
use std::process::Command;
use tracing::debug;

/// Reports whether an external program is installed.
///
/// Program strings may carry switches (e.g. "kdiff3 --cs WordWrap=1");
/// only the first token is looked up.
pub trait ExecutableLocator {
    fn is_available(&self, program: &str) -> bool;
}

/// Locator backed by the system `which` lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLocator;

impl ExecutableLocator for SystemLocator {
    fn is_available(&self, program: &str) -> bool {
        let Some(base) = base_program(program) else {
            return false;
        };
        match Command::new("which").arg(base).output() {
            Ok(out) => out.status.success(),
            Err(_) => false,
        }
    }
}

/// First whitespace-separated token of a command string.
pub fn base_program(program: &str) -> Option<&str> {
    program.split_whitespace().next()
}

/// Combined result of running an external command to completion.
#[derive(Debug)]
pub struct CommandOutput {
    pub success: bool,
    /// Interleaved stdout followed by stderr. Never parsed by the core,
    /// only forwarded in diagnostics and error messages.
    pub text: String,
}

/// Run `program` with `args`, blocking until it exits.
pub fn run_command(program: &str, args: &[&OsStr]) -> io::Result<CommandOutput> {
    debug!(program, ?args, "running external command");
    let output = Command::new(program).args(args).output()?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.stderr.is_empty() {
        text.push_str(&String::from_utf8_lossy(&output.stderr));
    }

    Ok(CommandOutput {
        success: output.status.success(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_program_strips_switches() {
        assert_eq!(base_program("kdiff3 --cs WordWrap=1"), Some("kdiff3"));
        assert_eq!(base_program("meld"), Some("meld"));
        assert_eq!(base_program(""), None);
        assert_eq!(base_program("   "), None);
    }

    #[test]
    fn locator_reports_unknown_command_unavailable() {
        let locator = SystemLocator;
        assert!(!locator.is_available("docdiff_command_that_should_not_exist"));
    }

    #[test]
    fn locator_probes_base_program_only() {
        let locator = SystemLocator;
        // Switches must not confuse the lookup either way.
        assert!(!locator.is_available("docdiff_command_that_should_not_exist --with --switches"));
    }

    #[test]
    fn run_command_captures_output() {
        let out = run_command("echo", &[OsStr::new("hello")]).unwrap();
        assert!(out.success);
        assert_eq!(out.text.trim(), "hello");
    }
}
