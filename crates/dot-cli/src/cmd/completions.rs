use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};
use std::io::Write;

/// Arguments for `dot completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script generation.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Dynamic shim for `shell`, if one ships with `dot`.
///
/// Shims call back into `dot __complete` on every keypress, so menus always
/// reflect the current command surface.
#[must_use]
pub const fn shim_script(shell: Shell) -> Option<&'static str> {
    match shell {
        Shell::Zsh => Some(include_str!("../../shell/dot.zsh")),
        Shell::Bash => Some(include_str!("../../shell/dot.bash")),
        Shell::Fish => Some(include_str!("../../shell/dot.fish")),
        _ => None,
    }
}

/// Generate shell completion script to stdout.
///
/// Shells without a dynamic shim get clap_complete's static script.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let mut out = std::io::stdout();
    match shim_script(shell) {
        Some(script) => out.write_all(script.as_bytes())?,
        None => generate(shell, command, "dot", &mut out),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zsh_shim_registers_compdef() {
        let script = shim_script(Shell::Zsh).unwrap_or_default();
        assert!(script.starts_with("#compdef dot"));
        assert!(script.contains("dot __complete zsh"));
    }

    #[test]
    fn bash_and_fish_shims_call_back() {
        for shell in [Shell::Bash, Shell::Fish] {
            let script = shim_script(shell).unwrap_or_default();
            assert!(script.contains("__complete"), "{shell} shim lacks callback");
        }
    }

    #[test]
    fn other_shells_fall_back_to_static_generation() {
        assert!(shim_script(Shell::PowerShell).is_none());
        assert!(shim_script(Shell::Elvish).is_none());
    }
}
