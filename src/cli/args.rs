// file: src/cli/args.rs
// version: 1.0.1
// guid: 2a062f66-2a90-44b5-ac86-35c268bf497b

//! Command line argument definitions

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "aza")]
#[command(about = "Pick an Azure VM, then set its login user, SSH into it, or copy files off it")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true, value_name = "PATH", help = "Config file (default: <config dir>/aza/config.toml)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Update the remote login user and SSH key on a VM
    #[command(name = "setuser")]
    SetUser {
        #[arg(long = "rg", visible_alias = "resource-group", value_name = "GROUP")]
        resource_group: Option<String>,

        #[arg(long = "vm", visible_alias = "name", value_name = "NAME")]
        vm_name: Option<String>,
    },

    /// Open an interactive SSH session on a VM
    Ssh {
        #[arg(long = "rg", visible_alias = "resource-group", value_name = "GROUP")]
        resource_group: Option<String>,

        #[arg(long = "vm", visible_alias = "name", value_name = "NAME")]
        vm_name: Option<String>,
    },

    /// Copy a remote path from an interactively chosen VM
    Cp {
        #[arg(help = "Path on the VM to copy")]
        path: String,
    },

    /// Choose and activate an Azure subscription
    #[command(name = "setsub")]
    SetSub,

    /// Generate the configured SSH key pair if it does not exist
    #[command(name = "genkey")]
    GenKey,
}

/// Rewrite the single-dash long flags `-rg` and `-vm` to `--rg` and `--vm`
///
/// Everything after a bare `--` is left untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            match arg.to_str() {
                Some("--") => {
                    passthrough = true;
                    arg
                }
                Some(s) if is_short_long_flag(s) => OsString::from(format!("-{}", s)),
                _ => arg,
            }
        })
        .collect()
}

fn is_short_long_flag(arg: &str) -> bool {
    ["-rg", "-vm"]
        .iter()
        .any(|flag| arg == *flag || arg.strip_prefix(flag).is_some_and(|rest| rest.starts_with('=')))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(normalize_args(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_normalize_args() {
        let args = normalize_args(["aza", "ssh", "-rg", "rg1", "-vm=web1", "-v", "--", "-rg"]);
        assert_eq!(args, vec!["aza", "ssh", "--rg", "rg1", "--vm=web1", "-v", "--", "-rg"]);
    }

    #[test]
    fn test_parse_ssh_with_single_dash_flags() {
        let cli = parse(&["aza", "ssh", "-rg", "rg1", "-vm", "web1"]);
        assert_eq!(
            cli.command,
            Some(Commands::Ssh {
                resource_group: Some("rg1".to_string()),
                vm_name: Some("web1".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_setuser_aliases() {
        let cli = parse(&["aza", "setuser", "--resource-group", "rg1"]);
        assert_eq!(
            cli.command,
            Some(Commands::SetUser {
                resource_group: Some("rg1".to_string()),
                vm_name: None,
            })
        );
    }

    #[test]
    fn test_parse_cp_requires_path() {
        let cli = parse(&["aza", "cp", "/var/log/syslog"]);
        assert_eq!(
            cli.command,
            Some(Commands::Cp {
                path: "/var/log/syslog".to_string()
            })
        );

        assert!(Cli::try_parse_from(["aza", "cp"]).is_err());
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = parse(&["aza", "genkey", "-q", "--config", "/tmp/aza.toml"]);
        assert_eq!(cli.command, Some(Commands::GenKey));
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/aza.toml")));
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = parse(&["aza"]);
        assert!(cli.command.is_none());
        assert_eq!(parse(&["aza", "setsub"]).command, Some(Commands::SetSub));
    }
}
