//! Command-line interface for the xposter binary.
//!
//! Hand-rolled argument parsing: one positional command plus `--topic` and
//! `--file` options where they apply.

use crate::utilities::errors::{Result, XposterError};

/// Available CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliCommand {
    /// Validate configuration and create the data directories.
    Init,
    /// Analyze writing samples and build the style profile.
    Train,
    /// Start automated posting and replying.
    Start,
    /// Generate and post one tweet now.
    Post,
    /// Add a writing sample from a file.
    AddSample,
}

impl std::fmt::Display for CliCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Train => write!(f, "train"),
            Self::Start => write!(f, "start"),
            Self::Post => write!(f, "post"),
            Self::AddSample => write!(f, "add-sample"),
        }
    }
}

/// Parse a CLI command from a string.
pub fn parse_command(cmd: &str) -> Option<CliCommand> {
    match cmd {
        "init" => Some(CliCommand::Init),
        "train" => Some(CliCommand::Train),
        "start" => Some(CliCommand::Start),
        "post" => Some(CliCommand::Post),
        "add-sample" | "add_sample" => Some(CliCommand::AddSample),
        _ => None,
    }
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub command: CliCommand,
    /// Topic for the `post` command.
    pub topic: Option<String>,
    /// File path for the `add-sample` command.
    pub file: Option<String>,
}

/// Parse arguments (without the program name).
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut iter = args.iter();

    let command = match iter.next() {
        Some(raw) => parse_command(raw)
            .ok_or_else(|| XposterError::configuration(format!("Unknown command: {}", raw)))?,
        None => return Err(XposterError::configuration("No command given")),
    };

    let mut topic = None;
    let mut file = None;
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--topic" => {
                topic = Some(iter.next().cloned().ok_or_else(|| {
                    XposterError::configuration("--topic requires a value")
                })?);
            }
            "--file" => {
                file = Some(iter.next().cloned().ok_or_else(|| {
                    XposterError::configuration("--file requires a value")
                })?);
            }
            other => {
                return Err(XposterError::configuration(format!(
                    "Unknown argument: {}",
                    other
                )));
            }
        }
    }

    if command == CliCommand::AddSample && file.is_none() {
        return Err(XposterError::configuration(
            "--file is required for the add-sample command",
        ));
    }

    Ok(CliArgs {
        command,
        topic,
        file,
    })
}

/// Usage text printed on bad arguments.
pub fn usage() -> &'static str {
    "Usage: xposter <command> [options]\n\
     \n\
     Commands:\n\
     \x20 init                 Validate configuration and create data directories\n\
     \x20 train                Analyze writing samples and build the style profile\n\
     \x20 start                Start automated posting and replying\n\
     \x20 post [--topic T]     Generate and post one tweet now\n\
     \x20 add-sample --file F  Add a writing sample from a file"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_command_round_trip() {
        for cmd in [
            CliCommand::Init,
            CliCommand::Train,
            CliCommand::Start,
            CliCommand::Post,
            CliCommand::AddSample,
        ] {
            assert_eq!(parse_command(&cmd.to_string()), Some(cmd));
        }
        assert_eq!(parse_command("bogus"), None);
    }

    #[test]
    fn test_parse_args_post_with_topic() {
        let parsed = parse_args(&args(&["post", "--topic", "rust async"])).unwrap();
        assert_eq!(parsed.command, CliCommand::Post);
        assert_eq!(parsed.topic.as_deref(), Some("rust async"));
        assert_eq!(parsed.file, None);
    }

    #[test]
    fn test_parse_args_add_sample_requires_file() {
        assert!(parse_args(&args(&["add-sample"])).is_err());
        let parsed = parse_args(&args(&["add-sample", "--file", "notes.txt"])).unwrap();
        assert_eq!(parsed.file.as_deref(), Some("notes.txt"));
    }

    #[test]
    fn test_parse_args_rejects_unknown_input() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["fly"])).is_err());
        assert!(parse_args(&args(&["post", "--speed"])).is_err());
        assert!(parse_args(&args(&["post", "--topic"])).is_err());
    }
}
