use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

use crate::error::VmError;

/// A simulator command as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `pfm`
    PrintFreeMap,
    /// `ppt <proc>`
    PrintPageTable { proc_id: usize },
    /// `np <proc> <pages>`
    NewProcess { proc_id: usize, page_count: usize },
    /// `kp <proc>`
    KillProcess { proc_id: usize },
    /// `sb <proc> <vaddr> <value>`
    StoreByte { proc_id: usize, vaddr: usize, value: i64 },
    /// `lb <proc> <vaddr>`
    LoadByte { proc_id: usize, vaddr: usize },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::PrintFreeMap => "pfm",
            Command::PrintPageTable { .. } => "ppt",
            Command::NewProcess { .. } => "np",
            Command::KillProcess { .. } => "kp",
            Command::StoreByte { .. } => "sb",
            Command::LoadByte { .. } => "lb",
        }
    }

    /// Line printed when this command fails with `err`
    pub fn failure_message(&self, err: &VmError) -> String {
        match (self, err) {
            (Command::KillProcess { proc_id }, VmError::NoSuchProcess(_)) => {
                format!("failed to kill {}: none", proc_id)
            }
            _ => err.to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Command::PrintFreeMap => write!(f, "pfm"),
            Command::PrintPageTable { proc_id } => write!(f, "ppt {}", proc_id),
            Command::NewProcess { proc_id, page_count } => write!(f, "np {} {}", proc_id, page_count),
            Command::KillProcess { proc_id } => write!(f, "kp {}", proc_id),
            Command::StoreByte { proc_id, vaddr, value } => {
                write!(f, "sb {} {} {}", proc_id, vaddr, value)
            }
            Command::LoadByte { proc_id, vaddr } => write!(f, "lb {} {}", proc_id, vaddr),
        }
    }
}

/// Parse a flat token stream (`np 1 2 sb 1 0 42 pfm ...`) into commands.
///
/// The whole stream is parsed before anything runs, so a typo late in the
/// list never leaves a half-executed simulation.
pub fn parse_commands<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    let mut tokens = tokens.iter().map(|t| t.as_ref());

    while let Some(name) = tokens.next() {
        let command = match name {
            "pfm" => Command::PrintFreeMap,
            "ppt" => Command::PrintPageTable {
                proc_id: next_arg(&mut tokens, name, "process number")?,
            },
            "np" => Command::NewProcess {
                proc_id: next_arg(&mut tokens, name, "process number")?,
                page_count: next_arg(&mut tokens, name, "page count")?,
            },
            "kp" => Command::KillProcess {
                proc_id: next_arg(&mut tokens, name, "process number")?,
            },
            "sb" => Command::StoreByte {
                proc_id: next_arg(&mut tokens, name, "process number")?,
                vaddr: next_arg(&mut tokens, name, "virtual address")?,
                value: next_arg(&mut tokens, name, "value")?,
            },
            "lb" => Command::LoadByte {
                proc_id: next_arg(&mut tokens, name, "process number")?,
                vaddr: next_arg(&mut tokens, name, "virtual address")?,
            },
            other => bail!("unknown command: {}", other),
        };
        commands.push(command);
    }

    Ok(commands)
}

fn next_arg<'a, T, I>(tokens: &mut I, command: &str, what: &str) -> Result<T>
where
    T: FromStr,
    I: Iterator<Item = &'a str>,
{
    let Some(token) = tokens.next() else {
        bail!("{}: missing {}", command, what);
    };
    match token.parse() {
        Ok(value) => Ok(value),
        Err(_) => bail!("{}: invalid {}: {}", command, what, token),
    }
}

/// Split a script into command tokens. `#` starts a comment that runs to
/// the end of the line.
pub fn tokenize_script(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

pub fn read_script<P: AsRef<Path>>(path: P) -> Result<Vec<Command>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    parse_commands(&tokenize_script(&content))
        .with_context(|| format!("in script {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_commands() {
        let tokens = ["np", "1", "2", "sb", "1", "0", "42", "lb", "1", "0", "ppt", "1", "kp", "1", "pfm"];
        let commands = parse_commands(&tokens).unwrap();
        assert_eq!(
            commands,
            vec![
                Command::NewProcess { proc_id: 1, page_count: 2 },
                Command::StoreByte { proc_id: 1, vaddr: 0, value: 42 },
                Command::LoadByte { proc_id: 1, vaddr: 0 },
                Command::PrintPageTable { proc_id: 1 },
                Command::KillProcess { proc_id: 1 },
                Command::PrintFreeMap,
            ]
        );
    }

    #[test]
    fn test_display_matches_syntax() {
        let tokens = ["sb", "3", "512", "-4"];
        let commands = parse_commands(&tokens).unwrap();
        assert_eq!(commands[0].to_string(), "sb 3 512 -4");
        assert_eq!(commands[0].name(), "sb");
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_commands(&["np", "1", "1", "bogus"]).unwrap_err();
        assert_eq!(err.to_string(), "unknown command: bogus");
    }

    #[test]
    fn test_missing_and_bad_arguments() {
        let err = parse_commands(&["np", "1"]).unwrap_err();
        assert_eq!(err.to_string(), "np: missing page count");

        let err = parse_commands(&["lb", "x", "0"]).unwrap_err();
        assert_eq!(err.to_string(), "lb: invalid process number: x");

        // negative ids are rejected at parse time
        assert!(parse_commands(&["kp", "-1"]).is_err());
    }

    #[test]
    fn test_empty_input() {
        let tokens: [&str; 0] = [];
        assert!(parse_commands(&tokens).unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_script() {
        let script = "# set up\nnp 0 2   # two pages\n\nsb 0 0 42\nlb 0 0\n";
        assert_eq!(
            tokenize_script(script),
            vec!["np", "0", "2", "sb", "0", "0", "42", "lb", "0", "0"]
        );
    }

    #[test]
    fn test_failure_message() {
        let kill = Command::KillProcess { proc_id: 4 };
        assert_eq!(kill.failure_message(&VmError::NoSuchProcess(4)), "failed to kill 4: none");

        let load = Command::LoadByte { proc_id: 4, vaddr: 0 };
        assert_eq!(load.failure_message(&VmError::NoSuchProcess(4)), "no such process 4");
    }

    #[test]
    fn test_read_missing_script() {
        let err = read_script("/nonexistent/ptsim/script.txt").unwrap_err();
        assert!(err.to_string().contains("failed to read script"));
    }
}
