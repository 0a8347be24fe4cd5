//! Console command parsing

use std::path::PathBuf;

use crate::types::StatKind;

use super::keymap;

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start(Vec<String>),
    Stat { player_index: usize, kind: StatKind },
    Summary,
    Chart,
    Export,
    Import(PathBuf),
    Reset,
    Help,
    Quit,
}

impl Command {
    /// Parse one line; blank lines yield `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let mut chars = word.chars();
        if let (Some(key), None) = (chars.next(), chars.next()) {
            if let Some((player_index, kind)) = keymap::binding(key) {
                return Ok(Some(Command::Stat { player_index, kind }));
            }
        }

        let command = match word.to_ascii_lowercase().as_str() {
            "start" => {
                let names: Vec<String> = rest.split(',').map(|n| n.trim().to_string()).collect();
                Command::Start(names)
            }
            "summary" | "s" => Command::Summary,
            "chart" | "c" => Command::Chart,
            "export" | "e" => Command::Export,
            "import" | "i" => {
                if rest.is_empty() {
                    return Err("usage: import <path>".to_string());
                }
                Command::Import(PathBuf::from(rest))
            }
            "reset" => Command::Reset,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(format!("unknown command '{}' (try 'help')", other)),
        };

        Ok(Some(command))
    }
}
