//! Operator command parsing.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Toggle,
    Start,
    Stop,
    Stats,
    Chart,
    Config,
    Set { key: String, value: String },
    Load,
    Save,
    Export,
    Import(PathBuf),
    Clear,
    Status,
    Alerts,
    Poll(bool),
    Quit,
}

pub const HELP: &str = "\
commands:
  toggle | start | stop   start or stop the engine
  stats                   show counters and system status
  chart                   show the packet chart
  config                  show the config form
  set <key> <value>       edit a form field
  load | save             fetch the config, or submit the form
  export                  write the config to clientgen_config.json
  import <path>           replace the config with a saved document
  clear                   reset the engine counters
  status                  ask the engine whether it is running
  alerts                  list visible alerts
  poll on|off             resume or pause stats polling
  quit";

impl Command {
    /// Parse one input line. `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "" => return Ok(None),
            "help" | "?" => Command::Help,
            "toggle" => Command::Toggle,
            "start" => Command::Start,
            "stop" => Command::Stop,
            "stats" => Command::Stats,
            "chart" => Command::Chart,
            "config" => Command::Config,
            "set" => {
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(k, v)| (k, v.trim()))
                    .unwrap_or((rest, ""));
                if key.is_empty() {
                    return Err("usage: set <key> <value>".into());
                }
                Command::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                }
            }
            "load" => Command::Load,
            "save" => Command::Save,
            "export" => Command::Export,
            "import" if rest.is_empty() => return Err("usage: import <path>".into()),
            "import" => Command::Import(PathBuf::from(rest)),
            "clear" => Command::Clear,
            "status" => Command::Status,
            "alerts" => Command::Alerts,
            "poll" => match rest {
                "on" => Command::Poll(true),
                "off" => Command::Poll(false),
                _ => return Err("usage: poll on|off".into()),
            },
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command {other:?}, try help")),
        };
        Ok(Some(command))
    }
}
