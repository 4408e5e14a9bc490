//! Command-line interface: default path `taskset1.json`, PIP by
//! default (the strongest of the three protocols against unbounded
//! priority inversion), and an override for schedule bounds and
//! output format.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::protocol::AccessProtocol;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Protocol {
    Simple,
    Hlp,
    Pip,
}

impl From<Protocol> for AccessProtocol {
    fn from(p: Protocol) -> Self {
        match p {
            Protocol::Simple => AccessProtocol::Simple,
            Protocol::Hlp => AccessProtocol::Hlp,
            Protocol::Pip => AccessProtocol::Pip,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Discrete-event simulator for uniprocessor EDF scheduling with
/// SIMPLE, HLP or PIP resource-access control.
#[derive(Parser, Debug)]
#[command(name = "edfsim", version, about)]
pub struct Cli {
    /// Path to the task-set JSON file.
    #[arg(default_value = "taskset1.json")]
    pub path: PathBuf,

    /// Resource-access protocol.
    #[arg(long, value_enum, default_value_t = Protocol::Pip)]
    pub protocol: Protocol,

    /// Override the schedule's start time.
    #[arg(long)]
    pub start: Option<f64>,

    /// Override the schedule's end time.
    #[arg(long)]
    pub end: Option<f64>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Increase log verbosity; repeatable (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
