//! CLI command definitions

use crate::application::SettingsOverrides;
use crate::infrastructure::{DocumentSink, DocumentSource};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dustpan")]
#[command(about = "Remove expired time-limited blocks from source files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// File to clean (default: read stdin)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "OUTPUT", conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Write the result back to FILE
    #[arg(short, long, requires = "file")]
    pub in_place: bool,

    /// Instant to judge expiry against (now, today, YYYY-MM-DD, YYYY-MM-DD HH:MM:SS, RFC 3339)
    #[arg(long, value_name = "INSTANT", default_value = "now")]
    pub current: String,

    /// String that opens a comment
    #[arg(long, value_name = "S", allow_hyphen_values = true)]
    pub delimiter_start: Option<String>,

    /// String that closes a comment
    #[arg(long, value_name = "S", allow_hyphen_values = true)]
    pub delimiter_end: Option<String>,

    /// Tag name of time-limited blocks
    #[arg(long, value_name = "NAME")]
    pub tag_name: Option<String>,

    /// UTC offset at which `to` values are read (e.g. +09:00)
    #[arg(long, value_name = "OFFSET", allow_hyphen_values = true)]
    pub time_offset: Option<String>,

    /// Tag name of removal-marker blocks
    #[arg(long, value_name = "NAME")]
    pub marker_tag_name: Option<String>,

    /// Remove removal-marker blocks with this name (repeatable)
    #[arg(long = "remove-marker", value_name = "NAME")]
    pub remove_markers: Vec<String>,

    /// Config file to use instead of discovering .dustpan.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only report fatal problems
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default .dustpan.toml
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

impl Cli {
    pub fn source(&self) -> DocumentSource {
        match &self.file {
            Some(path) => DocumentSource::File(path.clone()),
            None => DocumentSource::Stdin,
        }
    }

    pub fn sink(&self) -> DocumentSink {
        match (&self.output, &self.file) {
            (Some(output), _) => DocumentSink::File(output.clone()),
            (None, Some(file)) if self.in_place => DocumentSink::File(file.clone()),
            _ => DocumentSink::Stdout,
        }
    }

    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            delimiter_start: self.delimiter_start.clone(),
            delimiter_end: self.delimiter_end.clone(),
            tag_name: self.tag_name.clone(),
            time_offset: self.time_offset.clone(),
            marker_tag_name: self.marker_tag_name.clone(),
            remove_markers: self.remove_markers.clone(),
        }
    }
}
