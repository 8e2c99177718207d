use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "studio-press",
    version,
    about = "Terminal blog authoring with draft recovery",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Directory holding local storage.
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Seconds between draft autosaves.
    #[arg(long, value_name = "SECS", global = true)]
    pub autosave_interval: Option<u64>,

    /// Ignore the remote content store.
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print all posts.
    List,

    /// Print one post with its body.
    Show {
        id: String,
    },

    /// Submit the contact form.
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        message: String,
    },

    /// Sign up for the newsletter.
    Subscribe {
        #[arg(long)]
        email: String,
    },

    /// Load an image through the fallback cascade and print the result.
    CheckImage {
        url: String,
        /// Accessible label used to pick the fallback.
        #[arg(long)]
        label: Option<String>,
    },

    /// Print the analytics summary.
    Analytics,
}
