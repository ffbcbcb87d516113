use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

#[derive(Parser, Debug)]
#[command(author, version, about = "CV upload and job recommendation client", long_about = None)]
pub struct Cli {
    /// Backend base URL
    #[arg(long, env = "SMARTJOB_API_URL", default_value = "http://127.0.0.1:8000")]
    pub api_url: String,

    /// Directory holding the saved session and the log file
    #[arg(long, env = "SMARTJOB_STATE_DIR", default_value = ".", value_hint = ValueHint::DirPath)]
    pub state_dir: PathBuf,

    /// Give up on a backend call after this many seconds (default: wait forever)
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Where log lines go
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show whether a session is stored
    Status,
    /// Log in, creating the account on first use
    Login {
        username: String,
        /// Password (prefer the environment variable)
        #[arg(long, env = "SMARTJOB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Upload a PDF CV for job recommendations and skill extraction
    Upload {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        /// Override the MIME type guessed from the file extension
        #[arg(long)]
        mime: Option<String>,
    },
    /// Send a rating (1-5) and an optional comment
    Feedback {
        #[arg(long)]
        rating: Option<u8>,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Interactive session; uploads run in the background
    Shell,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}
