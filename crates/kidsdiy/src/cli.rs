//! Clap derive structures for the `kidsdiy` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Also
//! compiled by `build.rs` for man pages, so it depends on clap only.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// kidsdiy -- Kids DIY Platform from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "kidsdiy",
    version,
    about = "Browse the Kids DIY Platform and run its local proxy",
    long_about = "Command-line client for the Kids DIY Platform.\n\n\
        Pages (feed, live classes, profile, resources) load through the same\n\
        envelope proxy the web client uses; `kidsdiy serve` exposes that proxy\n\
        over HTTP on /proxy/*.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "KIDSDIY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, short = 'u', env = "KIDSDIY_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Access token (skips the stored login cookie)
    #[arg(long, env = "KIDSDIY_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "KIDSDIY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "KIDSDIY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "KIDSDIY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// How `serve` reports upstream failures.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusPolicyArg {
    /// Every failure answers 500 (web client behavior)
    Collapse,
    /// Keep the upstream status (401, 404, 502, ...)
    Preserve,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the access token
    Login(LoginArgs),

    /// Register a new account
    #[command(alias = "register")]
    Signup(SignupArgs),

    /// Forget the stored access token
    Logout,

    /// Show the home feed
    #[command(alias = "posts")]
    Feed,

    /// List live classes or join one
    #[command(alias = "sessions")]
    Live(LiveArgs),

    /// View and edit your profile
    Profile(ProfileArgs),

    /// Browse learning resources
    #[command(alias = "res")]
    Resources(ResourcesArgs),

    /// Run the /proxy/* HTTP server
    Serve(ServeArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (defaults to the profile's username, else prompts)
    #[arg(long)]
    pub username: Option<String>,

    /// Password (prompts when absent and none is configured)
    #[arg(long, env = "KIDSDIY_PASSWORD", hide_env = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    /// Password (prompts twice when absent)
    #[arg(long, env = "KIDSDIY_PASSWORD", hide_env = true)]
    pub password: Option<String>,
}

// ── Live ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LiveArgs {
    #[command(subcommand)]
    pub command: Option<LiveCommand>,
}

#[derive(Debug, Subcommand)]
pub enum LiveCommand {
    /// List live classes (default)
    #[command(alias = "ls")]
    List,

    /// Print the channel to join for a class
    Join {
        /// Session ID
        id: u64,
    },
}

// ── Profile ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show your profile
    Show,

    /// Change profile fields
    Edit(ProfileEditArgs),

    /// Upload a new profile picture
    Avatar(AvatarArgs),
}

#[derive(Debug, Args)]
pub struct ProfileEditArgs {
    /// Profile ID (defaults to your own)
    #[arg(long)]
    pub id: Option<u64>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub bio: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub date_of_birth: Option<String>,

    /// Organization ID
    #[arg(long)]
    pub organization: Option<u64>,

    /// Role ID
    #[arg(long)]
    pub role: Option<u64>,

    /// Interest IDs, comma separated
    #[arg(long, value_delimiter = ',')]
    pub interests: Option<Vec<u64>>,
}

#[derive(Debug, Args)]
pub struct AvatarArgs {
    /// Image file to upload
    pub path: PathBuf,

    /// Profile ID (defaults to your own)
    #[arg(long)]
    pub id: Option<u64>,

    /// Update the shown profile in place instead of reloading it
    #[arg(long)]
    pub no_reload: bool,
}

// ── Resources ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ResourcesArgs {
    #[command(subcommand)]
    pub command: ResourcesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourcesCommand {
    /// List resources
    #[command(alias = "ls")]
    List {
        /// Only titles containing this text (case-insensitive)
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show one resource
    #[command(alias = "get")]
    Show {
        /// Resource ID
        id: u64,
    },
}

// ── Serve ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides profile)
    #[arg(long, short = 'l', env = "KIDSDIY_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Upstream failure status mapping (overrides profile)
    #[arg(long)]
    pub status_policy: Option<StatusPolicyArg>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (e.g., api_base_url, username, timeout)
        key: String,

        /// Value to set
        value: String,
    },

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
