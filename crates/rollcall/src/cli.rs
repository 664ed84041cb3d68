//! Clap derive structures for the `rollcall` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rollcall -- attendance backend discovery and data access
#[derive(Debug, Parser)]
#[command(
    name = "rollcall",
    version,
    about = "Locate and query an attendance backend from the command line",
    long_about = "Discovers an attendance backend on the local network (or uses a\n\
        saved / environment-provided URL) and exposes its students, courses,\n\
        and attendance resources.",
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
    /// Backend base URL (skips discovery and saved configuration)
    #[arg(long, short = 'u', env = "ROLLCALL_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Host context for LAN candidate generation
    #[arg(long, env = "ROLLCALL_HOST", global = true)]
    pub host: Option<String>,

    /// Output format
    #[arg(long, short = 'o', default_value = "json", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "ROLLCALL_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Auto-discover a reachable backend and print its URL
    #[command(alias = "disc")]
    Discover,

    /// Query the backend's health endpoint
    Health,

    /// Manage the saved backend URL
    Config(ConfigArgs),

    /// Manage students
    #[command(alias = "st")]
    Students(StudentsArgs),

    /// Manage courses
    #[command(alias = "co")]
    Courses(CoursesArgs),

    /// Manage attendance records
    #[command(alias = "att")]
    Attendance(AttendanceArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective backend URL and where it came from
    Show,

    /// Save a backend URL (normalized, `/api` suffix appended if missing)
    SetUrl {
        /// Backend base URL, e.g. `http://192.168.1.5:5001`
        url: String,
    },

    /// Clear the saved backend URL
    Reset,
}

// ── Students ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StudentsArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

// ── Courses ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CoursesArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

/// CRUD over an opaque-JSON resource family.
#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// List all records
    #[command(alias = "ls")]
    List,

    /// Create a record from an inline JSON payload
    Create {
        /// JSON object, e.g. '{"name":"Ada Lovelace"}'
        json: String,
    },

    /// Update a record from an inline JSON payload
    Update {
        /// Record identifier
        id: String,
        /// JSON object with the fields to change
        json: String,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record identifier
        id: String,
    },
}

// ── Attendance ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AttendanceArgs {
    #[command(subcommand)]
    pub command: AttendanceCommand,
}

#[derive(Debug, Subcommand)]
pub enum AttendanceCommand {
    /// List attendance records, optionally for one course
    #[command(alias = "ls")]
    List {
        /// Filter by course identifier
        #[arg(long)]
        course: Option<String>,
    },

    /// Create a record from an inline JSON payload
    Create {
        /// JSON object, e.g. '{"courseId":"c1","date":"2025-03-10"}'
        json: String,
    },

    /// Update a record from an inline JSON payload
    Update {
        /// Record identifier
        id: String,
        /// JSON object with the fields to change
        json: String,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record identifier
        id: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
