//! Clap derive structures for the `fortiform` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.
//! Also compiled by `build.rs` for man pages, so it depends on clap only.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fortiform -- declarative FortiManager device configuration
#[derive(Debug, Parser)]
#[command(
    name = "fortiform",
    version,
    about = "Manage FortiManager device configuration objects",
    long_about = "Create, read, update, delete and import FortiManager-managed device\n\
        configuration objects (system, router, log, switch-controller and\n\
        wireless-controller settings) through the JSON-RPC API, tracking\n\
        what is managed in a local state file.",
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
    /// FortiManager profile to use
    #[arg(long, short = 'p', env = "FORTIFORM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// FortiManager URL (overrides profile)
    #[arg(long, env = "FORTIFORM_URL", global = true)]
    pub url: Option<String>,

    /// REST API admin token (overrides profile credentials)
    #[arg(long, env = "FORTIFORM_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// State file (default: fortiform.state.json)
    #[arg(long, env = "FORTIFORM_STATE", global = true)]
    pub state: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FORTIFORM_OUTPUT",
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

    /// Accept any TLS certificate
    #[arg(long, short = 'k', env = "FORTIFORM_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "FORTIFORM_TIMEOUT", global = true)]
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse the resource catalog
    #[command(alias = "res")]
    Resources(ResourcesArgs),

    /// Create an object and start tracking it
    Create(CreateArgs),

    /// Refresh a tracked object from FortiManager
    Read(AddressArgs),

    /// Change attributes of a tracked object
    Update(UpdateArgs),

    /// Delete a tracked object
    #[command(alias = "rm")]
    Delete(AddressArgs),

    /// Start tracking an existing object
    Import(ImportArgs),

    /// Inspect the local state file
    State(StateArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Resources ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ResourcesArgs {
    #[command(subcommand)]
    pub command: ResourcesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourcesCommand {
    /// List resource types
    #[command(alias = "ls")]
    List {
        /// Only this area (system, router, log, switch_controller, wireless_controller)
        #[arg(long, short = 'a')]
        area: Option<String>,
    },

    /// Show the attributes and path parameters of a resource type
    Show {
        /// Resource type, e.g. fmgdevice_system_dns
        type_name: String,
    },
}

// ── Lifecycle ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AddressArgs {
    /// Resource address, <type>.<name>
    pub address: String,
}

#[derive(Debug, Args)]
pub struct AttributeArgs {
    /// Set an attribute (NAME=VALUE, repeatable). Lists take a comma
    /// separated string or a JSON array; blocks take JSON.
    #[arg(long = "set", short = 's', value_name = "NAME=VALUE")]
    pub sets: Vec<String>,

    /// Read attributes from a JSON or YAML file
    #[arg(long, short = 'f', value_name = "PATH")]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Resource address, <type>.<name>
    pub address: String,

    /// Path parameter (NAME=VALUE, repeatable), e.g. device_name=FGT-01
    #[arg(long = "param", short = 'P', value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    #[command(flatten)]
    pub attributes: AttributeArgs,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Resource address, <type>.<name>
    pub address: String,

    #[command(flatten)]
    pub attributes: AttributeArgs,

    /// Stop managing an attribute (repeatable)
    #[arg(long, value_name = "NAME")]
    pub unset: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Resource address, <type>.<name>
    pub address: String,

    /// Object key for table resources (ignored for singletons)
    pub id: Option<String>,

    /// Path parameter (NAME=VALUE, repeatable)
    #[arg(long = "param", short = 'P', value_name = "NAME=VALUE")]
    pub params: Vec<String>,
}

// ── State ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StateArgs {
    #[command(subcommand)]
    pub command: StateCommand,
}

#[derive(Debug, Subcommand)]
pub enum StateCommand {
    /// List tracked objects
    #[command(alias = "ls")]
    List {
        /// Only this resource type
        #[arg(long = "type", short = 't')]
        resource_type: Option<String>,
    },

    /// Show one tracked object
    Show {
        /// Resource address, <type>.<name>
        address: String,
    },

    /// Stop tracking an object without touching FortiManager
    Rm {
        /// Resource address, <type>.<name>
        address: String,
    },
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

    /// Display current configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (url, auth_mode, username, token_env, adom,
        /// workspace_mode, ca_cert, insecure, timeout, retries)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password or API token in the system keyring
    SetPassword {
        /// Profile name (default: active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
