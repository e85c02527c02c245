use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use mender_core::{
    config::{DEFAULT_COMMAND_TIMEOUT, DEFAULT_MAX_REPAIR_ATTEMPTS},
    llm::Provider,
    params::{ApplyPlan, GeneratePlan, Id, RunPipeline},
};

/// Plan, write, run and repair code changes with a language model
///
/// Mender compiles a natural-language intent into a step-by-step plan for the
/// repository in the workspace, writes the code for every step, runs the
/// build and test commands the model proposes and repairs failing commands
/// by rerunning or replanning. Plans and runs are kept in a local SQLite
/// database. `serve` exposes the same operations as MCP tools over stdio.
#[derive(Parser)]
#[command(version, about, name = "mender")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/mender/mender.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Repository to operate on. Defaults to the current directory
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Language model API to use
    #[arg(long, global = true, value_enum, default_value_t = ProviderArg::Openai)]
    pub provider: ProviderArg,

    /// Model name. Defaults to the provider's default model
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Base URL of the model API, for compatible gateways and local servers
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Repair attempts allowed for each failing command
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_REPAIR_ATTEMPTS)]
    pub max_repairs: u32,

    /// Wall-clock limit in seconds for a single command
    #[arg(long, global = true, default_value_t = DEFAULT_COMMAND_TIMEOUT.as_secs())]
    pub command_timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the Mender CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Compile and store a plan for an intent
    #[command(alias = "p")]
    Plan(IntentArgs),
    /// Write the code for every step of a stored plan
    #[command(alias = "c")]
    Code(ApplyArgs),
    /// Run the commands of a stored plan, repairing failures
    #[command(alias = "x")]
    Exec(ApplyArgs),
    /// Plan, write and execute in one go
    #[command(alias = "r")]
    Run(RunArgs),
    /// List stored plans for the workspace
    #[command(alias = "h")]
    History,
    /// Show a stored plan with its runs
    #[command(alias = "s")]
    Show(ShowArgs),
    /// Start the MCP server
    Serve,
}

/// Intent words; joined with spaces so quoting is optional.
#[derive(ClapArgs)]
pub struct IntentArgs {
    #[arg(required = true, num_args = 1.., help = "What should change in the repository")]
    pub intent: Vec<String>,
}

impl From<IntentArgs> for GeneratePlan {
    fn from(val: IntentArgs) -> Self {
        GeneratePlan {
            intent: val.intent.join(" "),
        }
    }
}

#[derive(ClapArgs)]
pub struct ApplyArgs {
    #[arg(help = "Unique identifier of the stored plan")]
    pub id: u64,
    #[arg(short, long, help = "Extra guidance for code and repair prompts")]
    pub context: Option<String>,
}

impl From<ApplyArgs> for ApplyPlan {
    fn from(val: ApplyArgs) -> Self {
        ApplyPlan {
            id: val.id,
            context: val.context,
        }
    }
}

#[derive(ClapArgs)]
pub struct RunArgs {
    #[arg(required = true, num_args = 1.., help = "What should change in the repository")]
    pub intent: Vec<String>,
    #[arg(short, long, help = "Extra guidance for code and repair prompts")]
    pub context: Option<String>,
}

impl From<RunArgs> for RunPipeline {
    fn from(val: RunArgs) -> Self {
        RunPipeline {
            intent: val.intent.join(" "),
            context: val.context,
        }
    }
}

#[derive(ClapArgs)]
pub struct ShowArgs {
    #[arg(help = "Unique identifier of the plan to show")]
    pub id: u64,
}

impl From<ShowArgs> for Id {
    fn from(val: ShowArgs) -> Self {
        Id { id: val.id }
    }
}

/// Command-line representation of the supported model APIs
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// OpenAI or any OpenAI-compatible chat completions API
    Openai,
    /// Anthropic messages API
    Anthropic,
}

impl From<ProviderArg> for Provider {
    fn from(val: ProviderArg) -> Self {
        match val {
            ProviderArg::Openai => Provider::OpenAi,
            ProviderArg::Anthropic => Provider::Anthropic,
        }
    }
}
