// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the hook and status subcommands and their global options.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docker-nginx")]
#[command(about = "Charm lifecycle controller for a single Nginx container")]
#[command(version)]
pub struct Cli {
    /// Read charm options from a YAML file instead of config-get
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Unit state file (default: $CHARM_DIR/.unit-state.json)
    #[arg(long, global = true, env = "DOCKER_NGINX_STATE")]
    pub state_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Handle a hook event
    Hook {
        /// Hook name, e.g. install, config-changed, website-relation-joined
        #[arg(env = "JUJU_HOOK_NAME")]
        name: Option<String>,

        /// Relation id for relation hooks
        #[arg(long, env = "JUJU_RELATION_ID")]
        relation_id: Option<String>,
    },

    /// Show the recorded unit state
    Status,
}
