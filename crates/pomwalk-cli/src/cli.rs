//! CLI argument definitions for pomwalk.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "pomwalk",
    version,
    about = "Resolve Maven project classpaths from pom.xml",
    long_about = "pomwalk resolves parent inheritance, properties, dependency management and \
                  transitive dependencies of a Maven project against a local repository, \
                  and prints the resulting classpath."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the project pom.xml
    #[arg(long, global = true, value_name = "PATH")]
    pub manifest_path: Option<PathBuf>,

    /// Local repository root (overrides config and POMWALK_LOCAL_REPO)
    #[arg(long, global = true, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved classpath
    Classpath {
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Lines)]
        format: Format,
        /// Also list versions dropped by de-duplication
        #[arg(long)]
        conflicts: bool,
    },

    /// Display the dependency tree
    Tree {
        /// Maximum depth
        #[arg(long)]
        depth: Option<u32>,
        /// Explain why a dependency is included
        #[arg(long)]
        why: Option<String>,
    },

    /// List the effective properties of the project
    Properties {
        /// Include env.* entries
        #[arg(long)]
        env: bool,
    },

    /// Re-resolve and print the classpath whenever a manifest changes
    Watch {
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Lines)]
        format: Format,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// One group:artifact:version per line
    Lines,
    /// Artifact files joined with the path separator
    Paths,
    /// JSON report
    Json,
}

pub fn parse() -> Cli {
    Cli::parse()
}
