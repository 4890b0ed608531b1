pub mod build;
pub mod completions;
pub mod init;
pub mod list;

use clap::{Parser, Subcommand};

/// iconforge - Icon font and binding generator
#[derive(Parser, Debug)]
#[command(name = "iconforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the font, stylesheet and code artifacts from an icon tree
    Build(build::BuildArgs),

    /// List discovered icons with their assigned codepoints
    List(list::ListArgs),

    /// Initialize a project (generates iconforge.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
