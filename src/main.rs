use clap::Parser;
use iconforge::cli::{Cli, Commands};
use iconforge::output::Printer;
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Build(args) => iconforge::cli::build::run(args, &printer)?,
        Commands::List(args) => iconforge::cli::list::run(args, &printer)?,
        Commands::Init(args) => iconforge::cli::init::run(args, &printer)?,
        Commands::Completions(args) => iconforge::cli::completions::run(args)?,
    }

    Ok(())
}
