use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod output;

use commands::{deploy, destroy, generate};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "lbcicd")]
#[command(version = VERSION)]
#[command(about = "CI/CD Liquibase Helper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy
    Deploy(deploy::DeployArgs),
    /// Generate Changelogs
    Generate(generate::GenerateArgs),
    /// Destroy
    Destroy(destroy::DestroyArgs),
}

fn main() -> std::process::ExitCode {
    // Bare invocation is a request for help, not a usage error.
    if std::env::args_os().len() <= 1 {
        let mut cmd = Cli::command();
        if cmd.print_help().is_ok() {
            println!();
        }
        return std::process::ExitCode::SUCCESS;
    }

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Deploy(args) => output::print_result(&deploy::run(args)),
        Commands::Generate(args) => output::print_result(&generate::run(args)),
        Commands::Destroy(args) => output::print_result(&destroy::run(args)),
    };

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
