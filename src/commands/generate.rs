use clap::Args;

use lbcicd::pipeline::{Action, PipelineReport};

use super::{CmdResult, DbArgs};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Regenerate the schema and APEX changelogs from the database.
pub fn run(args: GenerateArgs) -> CmdResult<PipelineReport> {
    super::execute(Action::Generate, &args.db)
}
