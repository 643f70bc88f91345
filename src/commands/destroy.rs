use clap::Args;

use lbcicd::pipeline::{Action, PipelineReport};

use super::{CmdResult, DbArgs};

#[derive(Args, Debug)]
pub struct DestroyArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Roll back every changeSet applied through the admin controller.
pub fn run(args: DestroyArgs) -> CmdResult<PipelineReport> {
    super::execute(Action::Destroy, &args.db)
}
