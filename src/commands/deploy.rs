use clap::Args;

use lbcicd::pipeline::{Action, PipelineReport};

use super::{CmdResult, DbArgs};

#[derive(Args, Debug)]
pub struct DeployArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Apply admin, schema, data and apex controllers, in that order.
pub fn run(args: DeployArgs) -> CmdResult<PipelineReport> {
    super::execute(Action::Deploy, &args.db)
}
