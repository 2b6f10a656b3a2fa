mod score;
mod show;

use score::run_score;
use show::run_show;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Score(args) => run_score(args, ctx),
        Command::Show(args) => run_show(args, ctx),
    }
}
