mod commands;
mod report;
mod terminal;

use commands::CommandLine;
use terminal::{logging, print};
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    logging::init_logging(commands.verbose, commands.quiet, commands.log_file())?;

    let cfg = commands.to_config();
    print::banner(cfg.quiet);

    if let Err(err) = commands::inspect::inspect(&commands, &cfg).await {
        error!("{err:#}");
        return Err(err);
    }
    print::end_of_program(cfg.quiet);
    Ok(())
}
