mod commands;
mod terminal;

use commands::{CommandLine, Commands, discover};
use terminal::{logging, print};

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.quiet)?;

    match commands.command {
        Commands::Discover => {
            print::header("getting ready for discovery", commands.quiet);
            discover::discover(commands.quiet)
        }
    }
}
