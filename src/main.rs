use clap::Parser;
use miette::Result;
use uniform_request::cli::commands;
use uniform_request::cli::{logging, Cli, Commands};

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    logging::init(cli.global.verbose, cli.global.quiet);

    match cli.command {
        None | Some(Commands::Form) => commands::form::run(&cli.global),
        Some(Commands::Init(args)) => commands::init::run(args, &cli.global),
        Some(Commands::Options(args)) => commands::options::run(args, &cli.global),
        Some(Commands::Replay(args)) => commands::replay::run(args, &cli.global),
        Some(Commands::Completions(args)) => commands::completions::run(args),
    }
}
