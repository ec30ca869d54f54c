use clap::Parser;
use fob_cli::cli::{Cli, Command};
use fob_cli::{commands, error, logger, ui};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose, cli.quiet);
    ui::init_colors();

    let result = match cli.command {
        Command::Build(args) if args.watch => commands::watch(&args).await,
        Command::Build(args) => commands::build(&args).await,
        Command::Watch(args) => commands::watch(&args).await,
    };

    if let Err(err) = result {
        let exit_code = err.exit_code();
        let report = error::to_report(err);
        eprintln!("{report:?}");
        std::process::exit(exit_code);
    }
}
