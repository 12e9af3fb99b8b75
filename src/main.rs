//! transip-dns CLI - manage DNS zones hosted at TransIP

use clap::Parser;
use tokio_util::sync::CancellationToken;

mod cli;
mod output;

use cli::{Cli, CommandContext, Commands, GlobalOptions, RecordCommands};
use transip_dns::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `--debug` forces debug output, otherwise `RUST_LOG` decides (default warn)
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    if let Commands::Status = cli.command {
        return cli::status::run(&opts);
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::debug!("Interrupted, cancelling requests");
            on_interrupt.cancel();
        }
    });

    let ctx = CommandContext::new(&opts, cancel)?;

    match cli.command {
        Commands::Ping => cli::ping::run(&ctx).await,
        Commands::Zones => cli::zones::list(&ctx).await,
        Commands::Records(cmd) => match cmd {
            RecordCommands::List { zone } => cli::records::list(&ctx, &zone).await,
            RecordCommands::Append { zone, record } => {
                cli::records::append(&ctx, &zone, &record).await
            }
            RecordCommands::Set { zone, record } => cli::records::set(&ctx, &zone, &record).await,
            RecordCommands::Delete { zone, filter } => {
                cli::records::delete(&ctx, &zone, &filter).await
            }
        },
        Commands::Status => cli::status::run(&opts),
    }
}
