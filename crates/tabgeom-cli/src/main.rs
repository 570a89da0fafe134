mod batch_cmd;
mod cli;
mod columns_cmd;
mod page_range;
mod shared;
mod tables_cmd;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        cli::Commands::Tables {
            ref file,
            ref pages,
            ref format,
            ref tuning,
        } => tables_cmd::run(file, pages.as_deref(), format, tuning),
        cli::Commands::Columns {
            ref file,
            ref pages,
            ref format,
            ref tuning,
        } => columns_cmd::run(file, pages.as_deref(), format, tuning),
        cli::Commands::Batch {
            ref dir,
            ref output,
            ref format,
            ref tuning,
        } => batch_cmd::run(dir, output.as_deref(), format, tuning),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "tabgeom=warn,tabgeom_cli=warn",
        1 => "tabgeom=debug,tabgeom_cli=debug",
        _ => "tabgeom=trace,tabgeom_core=trace,tabgeom_cli=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
