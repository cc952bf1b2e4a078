use clap::Parser;
use dustpan::application::{resolve_settings, CleanOptions, CleanService, InitService};
use dustpan::cli::{format_diagnostics, Cli, Commands};
use dustpan::domain::ReferenceInstant;
use dustpan::error::DustpanError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), DustpanError> {
    if let Some(Commands::Init { path }) = &cli.command {
        let written = InitService::execute(path)?;
        println!("Wrote {}", written.display());
        return Ok(());
    }

    // Parse before touching any file so a bad instant fails fast
    let reference = ReferenceInstant::parse(&cli.current)?;
    let settings = resolve_settings(cli.config.as_deref(), &cli.overrides())?;

    let service = CleanService::new(settings);
    let options = CleanOptions {
        source: cli.source(),
        sink: cli.sink(),
        reference,
    };
    let report = service.execute(&options, chrono::Utc::now())?;

    eprint!(
        "{}",
        format_diagnostics(&report.name, &report.diagnostics, cli.quiet)
    );

    match report.fatal() {
        Some(diagnostic) => Err(DustpanError::Structural {
            name: report.name.clone(),
            diagnostic: diagnostic.clone(),
        }),
        None => Ok(()),
    }
}
