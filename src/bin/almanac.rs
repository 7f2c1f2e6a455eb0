use almanac::cli::{self, Cli};
use clap::Parser;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

fn main() {
    let cli = Cli::parse();

    let log_config = ConfigBuilder::new()
        .set_time_level(log::LevelFilter::Off)
        .build();
    if let Err(e) = TermLogger::init(
        cli.log_level(),
        log_config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    if let Err(e) = cli::run(cli) {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}
