use anyhow::Result;
use par_nav::cli;

fn main() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let options = match cli::process_cli() {
        cli::CliResult::Exit(code) => {
            if code == 0 {
                return Ok(());
            }
            std::process::exit(code);
        }
        cli::CliResult::Run(options) => options,
    };
    // Routes all log::info!() etc. to the debug log file; mirrors to stderr
    // when RUST_LOG is set.
    par_nav::debug::init_log_bridge(options.log_level);

    log::info!("Starting par-nav {}", par_nav::VERSION);

    match cli::run(options) {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("par-nav: error: {e:#}");
            std::process::exit(1);
        }
    }
}
