use anyhow::Result;
use std::process;
use log::error;
use semstats::{app, cli, logging};

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Application panicked: {:?}", panic_info);
        eprintln!("Panic: {:?}", panic_info);
        process::exit(101);
    }));

    if let Err(e) = run() {
        let error_msg = e.to_string();

        // Misuse of the command line is reported without logging noise
        let is_user_error = error_msg.contains("Unknown metric") ||
                           error_msg.contains("Unknown semester") ||
                           error_msg.contains("Conflicting") ||
                           error_msg.contains("Invalid");

        if is_user_error {
            eprintln!("{}", e);
        } else {
            error!("Application error: {:#}", e);
            eprintln!("Error: {:#}", e);
        }

        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::parse_args();

    cli::validate_args(&args)?;

    let config_manager = app::load_configuration(&args)?;

    let log_config = app::configure_logging(&args, &config_manager)?;
    logging::init_logger(log_config)?;

    // Single-threaded: panels load concurrently on one thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(app::run(args, config_manager))
}
