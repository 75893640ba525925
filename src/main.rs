use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use can_review::cli::{
    handle_changes, handle_check, handle_portfolios, handle_report, handle_review, ChangesArgs,
    PortfoliosArgs, ReportArgs, ReviewCommandArgs,
};
use can_review::config::{ReviewPaths, Settings};
use can_review::logging::init_tracing;

#[derive(Parser)]
#[command(
    name = "can-review",
    author = "Kaylee Beyene",
    version,
    about = "Review pending CAN amounts for budget line change requests",
    long_about = "can-review reads a snapshot of agreement budget lines and their \
                  in-review change requests, and shows how much each CAN would \
                  carry before and after the requests are approved, fees included."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, global = true, env = "CAN_REVIEW_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show pending amounts per CAN
    Review(ReviewCommandArgs),

    /// Before/after report grouped by portfolio, printed or exported
    Report(ReportArgs),

    /// List the distinct portfolios a snapshot touches
    Portfolios(PortfoliosArgs),

    /// List change requests in review
    #[command(alias = "crs")]
    Changes(ChangesArgs),

    /// Validate a snapshot
    Check {
        /// Snapshot file (.json, .yaml or .yml)
        input: PathBuf,
    },

    /// Show current configuration and paths
    Config {
        /// Write the current settings to the settings file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = ReviewPaths::new()?;
    let settings = Settings::load_or_default(&paths)?;

    let filter = if cli.verbose {
        "debug"
    } else {
        settings.log_filter.as_str()
    };
    init_tracing(filter);
    debug!(base_dir = %paths.base_dir().display(), "settings loaded");

    match cli.command {
        Some(Commands::Review(args)) => handle_review(&args, &settings)?,
        Some(Commands::Report(args)) => handle_report(&args, &paths, &settings)?,
        Some(Commands::Portfolios(args)) => handle_portfolios(&args, &settings)?,
        Some(Commands::Changes(args)) => handle_changes(&args)?,
        Some(Commands::Check { input }) => handle_check(&input)?,
        Some(Commands::Config { save }) => {
            println!("can-review Configuration");
            println!("========================");
            println!("Config directory:  {}", paths.base_dir().display());
            println!("Settings file:     {}", paths.settings_file().display());
            println!("Exports directory: {}", paths.exports_dir().display());
            println!();
            println!("Settings:");
            println!("  Default view:    {}", settings.default_view);
            println!("  Portfolio key:   {:?}", settings.portfolio_key);
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Log filter:      {}", settings.log_filter);

            if save {
                settings.save(&paths)?;
                println!();
                println!("Settings saved.");
            }
        }
        None => {
            println!("can-review - pending CAN amounts for budget line reviews");
            println!();
            println!("Run 'can-review --help' for usage information.");
        }
    }

    Ok(())
}
