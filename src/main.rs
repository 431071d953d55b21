//! # contact-scrubber entry point
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Initialize logging (console + rotating file)
//!   └─> Run the chosen scrubber
//! ```
//!
//! ```bash
//! contact-scrubber email
//! contact-scrubber sms --file contacts.csv --insert-group 12 --group-name Fall
//! contact-scrubber match-log --contacts list.csv --log twilio.csv
//! contact-scrubber partition --file old.csv
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let log_dir = contact_scrubber::logging::init(cli.log_dir.as_deref())?;
    let result = cli::run_command(cli);

    if let Err(err) = &result {
        tracing::error!("{err:#}");
        println!(
            "See {} for details.",
            contact_scrubber::logging::current_log_path(&log_dir).display()
        );
    }
    result
}
