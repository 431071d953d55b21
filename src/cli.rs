use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use contact_scrubber::config::ScrubConfig;
use contact_scrubber::pipeline::{
    EmailOptions, LogMatchOptions, PartitionOptions, SmsOptions, run_email_pipeline,
    run_log_match, run_partition, run_sms_pipeline,
};
use contact_scrubber::prompt::{
    parse_csv_path, parse_group_name, parse_group_number, prompt_until,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "contact-scrubber",
    about = "Clean and reshape contact-list CSVs for email and SMS campaigns"
)]
pub struct Cli {
    /// Directory for log files. Defaults to the platform data directory.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Path to a JSON file overriding column names and layouts
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Inputs shared by the two campaign scrubbers. Anything left out is asked for interactively.
#[derive(Args)]
pub struct CampaignArgs {
    /// Input CSV file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Insert group number stamped on every row
    #[arg(short, long)]
    insert_group: Option<i64>,

    /// Group name stamped on every row and used to name the output
    #[arg(short, long)]
    group_name: Option<String>,

    /// Directory the output files are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrub a contact list for an email campaign
    Email(CampaignArgs),
    /// Scrub a contact list for an SMS campaign
    Sms(CampaignArgs),
    /// Flag contacts that a delivery log reports as delivered or sent
    MatchLog {
        /// Contact list to flag
        #[arg(long, default_value = "log1.csv")]
        contacts: PathBuf,

        /// Delivery-status log
        #[arg(long, default_value = "log2.csv")]
        log: PathBuf,

        /// Join on key columns already present in both files instead of normalizing phones
        #[arg(long)]
        precomputed_keys: bool,

        /// Directory the result is written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Split a contact list into duplicate-phone, missing-id and unique rows
    Partition {
        /// Contact list to split
        #[arg(short, long, default_value = "old.csv")]
        file: PathBuf,

        /// Directory the three outputs are written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Print the effective column configuration as JSON
    ShowConfig,
}

pub fn run_command(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Email(args) => handle_email(args, config),
        Commands::Sms(args) => handle_sms(args, config),
        Commands::MatchLog {
            contacts,
            log,
            precomputed_keys,
            output_dir,
        } => handle_match_log(contacts, log, precomputed_keys, output_dir, config),
        Commands::Partition { file, output_dir } => handle_partition(file, output_dir, config),
        Commands::ShowConfig => {
            println!("{}", config.to_json()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ScrubConfig> {
    match path {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            ScrubConfig::from_file(path).context("Failed to load scrubber config")
        }
        None => Ok(ScrubConfig::default()),
    }
}

/// Operator answers for a campaign scrub, from flags or prompts.
struct CampaignInputs {
    file: PathBuf,
    insert_group: i64,
    group_name: String,
    output_dir: PathBuf,
}

fn collect_campaign_inputs(args: CampaignArgs) -> Result<CampaignInputs> {
    let stdin = std::io::stdin();
    let mut reader = stdin.lock();
    let mut writer = std::io::stdout();

    let file = match args.file {
        Some(file) => parse_csv_path(&file.to_string_lossy()).map_err(anyhow::Error::msg)?,
        None => prompt_until(
            &mut reader,
            &mut writer,
            "Please enter the full path of your input CSV file: ",
            parse_csv_path,
        )?,
    };
    println!("File '{}' found and is a valid CSV.", file.display());

    let insert_group = match args.insert_group {
        Some(number) => number,
        None => prompt_until(
            &mut reader,
            &mut writer,
            "Please enter the Insert Group Number (must be a number): ",
            parse_group_number,
        )?,
    };

    let group_name = match args.group_name {
        Some(name) => name,
        None => prompt_until(
            &mut reader,
            &mut writer,
            "Please enter the Group Name: ",
            parse_group_name,
        )?,
    };

    Ok(CampaignInputs {
        file,
        insert_group,
        group_name,
        output_dir: args.output_dir,
    })
}

fn handle_email(args: CampaignArgs, config: ScrubConfig) -> Result<()> {
    println!("Thank you for using DataScrubber for mass email!");
    println!(
        "Make sure your column names match these exactly: First Name, Last Name, Email, Date of Birth, person_id"
    );

    let inputs = collect_campaign_inputs(args)?;
    let options =
        EmailOptions::new(inputs.insert_group, inputs.group_name).with_schema(config.email);

    let report = run_email_pipeline(&inputs.file, &inputs.output_dir, &options)
        .context("Email scrub did not complete; no output was written")?;

    for warning in &report.warnings {
        println!("Warning: {warning}");
    }
    println!("{}", report.summary());
    println!("{}", report.columns_line());
    Ok(())
}

fn handle_sms(args: CampaignArgs, config: ScrubConfig) -> Result<()> {
    println!("Thank you for using DataScrubber for SMS!");
    println!(
        "Make sure your column names match these exactly: Last Name, First Name, Phone, Date of Birth, Person_id"
    );

    let inputs = collect_campaign_inputs(args)?;
    let options = SmsOptions::new(inputs.insert_group, inputs.group_name).with_schema(config.sms);

    let outcome = run_sms_pipeline(&inputs.file, &inputs.output_dir, &options)
        .context("SMS scrub failed")?;

    if outcome.relaxed_read {
        println!("Input had malformed rows; it was read with relaxed parsing.");
    }
    if let Some(path) = &outcome.invalid_path {
        println!(
            "Invalid GUIDs found in {} rows. Logged to {}.",
            outcome.invalid_rows,
            path.display()
        );
    }
    println!("{}", outcome.report.summary());
    println!("{}", outcome.report.columns_line());
    Ok(())
}

fn handle_match_log(
    contacts: PathBuf,
    log: PathBuf,
    precomputed_keys: bool,
    output_dir: PathBuf,
    config: ScrubConfig,
) -> Result<()> {
    let options = LogMatchOptions::new(contacts, log)
        .with_schema(config.log_match, precomputed_keys)
        .with_output_dir(output_dir);

    let report = run_log_match(&options).context("Delivery-log match failed")?;
    println!("{}", report.summary());
    Ok(())
}

fn handle_partition(file: PathBuf, output_dir: PathBuf, config: ScrubConfig) -> Result<()> {
    let id_column = config.partition.id_column.clone();
    let options = PartitionOptions::new(file)
        .with_schema(config.partition)
        .with_output_dir(output_dir);

    let report = run_partition(&options).context("Partition failed")?;
    for line in report.summary_lines(&id_column) {
        println!("{line}");
    }
    Ok(())
}
