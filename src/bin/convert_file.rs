use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use rac2_builder::modules::archive_packager::ARCHIVE_FILE_NAME;
use rac2_builder::modules::conversion::convert_file;
use rac2_builder::modules::helpers::logging::setup_logging;
use rac2_builder::modules::models::race::{RaceSettings, RaceType};

/// Convert a csv of heats, lanes and team names into a zip of .rac2 race documents
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// csv file with a header row and the columns heat, lane and team name
    #[arg(short, long)]
    input: PathBuf,

    /// where to write the zip archive
    #[arg(short, long, default_value = ARCHIVE_FILE_NAME)]
    output: PathBuf,

    /// race duration in minutes
    #[arg(short, long)]
    duration: u32,

    /// name of the event
    #[arg(short, long)]
    event_name: String,

    /// boats or bikes
    #[arg(short = 't', long = "type", default_value_t = RaceType::Boats)]
    race_type: RaceType,
}

fn main() -> ExitCode {
    setup_logging().expect("failed to setup logging");
    let args = Args::parse();

    let settings = match RaceSettings::new(args.duration, &args.event_name, args.race_type) {
        Ok(settings) => settings,
        Err(err) => {
            error!(target:"convert_file", "invalid settings: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let archive = match convert_file(&args.input, &settings) {
        Ok(archive) => archive,
        Err(err) => {
            error!(target:"convert_file", "failed converting {}: {}", args.input.display(), err);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = fs::write(&args.output, archive) {
        error!(target:"convert_file", "failed writing {}: {}", args.output.display(), err);
        return ExitCode::FAILURE;
    }

    info!(target:"convert_file", "wrote {}", args.output.display());
    ExitCode::SUCCESS
}
