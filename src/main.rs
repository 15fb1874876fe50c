use clap::{Arg, ArgAction, Command as ClapCommand};
use log::error;
use std::process;

// Import from your library
use fitscrop::commands::{CommandFactory, FitscropCommandFactory};
use fitscrop::utils::logger::Logger;

fn main() {
    let matches = ClapCommand::new("fitscrop")
        .version("0.1.0")
        .about("Batch-crop FITS images while preserving WCS and observation metadata")
        .arg(
            Arg::new("input")
                .help("Source directory of FITS files (or a single file with --analyze)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Destination directory for cropped files")
                .value_name("DIR")
                .required(false),
        )
        .arg(
            Arg::new("region")
                .short('r')
                .long("region")
                .help("Crop region as x,y,w,h or x,y,WxH (e.g. 10,10,50x50)")
                .value_name("REGION")
                .required(false),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .help("Prefix for output file names")
                .value_name("PREFIX")
                .default_value("cropped_")
                .required(false),
        )
        .arg(
            Arg::new("keep-names")
                .long("keep-names")
                .help("Reuse source file names instead of prefixing them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("analyze")
                .short('a')
                .long("analyze")
                .help("Inspect the structure of a single FITS file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let log_file = "fitscrop.log";
    let logger = match Logger::new(log_file) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = Logger::init_global_logger("fitscrop-global.log", matches.get_flag("verbose")) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = FitscropCommandFactory::new();

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
