mod mhc;

use std::process;

use clap::{App, AppSettings, ArgMatches};
use log::{error, info, LevelFilter};

use mhc::errors::PipelineError;
use mhc::tasks::allele_sequences::{self, allele_sequences_task, AlleleSequencesArguments};
use mhc::tasks::assign_pdb_sequences::{self, assign_pdb_sequences_task, AssignPdbSequencesArguments};
use mhc::tasks::extract_pdb_sequences::{self, extract_pdb_sequences_task, ExtractPdbSequencesArguments};
use mhc::tasks::filter_sequences::{self, filter_sequences_task, FilterSequencesArguments};
use mhc::tasks::pseudosequences::{self, make_pseudosequences_task, prepare_aux_dir, PseudosequenceArguments};
use mhc::utility::config::Config;
use mhc::utility::logger::async_queued_logger;

fn build_cli<'a, 'b>() -> App<'a, 'b> {
    return App::new("mhc2_pseudoseq")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Curation of MHC class II allele sequences and selection of pseudosequence positions")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(pseudosequences::subcommand())
        .subcommand(filter_sequences::subcommand())
        .subcommand(allele_sequences::subcommand())
        .subcommand(extract_pdb_sequences::subcommand())
        .subcommand(assign_pdb_sequences::subcommand());
}

fn init_logger(log_file_path: Option<&str>) -> Result<(), PipelineError> {
    return async_queued_logger::init(log_file_path, LevelFilter::Info);
}

fn run(matches: &ArgMatches) -> Result<(), PipelineError> {
    let config = Config::from_env()?;
    match matches.subcommand() {
        ("pseudosequences", Some(cli_args)) => {
            let log_file_path = match cli_args.value_of("OUT_AUX_DIR") {
                Some(out_aux_dir) => Some(prepare_aux_dir(out_aux_dir)?.display().to_string()),
                None => None
            };
            init_logger(log_file_path.as_ref().map(|path| path.as_str()))?;
            let arguments = PseudosequenceArguments::from_cli_args(cli_args, &config)?;
            return make_pseudosequences_task(&arguments);
        },
        ("filter-sequences", Some(cli_args)) => {
            init_logger(None)?;
            return filter_sequences_task(&FilterSequencesArguments::from_cli_args(cli_args)?);
        },
        ("allele-sequences", Some(cli_args)) => {
            init_logger(None)?;
            return allele_sequences_task(&AlleleSequencesArguments::from_cli_args(cli_args)?);
        },
        ("extract-pdb-sequences", Some(cli_args)) => {
            init_logger(None)?;
            return extract_pdb_sequences_task(&ExtractPdbSequencesArguments::from_cli_args(cli_args, &config)?);
        },
        ("assign-pdb-sequences", Some(cli_args)) => {
            init_logger(None)?;
            return assign_pdb_sequences_task(&AssignPdbSequencesArguments::from_cli_args(cli_args)?);
        },
        (name, _) => return Err(PipelineError::Argument(format!("unknown subcommand '{}'", name)))
    }
}

fn main() {
    let matches = build_cli().get_matches();
    let start_time: f64 = time::precise_time_s();
    let exit_code = match run(&matches) {
        Ok(()) => {
            info!("Finished in {:.1}s", time::precise_time_s() - start_time);
            0
        },
        Err(err) => {
            // max level stays Off until a logger is installed
            if log::max_level() == LevelFilter::Off {
                eprintln!("ERROR: {}", err);
            } else {
                error!("{}", err);
            }
            1
        }
    };
    log::logger().flush();
    process::exit(exit_code);
}
