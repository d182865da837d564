use std::collections::HashSet;

use clap::{App, Arg, SubCommand};
use log::{info, warn};

use crate::mhc::errors::PipelineError;
use crate::mhc::models::chain_kind::ChainKind;
use crate::mhc::models::fasta_entry::FastaEntry;
use crate::mhc::tasks::{parse_value, required_value};
use crate::mhc::utility::allele_name::normalize_allele_name;
use crate::mhc::utility::fasta_reader::{read_fasta, write_fasta};

pub const DEFAULT_MIN_LENGTH: usize = 200;

pub fn subcommand<'a, 'b>() -> App<'a, 'b> {
    return SubCommand::with_name("filter-sequences")
        .about("Filters and combines unaligned class II sequence fastas")
        .arg(Arg::with_name("FASTAS").help("Unaligned fastas").required(true).multiple(true).index(1))
        .arg(Arg::with_name("KIND").long("kind").possible_values(&["alpha", "beta"]).takes_value(true).required(true))
        .arg(Arg::with_name("OUT").long("out").value_name("FILE").help("Fasta output").takes_value(true).required(true))
        .arg(Arg::with_name("MIN_LENGTH").long("min-length").value_name("N").help("Default: 200").takes_value(true));
}

pub struct FilterSequencesArguments {
    input_files: Vec<String>,
    kind: ChainKind,
    out: String,
    min_length: usize
}

impl FilterSequencesArguments {
    pub fn get_input_files(&self) -> &[String] {
        return &self.input_files;
    }

    pub fn get_kind(&self) -> ChainKind {
        return self.kind;
    }

    pub fn get_out(&self) -> &str {
        return self.out.as_str();
    }

    pub fn get_min_length(&self) -> usize {
        return self.min_length;
    }

    pub fn from_cli_args(cli_args: &clap::ArgMatches) -> Result<Self, PipelineError> {
        let input_files: Vec<String> = match cli_args.values_of("FASTAS") {
            Some(values) => values.map(|path| path.to_owned()).collect(),
            None => return Err(PipelineError::Argument("no input fasta specified".to_owned()))
        };
        let kind_name = required_value(cli_args, "KIND")?;
        let kind = match ChainKind::from_str(kind_name.as_str()) {
            Some(kind) => kind,
            None => return Err(PipelineError::Argument(format!("kind must be alpha or beta, got '{}'", kind_name)))
        };
        let min_length = match cli_args.value_of("MIN_LENGTH") {
            Some(value) => parse_value::<usize>(value, "min-length")?,
            None => DEFAULT_MIN_LENGTH
        };
        return Ok(Self {
            input_files: input_files,
            kind: kind,
            out: required_value(cli_args, "OUT")?,
            min_length: min_length
        });
    }
}

/// Keeps the longest record per normalized allele name. Records with an unparseable
/// name or a sequence shorter than `min_length` are skipped. Output ids are prefixed
/// with the chain kind, descriptions with the normalized name.
pub fn filter_sequences(entries: &[FastaEntry], kind: ChainKind, min_length: usize) -> Vec<FastaEntry> {
    let mut longest_first: Vec<&FastaEntry> = entries.iter().collect();
    // stable, so equally long records keep their input order
    longest_first.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut seen: HashSet<String> = HashSet::new();
    let mut filtered: Vec<FastaEntry> = Vec::new();
    for entry in longest_first.into_iter() {
        let original_name = entry.get_description_token(1).unwrap_or("");
        let name = match normalize_allele_name(original_name) {
            Some(name) => name,
            None => {
                warn!("Skipping due to parsing '{}'", original_name);
                continue;
            }
        };
        if seen.contains(&name) {
            continue;
        }
        if entry.len() < min_length {
            warn!("Skipping due to short length {} {}", name, entry.get_description());
            continue;
        }
        let header = format!("{}.{} {} {}", kind, entry.get_id(), name, entry.get_description());
        seen.insert(name);
        filtered.push(FastaEntry::new(header.as_str(), entry.get_sequence()));
    }
    return filtered;
}

pub fn filter_sequences_task(arguments: &FilterSequencesArguments) -> Result<(), PipelineError> {
    let mut entries: Vec<FastaEntry> = Vec::new();
    for input_file in arguments.get_input_files().iter() {
        entries.extend(read_fasta(input_file.as_str())?);
    }
    let filtered = filter_sequences(&entries, arguments.get_kind(), arguments.get_min_length());
    let unique_sequences: HashSet<&str> = filtered.iter().map(|entry| entry.get_sequence()).collect();
    write_fasta(arguments.get_out(), &filtered)?;
    info!(
        "Wrote {} / {} [{} unique] sequences: {}",
        filtered.len(),
        entries.len(),
        unique_sequences.len(),
        arguments.get_out()
    );
    return Ok(());
}
