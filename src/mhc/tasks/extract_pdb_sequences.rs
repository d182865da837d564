use std::path::PathBuf;

use clap::{App, Arg, SubCommand};
use log::{info, warn};

use crate::mhc::errors::PipelineError;
use crate::mhc::models::fasta_entry::FastaEntry;
use crate::mhc::models::structure::Structure;
use crate::mhc::tasks::required_value;
use crate::mhc::utility::config::Config;
use crate::mhc::utility::fasta_reader::write_fasta;
use crate::mhc::utility::structure_reader::{CifDirectory, StructureSource};

pub fn subcommand<'a, 'b>() -> App<'a, 'b> {
    return SubCommand::with_name("extract-pdb-sequences")
        .about("Writes the chain sequences of all .cif.gz files in a directory to a fasta")
        .arg(Arg::with_name("PDB_DIR").help("Directory of .cif.gz files, default: $MHC2_DATA_DIR/pdb").index(1))
        .arg(Arg::with_name("OUT").long("out").value_name("FILE").help("Fasta output").takes_value(true).required(true));
}

pub struct ExtractPdbSequencesArguments {
    pdb_dir: PathBuf,
    out: String
}

impl ExtractPdbSequencesArguments {
    pub fn get_pdb_dir(&self) -> &PathBuf {
        return &self.pdb_dir;
    }

    pub fn get_out(&self) -> &str {
        return self.out.as_str();
    }

    pub fn from_cli_args(cli_args: &clap::ArgMatches, config: &Config) -> Result<Self, PipelineError> {
        let pdb_dir = match cli_args.value_of("PDB_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => config.default_pdb_dir()
        };
        return Ok(Self {
            pdb_dir: pdb_dir,
            out: required_value(cli_args, "OUT")?
        });
    }
}

/// One record per chain: `>{ACCESSION}_{CHAIN} {file name}` with the one-letter sequence.
pub fn chain_sequences(structure: &Structure, file_name: &str) -> Vec<FastaEntry> {
    let accession = structure.get_accession().to_uppercase();
    return structure.get_chains().iter()
        .map(|chain| FastaEntry::new(
            format!("{}_{} {}", accession, chain.get_id(), file_name).as_str(),
            chain.sequence().as_str()
        ))
        .collect();
}

pub fn extract_pdb_sequences_task(arguments: &ExtractPdbSequencesArguments) -> Result<(), PipelineError> {
    let directory = CifDirectory::new(arguments.get_pdb_dir());
    let accessions = directory.accessions()?;
    info!("Found {} files", accessions.len());
    let mut entries: Vec<FastaEntry> = Vec::new();
    for accession in accessions.iter() {
        let structure = match directory.load(accession) {
            Ok(structure) => structure,
            Err(err) => {
                warn!("Skipping {} because {}", accession, err);
                continue;
            }
        };
        let file_name = directory.structure_path(accession).file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        entries.extend(chain_sequences(&structure, file_name.as_str()));
    }
    write_fasta(arguments.get_out(), &entries)?;
    info!("Wrote {} chain sequences: {}", entries.len(), arguments.get_out());
    return Ok(());
}
