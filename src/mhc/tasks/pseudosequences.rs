use std::fs;
use std::path::{Path, PathBuf};

use clap::{App, Arg, SubCommand};
use log::info;

use crate::mhc::errors::PipelineError;
use crate::mhc::models::aligned_sequence::{AlignedSequence, AlignmentSet};
use crate::mhc::models::criterion::{format_float, Criterion};
use crate::mhc::models::pseudosequence::{PseudosequenceTable, SelectedColumns};
use crate::mhc::tasks::{parse_value, required_value};
use crate::mhc::utility::allele_name::normalize_allele_name;
use crate::mhc::utility::config::Config;
use crate::mhc::utility::contact_scanner::{select_accessions, ContactScanner, ScanSettings};
use crate::mhc::utility::csv_output::{self, ReferenceAlleles};
use crate::mhc::utility::pseudosequence_selector::{build_pseudosequences, select_columns};
use crate::mhc::utility::statistics::build_positional_table;
use crate::mhc::utility::structure_reader::CifDirectory;
use crate::mhc::utility::visualization::export_reference_structures;

pub const DEFAULT_CUTOFFS: [f64; 5] = [2.0, 4.0, 6.0, 8.0, 10.0];
pub const DEFAULT_MIN_PEPTIDE_LENGTH: usize = 5;
pub const DEFAULT_MAX_PEPTIDE_LENGTH: usize = 50;
pub const RUN_LOG_FILE: &str = "run.log";

pub fn subcommand<'a, 'b>() -> App<'a, 'b> {
    return SubCommand::with_name("pseudosequences")
        .about("Selects pseudosequence positions from peptide contacts in PDB structures")
        .arg(Arg::with_name("ALPHA_ALIGNED_FASTA").help("Aligned alpha chain sequences").required(true).index(1))
        .arg(Arg::with_name("BETA_ALIGNED_FASTA").help("Aligned beta chain sequences").required(true).index(2))
        .arg(Arg::with_name("PDB_DIR").help("Directory containing <accession>.cif.gz files, default: $MHC2_DATA_DIR/pdb").index(3))
        .arg(Arg::with_name("CRITERIA")
            .long("criteria")
            .value_names(&["MAF", "CUTOFF", "FRACTION"])
            .help("Criteria for selecting a position: min minor allele fraction, cutoff distance, fraction of structures with a contact at the cutoff. May be given any number of times.")
            .takes_value(true)
            .number_of_values(3)
            .multiple(true)
            .required(true))
        .arg(Arg::with_name("CUTOFFS")
            .long("cutoffs")
            .value_name("X")
            .help("Cutoff distances to evaluate, default: 2 4 6 8 10")
            .takes_value(true)
            .multiple(true)
            .min_values(1))
        .arg(Arg::with_name("REFERENCE_ALLELE")
            .long("reference-allele")
            .value_names(&["ALPHA", "BETA"])
            .help("Alpha and beta alleles to use for position numbering")
            .takes_value(true)
            .number_of_values(2))
        .arg(Arg::with_name("REFERENCE_STRUCTURE")
            .long("reference-structure")
            .value_name("ACCESSION")
            .help("Structure to write out with b-factors set from the positional statistics. May be given any number of times.")
            .takes_value(true)
            .number_of_values(1)
            .multiple(true))
        .arg(Arg::with_name("OUT_CSV").long("out-csv").value_name("FILE").help("Result file for pseudosequences").takes_value(true))
        .arg(Arg::with_name("OUT_AUX_DIR").long("out-aux-dir").value_name("DIR").help("Result directory for extra information and the run log").takes_value(true))
        .arg(Arg::with_name("PEPTIDE_CHAIN_MIN_LENGTH").long("peptide-chain-min-length").value_name("N").help("Default: 5").takes_value(true))
        .arg(Arg::with_name("PEPTIDE_CHAIN_MAX_LENGTH").long("peptide-chain-max-length").value_name("N").help("Default: 50").takes_value(true))
        .arg(Arg::with_name("SUBSAMPLE_PDB").long("subsample-pdb").value_name("N").help("Subsample to at most N PDB structures").takes_value(true))
        .arg(Arg::with_name("RANDOM_SEED").long("random-seed").value_name("SEED").help("Seed for subsampling").takes_value(true))
        .arg(Arg::with_name("THREAD_COUNT").long("threads").value_name("N").help("Number of scan threads, default: $MHC2_THREADS or the number of CPUs").takes_value(true));
}

pub struct PseudosequenceArguments {
    alpha_aligned_fasta: String,
    beta_aligned_fasta: String,
    pdb_dir: PathBuf,
    reference_alleles: Option<(String, String)>,
    reference_structures: Vec<String>,
    out_csv: Option<String>,
    out_aux_dir: Option<String>,
    cutoffs: Vec<f64>,
    criteria: Vec<Criterion>,
    min_peptide_length: usize,
    max_peptide_length: usize,
    subsample_pdb: Option<usize>,
    random_seed: Option<u64>,
    thread_count: usize
}

impl PseudosequenceArguments {
    pub fn get_alpha_aligned_fasta(&self) -> &str {
        return self.alpha_aligned_fasta.as_str();
    }

    pub fn get_beta_aligned_fasta(&self) -> &str {
        return self.beta_aligned_fasta.as_str();
    }

    pub fn get_pdb_dir(&self) -> &Path {
        return self.pdb_dir.as_path();
    }

    pub fn get_reference_alleles(&self) -> Option<(&str, &str)> {
        return self.reference_alleles.as_ref().map(|(alpha, beta)| (alpha.as_str(), beta.as_str()));
    }

    pub fn get_reference_structures(&self) -> &[String] {
        return &self.reference_structures;
    }

    pub fn get_out_csv(&self) -> Option<&str> {
        return self.out_csv.as_ref().map(|path| path.as_str());
    }

    pub fn get_out_aux_dir(&self) -> Option<&str> {
        return self.out_aux_dir.as_ref().map(|path| path.as_str());
    }

    pub fn get_cutoffs(&self) -> &[f64] {
        return &self.cutoffs;
    }

    pub fn get_criteria(&self) -> &[Criterion] {
        return &self.criteria;
    }

    pub fn get_min_peptide_length(&self) -> usize {
        return self.min_peptide_length;
    }

    pub fn get_max_peptide_length(&self) -> usize {
        return self.max_peptide_length;
    }

    pub fn get_subsample_pdb(&self) -> Option<usize> {
        return self.subsample_pdb;
    }

    pub fn get_random_seed(&self) -> Option<u64> {
        return self.random_seed;
    }

    pub fn get_thread_count(&self) -> usize {
        return self.thread_count;
    }

    pub fn from_cli_args(cli_args: &clap::ArgMatches, config: &Config) -> Result<Self, PipelineError> {
        let alpha_aligned_fasta = required_value(cli_args, "ALPHA_ALIGNED_FASTA")?;
        let beta_aligned_fasta = required_value(cli_args, "BETA_ALIGNED_FASTA")?;
        let pdb_dir: PathBuf = match cli_args.value_of("PDB_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => config.default_pdb_dir()
        };
        let reference_alleles: Option<(String, String)> = match cli_args.values_of("REFERENCE_ALLELE") {
            Some(values) => {
                let values: Vec<&str> = values.collect();
                if values.len() != 2 {
                    return Err(PipelineError::Argument(format!("--reference-allele needs an alpha and a beta allele, got {} values", values.len())));
                }
                Some((values[0].to_owned(), values[1].to_owned()))
            },
            None => None
        };
        let reference_structures: Vec<String> = match cli_args.values_of("REFERENCE_STRUCTURE") {
            Some(values) => values.map(|accession| accession.to_owned()).collect(),
            None => Vec::new()
        };
        let cutoffs: Vec<f64> = match cli_args.values_of("CUTOFFS") {
            Some(values) => {
                let mut cutoffs: Vec<f64> = Vec::new();
                for value in values {
                    let cutoff = parse_value::<f64>(value, "cutoff")?;
                    if !(cutoff > 0.0) {
                        return Err(PipelineError::Argument(format!("cutoffs must be positive, got {}", value)));
                    }
                    cutoffs.push(cutoff);
                }
                cutoffs
            },
            None => DEFAULT_CUTOFFS.to_vec()
        };
        let criteria: Vec<Criterion> = match cli_args.values_of("CRITERIA") {
            Some(values) => {
                let values: Vec<&str> = values.collect();
                if values.len() % 3 != 0 {
                    return Err(PipelineError::Argument(format!("every criterion needs 3 values, got {} values in total", values.len())));
                }
                let mut criteria: Vec<Criterion> = Vec::new();
                for triple in values.chunks(3) {
                    criteria.push(Criterion::from_values(triple)?);
                }
                criteria
            },
            None => return Err(PipelineError::Argument("at least one criterion is needed".to_owned()))
        };
        for criterion in criteria.iter() {
            if !cutoffs.contains(&criterion.get_cutoff()) {
                return Err(PipelineError::Argument(format!(
                    "cutoff {} of criterion {} is not one of the evaluated cutoffs",
                    format_float(criterion.get_cutoff()), criterion.name()
                )));
            }
        }
        let min_peptide_length = match cli_args.value_of("PEPTIDE_CHAIN_MIN_LENGTH") {
            Some(value) => parse_value::<usize>(value, "peptide-chain-min-length")?,
            None => DEFAULT_MIN_PEPTIDE_LENGTH
        };
        let max_peptide_length = match cli_args.value_of("PEPTIDE_CHAIN_MAX_LENGTH") {
            Some(value) => parse_value::<usize>(value, "peptide-chain-max-length")?,
            None => DEFAULT_MAX_PEPTIDE_LENGTH
        };
        if min_peptide_length > max_peptide_length {
            return Err(PipelineError::Argument("peptide-chain-min-length must be less or equals than peptide-chain-max-length".to_owned()));
        }
        let subsample_pdb = match cli_args.value_of("SUBSAMPLE_PDB") {
            Some(value) => Some(parse_value::<usize>(value, "subsample-pdb")?),
            None => None
        };
        let random_seed = match cli_args.value_of("RANDOM_SEED") {
            Some(value) => Some(parse_value::<u64>(value, "random-seed")?),
            None => None
        };
        let thread_count = match cli_args.value_of("THREAD_COUNT") {
            Some(value) => parse_value::<usize>(value, "threads")?,
            None => config.get_thread_count()
        };
        return Ok(Self {
            alpha_aligned_fasta: alpha_aligned_fasta,
            beta_aligned_fasta: beta_aligned_fasta,
            pdb_dir: pdb_dir,
            reference_alleles: reference_alleles,
            reference_structures: reference_structures,
            out_csv: cli_args.value_of("OUT_CSV").map(|path| path.to_owned()),
            out_aux_dir: cli_args.value_of("OUT_AUX_DIR").map(|path| path.to_owned()),
            cutoffs: cutoffs,
            criteria: criteria,
            min_peptide_length: min_peptide_length,
            max_peptide_length: max_peptide_length,
            subsample_pdb: subsample_pdb,
            random_seed: random_seed,
            thread_count: thread_count
        });
    }
}

/// Creates the aux directory and returns the path of the run log inside it.
pub fn prepare_aux_dir(out_aux_dir: &str) -> Result<PathBuf, PipelineError> {
    fs::create_dir_all(out_aux_dir).map_err(|err| PipelineError::io(out_aux_dir, err))?;
    return Ok(Path::new(out_aux_dir).join(RUN_LOG_FILE));
}

pub fn make_pseudosequences_task(arguments: &PseudosequenceArguments) -> Result<(), PipelineError> {
    let alignment = AlignmentSet::from_fasta_files(arguments.get_alpha_aligned_fasta(), arguments.get_beta_aligned_fasta())?;
    info!("Read {} aligned sequences ({} reference panel)", alignment.len(), alignment.panel().count());

    let mut chain_records_by_accession = alignment.structure_chains_by_accession();
    let accessions: Vec<String> = chain_records_by_accession.keys().cloned().collect();
    let selected = select_accessions(&accessions, arguments.get_subsample_pdb(), arguments.get_reference_structures(), arguments.get_random_seed());
    if selected.len() < accessions.len() {
        info!("Subsampled {} / {} structures", selected.len(), accessions.len());
        chain_records_by_accession.retain(|accession, _| selected.contains(accession));
    }

    let settings = ScanSettings::new(arguments.get_cutoffs(), arguments.get_min_peptide_length(), arguments.get_max_peptide_length())
        .with_aligned_lengths(alignment.get_aligned_lengths());
    let scanner = ContactScanner::new(CifDirectory::new(arguments.get_pdb_dir()), settings, arguments.get_thread_count());
    let report = scanner.scan(chain_records_by_accession.clone())?;

    let mut positional_table = build_positional_table(&alignment, report.get_contacts(), scanner.get_settings().get_cutoffs());
    let mut selections: Vec<SelectedColumns> = Vec::new();
    for criterion in arguments.get_criteria().iter() {
        selections.push(select_columns(&mut positional_table, *criterion)?);
    }
    let pseudosequences = build_pseudosequences(&alignment, selections)?;
    let reference_sequences = match arguments.get_reference_alleles() {
        Some((alpha, beta)) => Some(resolve_reference_alleles(&pseudosequences, alpha, beta)?),
        None => None
    };

    if let Some(out_csv) = arguments.get_out_csv() {
        csv_output::write_pseudosequences(Path::new(out_csv), &pseudosequences)?;
        info!("Wrote {} alleles: {}", pseudosequences.get_records().len(), out_csv);
    }

    if let Some(out_aux_dir) = arguments.get_out_aux_dir() {
        prepare_aux_dir(out_aux_dir)?;
        let out_aux_dir = Path::new(out_aux_dir);

        let aligned_sequences_path = out_aux_dir.join("aligned_sequences.csv");
        csv_output::write_aligned_sequences(&aligned_sequences_path, &pseudosequences)?;
        info!("Wrote {}", aligned_sequences_path.display());

        let contacts_path = out_aux_dir.join("contacts.csv");
        csv_output::write_contacts(&contacts_path, report.get_contacts())?;
        info!("Wrote {}", contacts_path.display());

        let positional_path = out_aux_dir.join("positional.csv");
        let reference = match (arguments.get_reference_alleles(), reference_sequences.as_ref()) {
            (Some((alpha_name, beta_name)), Some((alpha, beta))) => Some(ReferenceAlleles::new(alpha_name, beta_name, alpha, beta)),
            _ => None
        };
        csv_output::write_positional(&positional_path, &positional_table, reference.as_ref())?;
        info!("Wrote {}", positional_path.display());

        export_reference_structures(
            &CifDirectory::new(arguments.get_pdb_dir()),
            arguments.get_reference_structures(),
            &report,
            &chain_records_by_accession,
            &positional_table,
            out_aux_dir
        )?;
    }
    return Ok(());
}

/// Looks up the aligned sequences of the reference alleles, by normalized name.
pub fn resolve_reference_alleles(table: &PseudosequenceTable, alpha: &str, beta: &str) -> Result<(AlignedSequence, AlignedSequence), PipelineError> {
    return Ok((resolve_reference_allele(table, alpha)?, resolve_reference_allele(table, beta)?));
}

fn resolve_reference_allele(table: &PseudosequenceTable, name: &str) -> Result<AlignedSequence, PipelineError> {
    return normalize_allele_name(name)
        .and_then(|normalized| table.get(normalized.as_str()).map(|record| record.get_sequence().clone()))
        .ok_or_else(|| PipelineError::UnknownAllele(name.to_owned()));
}
