use std::collections::{HashMap, HashSet};
use std::fs;

use clap::{App, Arg, SubCommand};
use log::info;

use crate::mhc::errors::PipelineError;
use crate::mhc::models::chain_kind::ChainKind;
use crate::mhc::models::fasta_entry::FastaEntry;
use crate::mhc::models::search_hit::SearchHit;
use crate::mhc::tasks::{parse_value, required_value};
use crate::mhc::utility::fasta_reader::{read_fasta, write_fasta};

pub const MIN_QUERY_COVERAGE: f64 = 0.7;
pub const MIN_TARGET_COVERAGE: f64 = 0.5;
const REQUIRED_COLUMNS: [&str; 5] = ["query", "target", "evalue", "qcov", "tcov"];

pub fn subcommand<'a, 'b>() -> App<'a, 'b> {
    return SubCommand::with_name("assign-pdb-sequences")
        .about("Assigns structure chain sequences to alpha or beta by their best hit in the allele panels")
        .arg(Arg::with_name("PDB_SEQUENCES").help("Fasta written by extract-pdb-sequences").required(true).index(1))
        .arg(Arg::with_name("SEARCH_RESULTS").help("mmseqs search results of the pdb sequences against the alpha and beta panels").required(true).index(2))
        .arg(Arg::with_name("MMSEQS_OUTPUT_FORMAT")
            .long("mmseqs-output-format")
            .value_name("A,B,C")
            .help("Comma separated columns of the search results, must include query, target, evalue, qcov and tcov")
            .takes_value(true)
            .required(true))
        .arg(Arg::with_name("OUT_ALPHA").long("out-alpha").value_name("FILE").help("Fasta output for alpha chains").takes_value(true))
        .arg(Arg::with_name("OUT_BETA").long("out-beta").value_name("FILE").help("Fasta output for beta chains").takes_value(true));
}

pub struct AssignPdbSequencesArguments {
    pdb_sequences: String,
    search_results: String,
    columns: Vec<String>,
    out_alpha: Option<String>,
    out_beta: Option<String>
}

impl AssignPdbSequencesArguments {
    pub fn get_pdb_sequences(&self) -> &str {
        return self.pdb_sequences.as_str();
    }

    pub fn get_search_results(&self) -> &str {
        return self.search_results.as_str();
    }

    pub fn get_columns(&self) -> &[String] {
        return &self.columns;
    }

    pub fn get_out(&self, kind: ChainKind) -> Option<&str> {
        let out = match kind {
            ChainKind::Alpha => &self.out_alpha,
            ChainKind::Beta => &self.out_beta
        };
        return out.as_ref().map(|path| path.as_str());
    }

    pub fn from_cli_args(cli_args: &clap::ArgMatches) -> Result<Self, PipelineError> {
        let columns: Vec<String> = required_value(cli_args, "MMSEQS_OUTPUT_FORMAT")?
            .split(',')
            .map(|column| column.trim().to_owned())
            .collect();
        return Ok(Self {
            pdb_sequences: required_value(cli_args, "PDB_SEQUENCES")?,
            search_results: required_value(cli_args, "SEARCH_RESULTS")?,
            columns: columns,
            out_alpha: cli_args.value_of("OUT_ALPHA").map(|path| path.to_owned()),
            out_beta: cli_args.value_of("OUT_BETA").map(|path| path.to_owned())
        });
    }
}

/// Reads headerless search results. Tab separated unless the first line has no tab.
pub fn read_search_hits(path: &str, columns: &[String]) -> Result<Vec<SearchHit>, PipelineError> {
    let contents = fs::read_to_string(path).map_err(|err| PipelineError::io(path, err))?;
    let first_line = contents.lines().next().unwrap_or("");
    let delimiter = if first_line.contains('\t') || !first_line.contains(',') { b'\t' } else { b',' };
    // positions of query, target, evalue, qcov and tcov
    let mut indices: [usize; 5] = [0; 5];
    for (required_index, required) in REQUIRED_COLUMNS.iter().enumerate() {
        indices[required_index] = match columns.iter().position(|column| column == required) {
            Some(index) => index,
            None => return Err(PipelineError::Argument(format!("mmseqs output format has no {} column", required)))
        };
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_reader(contents.as_bytes());
    let mut hits: Vec<SearchHit> = Vec::new();
    for row in reader.records() {
        let row = row?;
        let fields: Vec<&str> = indices.iter().map(|index| row.get(*index).unwrap_or("")).collect();
        hits.push(SearchHit::new(
            fields[0],
            fields[1],
            parse_value::<f64>(fields[2], "evalue")?,
            parse_value::<f64>(fields[3], "qcov")?,
            parse_value::<f64>(fields[4], "tcov")?
        ));
    }
    return Ok(hits);
}

/// Best hit per query among the hits covering more than 70% of the query and 50% of the target.
/// Hits are ordered by ascending evalue; on equal evalues the earlier line wins.
pub fn best_hits(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut covering: Vec<SearchHit> = hits.into_iter()
        .filter(|hit| hit.get_query_coverage() > MIN_QUERY_COVERAGE && hit.get_target_coverage() > MIN_TARGET_COVERAGE)
        .collect();
    covering.sort_by(|a, b| a.get_evalue().partial_cmp(&b.get_evalue()).unwrap_or(std::cmp::Ordering::Equal));
    let mut seen: HashSet<String> = HashSet::new();
    return covering.into_iter()
        .filter(|hit| seen.insert(hit.get_query().to_owned()))
        .collect();
}

/// `>pdb.{query}` records for all best hits of `kind`, in hit order.
pub fn assigned_entries(hits: &[SearchHit], kind: ChainKind, sequences: &HashMap<String, String>, source_name: &str) -> Result<Vec<FastaEntry>, PipelineError> {
    let mut entries: Vec<FastaEntry> = Vec::new();
    for hit in hits.iter().filter(|hit| hit.kind() == Some(kind)) {
        let sequence = match sequences.get(hit.get_query()) {
            Some(sequence) => sequence,
            None => return Err(PipelineError::UnknownSequence {
                sequence_id: hit.get_query().to_owned(),
                path: source_name.to_owned()
            })
        };
        entries.push(FastaEntry::new(format!("pdb.{}", hit.get_query()).as_str(), sequence.as_str()));
    }
    return Ok(entries);
}

pub fn assign_pdb_sequences_task(arguments: &AssignPdbSequencesArguments) -> Result<(), PipelineError> {
    let sequences: HashMap<String, String> = read_fasta(arguments.get_pdb_sequences())?
        .iter()
        .map(|entry| (entry.get_id().to_owned(), entry.get_sequence().to_owned()))
        .collect();
    let hits = read_search_hits(arguments.get_search_results(), arguments.get_columns())?;
    let number_of_hits = hits.len();
    let hits = best_hits(hits);
    info!(
        "Assigned {} sequences from {} hits: alpha {}, beta {}",
        hits.len(),
        number_of_hits,
        hits.iter().filter(|hit| hit.kind() == Some(ChainKind::Alpha)).count(),
        hits.iter().filter(|hit| hit.kind() == Some(ChainKind::Beta)).count()
    );
    for kind in ChainKind::all().iter() {
        if let Some(out) = arguments.get_out(*kind) {
            let entries = assigned_entries(&hits, *kind, &sequences, arguments.get_pdb_sequences())?;
            write_fasta(out, &entries)?;
            info!("Wrote {} with {} sequences", out, entries.len());
        }
    }
    return Ok(());
}
