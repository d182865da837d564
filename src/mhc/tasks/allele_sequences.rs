use std::collections::BTreeMap;
use std::path::Path;

use clap::{App, Arg, SubCommand};
use log::info;

use crate::mhc::errors::PipelineError;
use crate::mhc::models::aligned_sequence::GAP;
use crate::mhc::models::amino_acids::amino_acid::PLACEHOLDER;
use crate::mhc::models::fasta_entry::FastaEntry;
use crate::mhc::tasks::required_value;
use crate::mhc::utility::fasta_reader::read_fasta;

pub fn subcommand<'a, 'b>() -> App<'a, 'b> {
    return SubCommand::with_name("allele-sequences")
        .about("Writes aligned allele sequences numbered after a reference allele")
        .arg(Arg::with_name("ALIGNED_FASTA").help("Aligned sequences").required(true).index(1))
        .arg(Arg::with_name("REFERENCE_ALLELE").long("reference-allele").help("Allele to use for position numbering").takes_value(true).required(true))
        .arg(Arg::with_name("OUT_CSV").long("out-csv").value_name("FILE").help("Result file").takes_value(true).required(true));
}

pub struct AlleleSequencesArguments {
    aligned_fasta: String,
    reference_allele: String,
    out_csv: String
}

impl AlleleSequencesArguments {
    pub fn get_aligned_fasta(&self) -> &str {
        return self.aligned_fasta.as_str();
    }

    pub fn get_reference_allele(&self) -> &str {
        return self.reference_allele.as_str();
    }

    pub fn get_out_csv(&self) -> &str {
        return self.out_csv.as_str();
    }

    pub fn from_cli_args(cli_args: &clap::ArgMatches) -> Result<Self, PipelineError> {
        return Ok(Self {
            aligned_fasta: required_value(cli_args, "ALIGNED_FASTA")?,
            reference_allele: required_value(cli_args, "REFERENCE_ALLELE")?,
            out_csv: required_value(cli_args, "OUT_CSV")?
        });
    }
}

/// Aligned allele sequences cut into columns numbered after the residues of a reference allele.
pub struct ReferenceNumberedTable {
    numbers: Vec<usize>,
    rows: BTreeMap<String, Vec<String>>
}

impl ReferenceNumberedTable {
    /// Column `n` (1-based) holds the residue aligned to the n-th reference residue together
    /// with every residue aligned to reference gaps right before it. Residues after the last
    /// reference residue get one extra column. Gaps are written as the placeholder.
    /// Alleles are keyed by the second header token; for repeated names the last record wins.
    pub fn new(entries: &[FastaEntry], reference_allele: &str) -> Result<Self, PipelineError> {
        let mut sequences: BTreeMap<String, Vec<char>> = BTreeMap::new();
        for entry in entries.iter() {
            let name = match entry.get_description_token(1) {
                Some(name) => name,
                None => return Err(PipelineError::Argument(format!("record {} has no allele name in its description", entry.get_id())))
            };
            sequences.insert(name.to_owned(), entry.get_sequence().chars().collect());
        }
        let reference: Vec<char> = match sequences.get(reference_allele) {
            Some(sequence) => sequence.clone(),
            None => return Err(PipelineError::UnknownAllele(reference_allele.to_owned()))
        };

        // aligned column -> reference number
        let mut column_numbers: Vec<usize> = Vec::with_capacity(reference.len());
        let mut current_number: usize = 1;
        for residue in reference.iter() {
            column_numbers.push(current_number);
            if *residue != GAP {
                current_number += 1;
            }
        }
        let mut numbers = column_numbers.clone();
        numbers.dedup();

        let mut rows: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (allele, sequence) in sequences.into_iter() {
            if sequence.len() != reference.len() {
                return Err(PipelineError::Argument(format!(
                    "aligned sequence of {} has length {}, reference {} has {}",
                    allele, sequence.len(), reference_allele, reference.len()
                )));
            }
            let mut cells: Vec<String> = vec![String::new(); numbers.len()];
            for (column, residue) in sequence.iter().enumerate() {
                let residue = if *residue == GAP { PLACEHOLDER } else { *residue };
                cells[column_numbers[column] - 1].push(residue);
            }
            rows.insert(allele, cells);
        }
        return Ok(Self {
            numbers: numbers,
            rows: rows
        });
    }

    pub fn get_numbers(&self) -> &[usize] {
        return &self.numbers;
    }

    pub fn get_rows(&self) -> &BTreeMap<String, Vec<String>> {
        return &self.rows;
    }

    pub fn get(&self, allele: &str) -> Option<&[String]> {
        return self.rows.get(allele).map(|cells| cells.as_slice());
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), PipelineError> {
        let mut writer = csv::Writer::from_path(path)?;
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.numbers.iter().map(|number| number.to_string()));
        writer.write_record(&header)?;
        for (allele, cells) in self.rows.iter() {
            let mut record: Vec<&str> = vec![allele.as_str()];
            record.extend(cells.iter().map(|cell| cell.as_str()));
            writer.write_record(&record)?;
        }
        writer.flush().map_err(|err| PipelineError::io(&path.display().to_string(), err))?;
        return Ok(());
    }
}

pub fn allele_sequences_task(arguments: &AlleleSequencesArguments) -> Result<(), PipelineError> {
    let entries = read_fasta(arguments.get_aligned_fasta())?;
    info!("Read {} aligned sequences", entries.len());
    let table = ReferenceNumberedTable::new(&entries, arguments.get_reference_allele())?;
    info!("Using reference {} with {} numbered columns", arguments.get_reference_allele(), table.get_numbers().len());
    table.write_csv(Path::new(arguments.get_out_csv()))?;
    info!("Wrote [{} alleles]: {}", table.get_rows().len(), arguments.get_out_csv());
    return Ok(());
}
