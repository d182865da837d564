use std::collections::{BTreeMap, HashSet};

use log::{info, warn};

use crate::mhc::errors::PipelineError;
use crate::mhc::models::aligned_sequence::{AlignmentSet, GAP};
use crate::mhc::models::amino_acids::amino_acid::PLACEHOLDER;
use crate::mhc::models::chain_kind::ChainKind;
use crate::mhc::models::criterion::{format_float, Criterion};
use crate::mhc::models::positional_statistic::PositionalTable;
use crate::mhc::models::pseudosequence::{Pseudosequence, PseudosequenceTable, SelectedColumns};
use crate::mhc::utility::allele_name::normalize_allele_name;

/// Evaluates `criterion` on the table (the flags are stored in the table) and
/// returns the qualifying columns per chain kind, ascending.
pub fn select_columns(table: &mut PositionalTable, criterion: Criterion) -> Result<SelectedColumns, PipelineError> {
    let flags = match table.add_criterion(criterion) {
        Some(flags) => flags,
        None => return Err(PipelineError::Argument(format!(
            "criterion cutoff {} is not one of the evaluated cutoffs {:?}",
            format_float(criterion.get_cutoff()), table.get_cutoffs()
        )))
    };
    let mut columns: BTreeMap<ChainKind, Vec<usize>> = BTreeMap::new();
    for (row, flag) in table.get_rows().iter().zip(flags.iter()) {
        if *flag {
            columns.entry(row.get_kind()).or_insert_with(Vec::new).push(row.get_aligned_column());
        }
    }
    for selected in columns.values_mut() {
        selected.sort();
        selected.dedup();
    }
    let selection = SelectedColumns::new(criterion.name().as_str(), columns);
    info!(
        "Criteria {} selected: alpha {}, beta {}",
        selection.get_criterion_name(),
        selection.for_kind(ChainKind::Alpha).len(),
        selection.for_kind(ChainKind::Beta).len()
    );
    return Ok(selection);
}

/// Residues at `columns` in the given order. Gaps become the placeholder so every
/// pseudosequence of a selection has the same length.
pub fn extract_pseudosequence(aligned: &[char], columns: &[usize]) -> String {
    return columns.iter()
        .map(|column| match aligned.get(*column) {
            Some(residue) if *residue != GAP => *residue,
            _ => PLACEHOLDER
        })
        .collect();
}

/// Builds the pseudosequences of every panel allele for every selection.
///
/// Alleles whose name can not be normalized are dropped with a warning.
/// Two panel sequences normalizing to the same allele are a fatal error.
pub fn build_pseudosequences(alignment: &AlignmentSet, selections: Vec<SelectedColumns>) -> Result<PseudosequenceTable, PipelineError> {
    let mut records: Vec<Pseudosequence> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut dropped: usize = 0;
    for sequence in alignment.panel() {
        let allele = match sequence.get_allele_name().and_then(normalize_allele_name) {
            Some(allele) => allele,
            None => {
                warn!("Dropping {}: could not parse allele name from '{}'", sequence.get_sequence_id(), sequence.get_description());
                dropped += 1;
                continue;
            }
        };
        if !seen.insert(allele.clone()) {
            return Err(PipelineError::DuplicateAllele(allele));
        }
        let pseudosequences: Vec<String> = selections.iter()
            .map(|selection| extract_pseudosequence(sequence.get_aligned(), selection.for_kind(sequence.get_kind())))
            .collect();
        records.push(Pseudosequence::new(allele.as_str(), sequence.clone(), pseudosequences));
    }
    info!("Built pseudosequences for {} alleles, dropped {} unparseable allele names", records.len(), dropped);
    return Ok(PseudosequenceTable::new(selections, records));
}
