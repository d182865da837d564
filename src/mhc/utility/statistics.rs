use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::info;

use crate::mhc::models::aligned_sequence::{AlignmentSet, GAP};
use crate::mhc::models::chain_kind::ChainKind;
use crate::mhc::models::contact::Contact;
use crate::mhc::models::positional_statistic::{PositionalStatistic, PositionalTable};

/// Major residue and fraction of residues differing from it. Gaps count as a residue.
/// Ties go to the smallest character. `None` for an empty column.
pub fn minor_allele_fraction(residues: &[char]) -> Option<(char, f64)> {
    if residues.is_empty() {
        return None;
    }
    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    for residue in residues.iter() {
        *counts.entry(*residue).or_insert(0) += 1;
    }
    let mut major: (char, usize) = (GAP, 0);
    for (residue, count) in counts.iter() {
        if *count > major.1 {
            major = (*residue, *count);
        }
    }
    let minor_count = residues.len() - major.1;
    return Some((major.0, minor_count as f64 / residues.len() as f64));
}

/// For every (kind, aligned column) with at least one contact: the fraction of structures
/// with a contact at or below each cutoff. The denominator is the number of distinct
/// structures with any contact. Values run parallel to `cutoffs`, which must be ascending.
pub fn contact_fractions(contacts: &[Contact], cutoffs: &[f64]) -> HashMap<(ChainKind, usize), Vec<f64>> {
    let structures: BTreeSet<&str> = contacts.iter().map(|contact| contact.get_accession()).collect();
    // (kind, column) -> accession -> smallest cutoff with a contact
    let mut first_cutoff: HashMap<(ChainKind, usize), HashMap<&str, f64>> = HashMap::new();
    for contact in contacts.iter() {
        let per_structure = first_cutoff.entry((contact.get_kind(), contact.get_aligned_column())).or_insert_with(HashMap::new);
        let known = per_structure.entry(contact.get_accession()).or_insert(contact.get_cutoff());
        if contact.get_cutoff() < *known {
            *known = contact.get_cutoff();
        }
    }
    let mut fractions: HashMap<(ChainKind, usize), Vec<f64>> = HashMap::new();
    if structures.is_empty() {
        return fractions;
    }
    let number_of_structures = structures.len() as f64;
    for (position, per_structure) in first_cutoff.into_iter() {
        let mut cumulative: Vec<f64> = Vec::with_capacity(cutoffs.len());
        for cutoff in cutoffs.iter() {
            let count = per_structure.values().filter(|first| **first <= *cutoff).count();
            cumulative.push(count as f64 / number_of_structures);
        }
        fractions.insert(position, cumulative);
    }
    return fractions;
}

/// One row per aligned column of the reference panel, alpha first. Columns without
/// any contact get a contact fraction of zero for every cutoff.
pub fn build_positional_table(alignment: &AlignmentSet, contacts: &[Contact], cutoffs: &[f64]) -> PositionalTable {
    let fractions = contact_fractions(contacts, cutoffs);
    let mut rows: Vec<PositionalStatistic> = Vec::new();
    for kind in ChainKind::all().iter() {
        let panel: Vec<&[char]> = alignment.panel_of_kind(*kind).map(|sequence| sequence.get_aligned()).collect();
        if panel.is_empty() {
            continue;
        }
        info!("Calculating minor allele fractions: {} ({} alleles)", kind, panel.len());
        let mut column_residues: Vec<char> = Vec::with_capacity(panel.len());
        for column in 0..alignment.aligned_len(*kind) {
            column_residues.clear();
            column_residues.extend(panel.iter().map(|aligned| aligned[column]));
            let (major, maf) = minor_allele_fraction(&column_residues).unwrap_or((GAP, 0.0));
            let contact_fraction = match fractions.get(&(*kind, column)) {
                Some(values) => values.clone(),
                None => vec![0.0; cutoffs.len()]
            };
            rows.push(PositionalStatistic::new(*kind, column, major, maf, contact_fraction));
        }
    }
    return PositionalTable::new(cutoffs.to_vec(), rows);
}
