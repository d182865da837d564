use std::collections::BTreeMap;

use crate::mhc::models::aligned_sequence::AlignedSequence;
use crate::mhc::models::chain_kind::ChainKind;

/// Columns chosen by one criterion, per chain kind in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedColumns {
    criterion_name: String,
    columns: BTreeMap<ChainKind, Vec<usize>>
}

impl SelectedColumns {
    pub fn new(criterion_name: &str, columns: BTreeMap<ChainKind, Vec<usize>>) -> Self {
        return Self {
            criterion_name: criterion_name.to_owned(),
            columns: columns
        };
    }

    pub fn get_criterion_name(&self) -> &str {
        return self.criterion_name.as_str();
    }

    /// Empty slice if no column of `kind` was selected.
    pub fn for_kind(&self, kind: ChainKind) -> &[usize] {
        return match self.columns.get(&kind) {
            Some(columns) => columns.as_slice(),
            None => &[]
        };
    }
}

/// One allele of the reference panel with its pseudosequences, parallel to the selections of the table.
#[derive(Debug, Clone)]
pub struct Pseudosequence {
    allele: String,
    sequence: AlignedSequence,
    pseudosequences: Vec<String>
}

impl Pseudosequence {
    pub fn new(allele: &str, sequence: AlignedSequence, pseudosequences: Vec<String>) -> Self {
        return Self {
            allele: allele.to_owned(),
            sequence: sequence,
            pseudosequences: pseudosequences
        };
    }

    pub fn get_allele(&self) -> &str {
        return self.allele.as_str();
    }

    pub fn get_sequence(&self) -> &AlignedSequence {
        return &self.sequence;
    }

    pub fn get_kind(&self) -> ChainKind {
        return self.sequence.get_kind();
    }

    pub fn get_pseudosequences(&self) -> &[String] {
        return &self.pseudosequences;
    }
}

pub struct PseudosequenceTable {
    selections: Vec<SelectedColumns>,
    records: Vec<Pseudosequence>
}

impl PseudosequenceTable {
    pub fn new(selections: Vec<SelectedColumns>, records: Vec<Pseudosequence>) -> Self {
        return Self {
            selections: selections,
            records: records
        };
    }

    pub fn get_records(&self) -> &[Pseudosequence] {
        return &self.records;
    }

    pub fn get(&self, allele: &str) -> Option<&Pseudosequence> {
        return self.records.iter().find(|record| record.get_allele() == allele);
    }

    pub fn criterion_names(&self) -> Vec<String> {
        return self.selections.iter().map(|selection| selection.get_criterion_name().to_owned()).collect();
    }
}
