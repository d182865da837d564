use crate::mhc::models::chain_kind::ChainKind;

pub const CSV_HEADER: [&str; 8] = [
    "accession",
    "cutoff",
    "peptide_chain",
    "mhc_chain",
    "mhc_chain_kind",
    "mhc_residue_unaligned",
    "mhc_residue_aligned",
    "mhc_residue"
];

/// MHC residue found within `cutoff` angstrom of a peptide chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    accession: String,
    cutoff: f64,
    peptide_chain: String,
    mhc_chain: String,
    kind: ChainKind,
    unaligned_index: usize,
    aligned_column: usize,
    residue_code: char
}

impl Contact {
    pub fn new(accession: &str, cutoff: f64, peptide_chain: &str, mhc_chain: &str, kind: ChainKind, unaligned_index: usize, aligned_column: usize, residue_code: char) -> Self {
        return Self {
            accession: accession.to_owned(),
            cutoff: cutoff,
            peptide_chain: peptide_chain.to_owned(),
            mhc_chain: mhc_chain.to_owned(),
            kind: kind,
            unaligned_index: unaligned_index,
            aligned_column: aligned_column,
            residue_code: residue_code
        };
    }

    pub fn get_accession(&self) -> &str {
        return self.accession.as_str();
    }

    pub fn get_cutoff(&self) -> f64 {
        return self.cutoff;
    }

    pub fn get_peptide_chain(&self) -> &str {
        return self.peptide_chain.as_str();
    }

    pub fn get_mhc_chain(&self) -> &str {
        return self.mhc_chain.as_str();
    }

    pub fn get_kind(&self) -> ChainKind {
        return self.kind;
    }

    pub fn get_unaligned_index(&self) -> usize {
        return self.unaligned_index;
    }

    pub fn get_aligned_column(&self) -> usize {
        return self.aligned_column;
    }

    pub fn get_residue_code(&self) -> char {
        return self.residue_code;
    }

    pub fn as_csv_record(&self) -> Vec<String> {
        return vec![
            self.accession.clone(),
            format!("{:?}", self.cutoff),
            self.peptide_chain.clone(),
            self.mhc_chain.clone(),
            self.kind.to_string(),
            self.unaligned_index.to_string(),
            self.aligned_column.to_string(),
            self.residue_code.to_string()
        ];
    }
}
