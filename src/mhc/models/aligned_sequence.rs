use std::collections::BTreeMap;

use crate::mhc::errors::PipelineError;
use crate::mhc::models::chain_kind::ChainKind;
use crate::mhc::models::fasta_entry::FastaEntry;
use crate::mhc::utility::fasta_reader::read_fasta;

pub const GAP: char = '-';
/// Sequence ids of chains taken from PDB structures start with this prefix, e.g. `pdb.1AQD_A`.
const STRUCTURE_CHAIN_PREFIX: &str = "pdb";

/// Maps ungapped residue indices of one sequence to columns of its alignment and back.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionMap {
    ungapped_to_aligned: Vec<usize>,
    aligned_to_ungapped: Vec<Option<usize>>
}

impl PositionMap {
    pub fn new(aligned_sequence: &str) -> Self {
        let mut ungapped_to_aligned: Vec<usize> = Vec::new();
        let mut aligned_to_ungapped: Vec<Option<usize>> = Vec::with_capacity(aligned_sequence.len());
        for (column, residue) in aligned_sequence.chars().enumerate() {
            if residue == GAP {
                aligned_to_ungapped.push(None);
            } else {
                aligned_to_ungapped.push(Some(ungapped_to_aligned.len()));
                ungapped_to_aligned.push(column);
            }
        }
        return Self {
            ungapped_to_aligned: ungapped_to_aligned,
            aligned_to_ungapped: aligned_to_ungapped
        };
    }

    pub fn to_aligned(&self, ungapped_index: usize) -> Option<usize> {
        return self.ungapped_to_aligned.get(ungapped_index).cloned();
    }

    /// `None` for gap columns and columns past the end of the alignment.
    pub fn to_ungapped(&self, aligned_column: usize) -> Option<usize> {
        return self.aligned_to_ungapped.get(aligned_column).cloned().unwrap_or(None);
    }

    pub fn aligned_len(&self) -> usize {
        return self.aligned_to_ungapped.len();
    }
}

#[derive(Debug, Clone)]
pub struct AlignedSequence {
    sequence_id: String,
    description: String,
    allele_name: Option<String>,
    kind: ChainKind,
    aligned: Vec<char>,
    unaligned: Vec<char>,
    position_map: PositionMap
}

impl AlignedSequence {
    pub fn new(sequence_id: &str, description: &str, kind: ChainKind, aligned_sequence: &str) -> Self {
        let aligned: Vec<char> = aligned_sequence.chars().collect();
        let unaligned: Vec<char> = aligned.iter().cloned().filter(|residue| *residue != GAP).collect();
        return Self {
            sequence_id: sequence_id.to_owned(),
            description: description.to_owned(),
            allele_name: description.split_whitespace().nth(1).map(|name| name.to_owned()),
            kind: kind,
            aligned: aligned,
            unaligned: unaligned,
            position_map: PositionMap::new(aligned_sequence)
        };
    }

    pub fn from_fasta_entry(entry: &FastaEntry, kind: ChainKind) -> Self {
        return Self::new(entry.get_id(), entry.get_description(), kind, entry.get_sequence());
    }

    pub fn get_sequence_id(&self) -> &str {
        return self.sequence_id.as_str();
    }

    pub fn get_description(&self) -> &str {
        return self.description.as_str();
    }

    /// Raw allele name, the second whitespace delimited token of the description.
    pub fn get_allele_name(&self) -> Option<&str> {
        return self.allele_name.as_ref().map(|name| name.as_str());
    }

    pub fn get_kind(&self) -> ChainKind {
        return self.kind;
    }

    pub fn get_aligned(&self) -> &[char] {
        return &self.aligned;
    }

    pub fn get_unaligned(&self) -> &[char] {
        return &self.unaligned;
    }

    pub fn aligned_string(&self) -> String {
        return self.aligned.iter().collect();
    }

    pub fn unaligned_string(&self) -> String {
        return self.unaligned.iter().collect();
    }

    pub fn get_position_map(&self) -> &PositionMap {
        return &self.position_map;
    }

    pub fn aligned_len(&self) -> usize {
        return self.aligned.len();
    }

    pub fn is_structure_chain(&self) -> bool {
        return self.sequence_id.starts_with(STRUCTURE_CHAIN_PREFIX);
    }

    /// `pdb.1AQD_A` -> `1AQD`
    pub fn get_accession(&self) -> Option<&str> {
        if !self.is_structure_chain() {
            return None;
        }
        return self.sequence_id.split('.').nth(1)
            .and_then(|rest| rest.split('_').next())
            .filter(|accession| !accession.is_empty());
    }

    /// `pdb.1AQD_A` -> `A`
    pub fn get_chain_id(&self) -> Option<&str> {
        if !self.is_structure_chain() || !self.sequence_id.contains('_') {
            return None;
        }
        return self.sequence_id.rsplit('_').next();
    }
}

/// All aligned sequences of a run, alpha and beta.
pub struct AlignmentSet {
    sequences: Vec<AlignedSequence>,
    aligned_lengths: BTreeMap<ChainKind, usize>
}

impl AlignmentSet {
    /// Fails if two panel sequences of the same kind have different aligned lengths.
    /// Structure chains are checked per structure when it is scanned.
    pub fn new(sequences: Vec<AlignedSequence>) -> Result<Self, PipelineError> {
        let mut aligned_lengths: BTreeMap<ChainKind, usize> = BTreeMap::new();
        for sequence in sequences.iter().filter(|sequence| !sequence.is_structure_chain()) {
            let expected = *aligned_lengths.entry(sequence.get_kind()).or_insert(sequence.aligned_len());
            if expected != sequence.aligned_len() {
                return Err(PipelineError::AlignmentLengthMismatch {
                    kind: sequence.get_kind(),
                    sequence_id: sequence.get_sequence_id().to_owned(),
                    expected: expected,
                    found: sequence.aligned_len()
                });
            }
        }
        return Ok(Self {
            sequences: sequences,
            aligned_lengths: aligned_lengths
        });
    }

    pub fn from_fasta_entries(alpha_entries: &[FastaEntry], beta_entries: &[FastaEntry]) -> Result<Self, PipelineError> {
        let mut sequences: Vec<AlignedSequence> = Vec::with_capacity(alpha_entries.len() + beta_entries.len());
        for entry in alpha_entries.iter() {
            sequences.push(AlignedSequence::from_fasta_entry(entry, ChainKind::Alpha));
        }
        for entry in beta_entries.iter() {
            sequences.push(AlignedSequence::from_fasta_entry(entry, ChainKind::Beta));
        }
        return Self::new(sequences);
    }

    pub fn from_fasta_files(alpha_fasta_path: &str, beta_fasta_path: &str) -> Result<Self, PipelineError> {
        let alpha_entries = read_fasta(alpha_fasta_path)?;
        let beta_entries = read_fasta(beta_fasta_path)?;
        return Self::from_fasta_entries(&alpha_entries, &beta_entries);
    }

    /// Aligned length per kind, taken from the panel.
    pub fn get_aligned_lengths(&self) -> &BTreeMap<ChainKind, usize> {
        return &self.aligned_lengths;
    }

    pub fn aligned_len(&self, kind: ChainKind) -> usize {
        return self.aligned_lengths.get(&kind).cloned().unwrap_or(0);
    }

    /// Reference panel: all sequences which are not taken from a structure.
    pub fn panel(&self) -> impl Iterator<Item = &AlignedSequence> {
        return self.sequences.iter().filter(|sequence| !sequence.is_structure_chain());
    }

    pub fn panel_of_kind(&self, kind: ChainKind) -> impl Iterator<Item = &AlignedSequence> {
        return self.panel().filter(move |sequence| sequence.get_kind() == kind);
    }

    /// Structure chains grouped by accession. Records without a parsable accession are left out.
    pub fn structure_chains_by_accession(&self) -> BTreeMap<String, Vec<AlignedSequence>> {
        let mut by_accession: BTreeMap<String, Vec<AlignedSequence>> = BTreeMap::new();
        for sequence in self.sequences.iter().filter(|sequence| sequence.is_structure_chain()) {
            if let (Some(accession), Some(_)) = (sequence.get_accession(), sequence.get_chain_id()) {
                by_accession.entry(accession.to_owned()).or_insert_with(Vec::new).push(sequence.clone());
            }
        }
        return by_accession;
    }

    pub fn len(&self) -> usize {
        return self.sequences.len();
    }
}
