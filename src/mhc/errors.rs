use std::fmt;
use std::io;

use thiserror::Error;

use crate::mhc::models::chain_kind::ChainKind;

/// Errors which abort the whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not read structure '{path}': {message}")]
    Structure {
        path: String,
        message: String
    },

    #[error("invalid argument: {0}")]
    Argument(String),

    #[error("aligned {kind} sequence '{sequence_id}' has length {found}, expected {expected}")]
    AlignmentLengthMismatch {
        kind: ChainKind,
        sequence_id: String,
        expected: usize,
        found: usize
    },

    /// Structure and alignment disagree about a residue. Always fatal.
    #[error("integrity violation in {accession}: {message}")]
    IntegrityViolation {
        accession: String,
        message: String
    },

    #[error("allele '{0}' occurs more than once after normalization")]
    DuplicateAllele(String),

    #[error("unknown allele '{0}'")]
    UnknownAllele(String),

    #[error("sequence '{sequence_id}' not found in {path}")]
    UnknownSequence {
        sequence_id: String,
        path: String
    }
}

impl PipelineError {
    pub fn io(path: &str, source: io::Error) -> Self {
        return PipelineError::Io {
            path: path.to_owned(),
            source: source
        };
    }

    pub fn integrity(accession: &str, message: String) -> Self {
        return PipelineError::IntegrityViolation {
            accession: accession.to_owned(),
            message: message
        };
    }
}

/// Reasons for skipping a single structure. Never fatal, only counted and logged.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    ChainCountMismatch { alpha: usize, beta: usize },
    NoPeptideChains,
    MissingChain(String),
    AlignmentLengthMismatch { sequence_id: String, expected: usize, found: usize },
    StructureUnavailable(String)
}

impl SkipReason {
    /// Short stable key, used for the per-reason counts in the scan summary.
    pub fn key(&self) -> &'static str {
        return match self {
            SkipReason::ChainCountMismatch { .. } => "chain count mismatch",
            SkipReason::NoPeptideChains => "no peptide chains",
            SkipReason::MissingChain(_) => "chain missing from structure",
            SkipReason::AlignmentLengthMismatch { .. } => "alignment length mismatch",
            SkipReason::StructureUnavailable(_) => "structure unavailable"
        };
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkipReason::ChainCountMismatch { alpha, beta } => write!(f, "num chains for alpha != beta ({} != {})", alpha, beta),
            SkipReason::NoPeptideChains => write!(f, "no peptides"),
            SkipReason::MissingChain(chain) => write!(f, "aligned chain {} not found in structure", chain),
            SkipReason::AlignmentLengthMismatch { sequence_id, expected, found } => write!(f, "aligned chain {} has length {}, expected {}", sequence_id, found, expected),
            SkipReason::StructureUnavailable(message) => write!(f, "structure unavailable: {}", message)
        }
    }
}
