pub mod aligned_sequence;
pub mod amino_acids;
pub mod chain_kind;
pub mod contact;
pub mod criterion;
pub mod fasta_entry;
pub mod positional_statistic;
pub mod pseudosequence;
pub mod search_hit;
pub mod structure;
#[cfg(test)]
pub mod tests;
