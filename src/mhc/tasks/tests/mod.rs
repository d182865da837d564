mod allele_sequences;
mod pseudosequences;
