pub mod allele_name;
pub mod config;
pub mod contact_scanner;
pub mod csv_output;
pub mod fasta_reader;
pub mod logger;
pub mod pseudosequence_selector;
pub mod statistics;
pub mod structure_reader;
pub mod visualization;
#[cfg(test)]
mod tests;
