mod config;
mod contact_scanner;
mod fasta_reader;
mod visualization;
