pub mod amino_acid;
