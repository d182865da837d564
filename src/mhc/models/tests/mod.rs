mod fasta_entry;
