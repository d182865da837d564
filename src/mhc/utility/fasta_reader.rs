use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, LineWriter};

use crate::mhc::errors::PipelineError;
use crate::mhc::models::fasta_entry::FastaEntry;

/// Reads all records of a FASTA file in file order.
pub fn read_fasta(fasta_file_path: &str) -> Result<Vec<FastaEntry>, PipelineError> {
    let fasta_file = File::open(fasta_file_path).map_err(|err| PipelineError::io(fasta_file_path, err))?;
    return read_fasta_from(BufReader::new(fasta_file), fasta_file_path);
}

pub fn read_fasta_from<R: BufRead>(reader: R, source_name: &str) -> Result<Vec<FastaEntry>, PipelineError> {
    let mut entries: Vec<FastaEntry> = Vec::new();
    let mut header: String = String::new();
    let mut sequence = String::new();
    for line in reader.lines() {
        let line = line.map_err(|err| PipelineError::io(source_name, err))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !line.starts_with('>') {
            sequence.push_str(line);
        } else {
            if header.len() > 0 {
                entries.push(FastaEntry::new(header.as_str(), sequence.as_str()));
                sequence = String::new();
            }
            header = line.to_owned();
        }
    }
    // last record
    if header.len() > 0 {
        entries.push(FastaEntry::new(header.as_str(), sequence.as_str()));
    }
    return Ok(entries);
}

pub fn write_fasta(fasta_file_path: &str, entries: &[FastaEntry]) -> Result<(), PipelineError> {
    let fasta_file = File::create(fasta_file_path).map_err(|err| PipelineError::io(fasta_file_path, err))?;
    let mut fasta_file = LineWriter::new(fasta_file);
    for entry in entries.iter() {
        fasta_file.write_all(entry.to_string().as_bytes()).map_err(|err| PipelineError::io(fasta_file_path, err))?;
    }
    fasta_file.flush().map_err(|err| PipelineError::io(fasta_file_path, err))?;
    return Ok(());
}
