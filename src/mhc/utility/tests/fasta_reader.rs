use std::fs;
use std::io::Cursor;

use crate::mhc::models::fasta_entry::FastaEntry;
use crate::mhc::utility::fasta_reader::{read_fasta, read_fasta_from, write_fasta};

#[test]
pub fn test_multi_line_records() {
    let fasta = ">alpha.1 HLA-DRA*01:01 first\nAC-D\nEF\n\n>alpha.2 HLA-DRA*01:02\nA-CD\nEF\n";
    let entries = read_fasta_from(Cursor::new(fasta), "inline").unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].get_id(), "alpha.1");
    assert_eq!(entries[0].get_sequence(), "AC-DEF");
    assert_eq!(entries[1].get_description_token(1), Some("HLA-DRA*01:02"));
    assert_eq!(entries[1].get_sequence(), "A-CDEF");
}

#[test]
pub fn test_write_and_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.fasta");
    let path = path.to_str().unwrap();
    let entries = vec![
        FastaEntry::new("beta.1 HLA-DRB1*01:01", "EF"),
        FastaEntry::new("beta.2 HLA-DRB1*03:01", "E-")
    ];
    write_fasta(path, &entries).unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), ">beta.1 HLA-DRB1*01:01\nEF\n>beta.2 HLA-DRB1*03:01\nE-\n");
    assert_eq!(read_fasta(path).unwrap(), entries);
}

#[test]
pub fn test_missing_file() {
    assert!(read_fasta("/nonexistent/alpha.fasta").is_err());
}
