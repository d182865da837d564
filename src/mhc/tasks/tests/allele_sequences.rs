use std::fs;

use crate::mhc::errors::PipelineError;
use crate::mhc::models::fasta_entry::FastaEntry;
use crate::mhc::tasks::allele_sequences::ReferenceNumberedTable;

fn entries() -> Vec<FastaEntry> {
    return vec![
        FastaEntry::new("alpha.1 HLA-DRA*01:02", "AGC-E"),
        FastaEntry::new("alpha.2 HLA-DRA*01:01", "A-CD-")
    ];
}

#[test]
pub fn test_reference_numbering() {
    let table = ReferenceNumberedTable::new(&entries(), "HLA-DRA*01:01").unwrap();
    assert_eq!(table.get_numbers(), &[1, 2, 3, 4]);
    let reference: Vec<&str> = table.get("HLA-DRA*01:01").unwrap().iter().map(|cell| cell.as_str()).collect();
    assert_eq!(reference, vec!["A", "XC", "D", "X"]);
    let other: Vec<&str> = table.get("HLA-DRA*01:02").unwrap().iter().map(|cell| cell.as_str()).collect();
    assert_eq!(other, vec!["A", "GC", "X", "E"]);
}

#[test]
pub fn test_leading_insertion_goes_to_first_column() {
    let entries = vec![FastaEntry::new("r HLA-DRA*01:01", "-AC")];
    let table = ReferenceNumberedTable::new(&entries, "HLA-DRA*01:01").unwrap();
    assert_eq!(table.get_numbers(), &[1, 2]);
    assert_eq!(table.get("HLA-DRA*01:01").unwrap(), &["XA".to_owned(), "C".to_owned()]);
}

#[test]
pub fn test_unknown_reference() {
    match ReferenceNumberedTable::new(&entries(), "HLA-DRA*09:99") {
        Err(PipelineError::UnknownAllele(allele)) => assert_eq!(allele, "HLA-DRA*09:99"),
        _ => panic!("expected an unknown allele error")
    }
}

#[test]
pub fn test_length_mismatch() {
    let entries = vec![
        FastaEntry::new("r HLA-DRA*01:01", "A-CD"),
        FastaEntry::new("s HLA-DRA*01:02", "ACD")
    ];
    assert!(ReferenceNumberedTable::new(&entries, "HLA-DRA*01:01").is_err());
}

#[test]
pub fn test_write_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("allele_sequences.csv");
    ReferenceNumberedTable::new(&entries(), "HLA-DRA*01:01").unwrap().write_csv(&path).unwrap();
    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(",1,2,3,4"));
    assert_eq!(lines[1], "HLA-DRA*01:01,A,XC,D,X");
    assert_eq!(lines[2], "HLA-DRA*01:02,A,GC,X,E");
}
