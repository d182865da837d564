use crate::mhc::models::fasta_entry::FastaEntry;

#[test]
pub fn test_header_tokens() {
    let entry = FastaEntry::new(">HLA00664 HLA-DRA*01:01:01:01 254 bp", "MAISGVPVLG\n");
    assert_eq!(entry.get_id(), "HLA00664");
    assert_eq!(entry.get_description(), "HLA00664 HLA-DRA*01:01:01:01 254 bp");
    assert_eq!(entry.get_description_token(1), Some("HLA-DRA*01:01:01:01"));
    assert_eq!(entry.get_description_token(9), None);
    assert_eq!(entry.len(), 10);
    assert_eq!(entry.to_string(), ">HLA00664 HLA-DRA*01:01:01:01 254 bp\nMAISGVPVLG\n");
}

#[test]
pub fn test_equality() {
    let entry1 = FastaEntry::new(">a1 HLA-DRA*01:01", "ACD");
    let entry2 = FastaEntry::new("a1 HLA-DRA*01:01", "ACD");
    let entry3 = FastaEntry::new("a1 HLA-DRA*01:01", "ACE");
    assert!(entry1 == entry2);
    assert!(entry1 != entry3);
}
