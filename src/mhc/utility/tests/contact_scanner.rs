use std::collections::{BTreeMap, BTreeSet, HashMap};

use pdbtbx::PDB;

use crate::mhc::errors::{PipelineError, SkipReason};
use crate::mhc::models::aligned_sequence::AlignedSequence;
use crate::mhc::models::chain_kind::ChainKind;
use crate::mhc::models::structure::Structure;
use crate::mhc::models::tests::structure::{build_model, contact_pdb};
use crate::mhc::utility::contact_scanner::{check_chain_records, scan_structure, select_accessions, ContactScanner, ScanOutcome, ScanSettings};
use crate::mhc::utility::structure_reader::StructureSource;

struct InMemorySource {
    structures: HashMap<String, PDB>
}

impl StructureSource for InMemorySource {
    fn load(&self, accession: &str) -> Result<Structure, PipelineError> {
        return match self.structures.get(accession) {
            Some(pdb) => Ok(Structure::from_pdb(accession, pdb.clone())),
            None => Err(PipelineError::Structure {
                path: format!("{}.cif.gz", accession),
                message: "no such file".to_owned()
            })
        };
    }
}

fn contact_structure(accession: &str) -> Structure {
    return Structure::from_pdb(accession, contact_pdb(accession));
}

fn chain_records(accession: &str) -> Vec<AlignedSequence> {
    return vec![
        AlignedSequence::new(format!("pdb.{}_A", accession).as_str(), "", ChainKind::Alpha, "-ACD"),
        AlignedSequence::new(format!("pdb.{}_B", accession).as_str(), "", ChainKind::Beta, "EF")
    ];
}

fn settings() -> ScanSettings {
    return ScanSettings::new(&[6.0, 2.0, 4.0], 5, 50);
}

fn scanned_contacts(outcome: ScanOutcome) -> Vec<(f64, String, usize, char)> {
    return match outcome {
        ScanOutcome::Scanned(scan) => scan.get_contacts().iter()
            .map(|contact| (contact.get_cutoff(), contact.get_mhc_chain().to_owned(), contact.get_aligned_column(), contact.get_residue_code()))
            .collect(),
        ScanOutcome::Skipped(reason) => panic!("unexpected skip: {}", reason)
    };
}

#[test]
pub fn test_settings_sort_cutoffs() {
    let settings = ScanSettings::new(&[6.0, 2.0, 4.0, 2.0], 5, 50);
    assert_eq!(settings.get_cutoffs(), &[2.0, 4.0, 6.0]);
    assert_eq!(settings.max_cutoff(), 6.0);
    assert!(settings.is_peptide_length(5));
    assert!(!settings.is_peptide_length(51));
}

#[test]
pub fn test_first_qualifying_cutoff() {
    let outcome = scan_structure(&contact_structure("1ABC"), &chain_records("1ABC"), &settings()).unwrap();
    let contacts = match outcome {
        ScanOutcome::Scanned(scan) => scan.get_contacts().to_vec(),
        ScanOutcome::Skipped(reason) => panic!("unexpected skip: {}", reason)
    };
    assert_eq!(contacts.len(), 3);
    assert!(contacts.iter().all(|contact| contact.get_peptide_chain() == "P"));
    assert_eq!((contacts[0].get_cutoff(), contacts[0].get_mhc_chain(), contacts[0].get_aligned_column(), contacts[0].get_residue_code()), (2.0, "A", 1, 'A'));
    assert_eq!((contacts[1].get_cutoff(), contacts[1].get_mhc_chain(), contacts[1].get_aligned_column(), contacts[1].get_residue_code()), (4.0, "A", 2, 'C'));
    assert_eq!((contacts[2].get_cutoff(), contacts[2].get_mhc_chain(), contacts[2].get_kind()), (6.0, "B", ChainKind::Beta));
    assert_eq!(contacts[2].get_unaligned_index(), 0);
}

#[test]
pub fn test_cutoff_is_inclusive() {
    // CYS is exactly 3.0 angstrom from the closest peptide atom
    let contacts = scanned_contacts(scan_structure(&contact_structure("1ABC"), &chain_records("1ABC"), &ScanSettings::new(&[3.0], 5, 50)).unwrap());
    assert_eq!(contacts, vec![(3.0, "A".to_owned(), 1, 'A'), (3.0, "A".to_owned(), 2, 'C')]);
}

#[test]
pub fn test_only_first_model_is_scanned() {
    let mut pdb = contact_pdb("1ABC");
    pdb.add_model(build_model(2, &[
        ("A", vec![
            ("ALA", vec![(1.5, 0.0, 0.0)]),
            ("CYS", vec![(3.0, 0.0, 0.0)]),
            ("ASP", vec![(1.0, 0.0, 0.0)])
        ]),
        ("P", (0..5).map(|z| ("GLY", vec![(0.0, 0.0, z as f64)])).collect())
    ]));
    let contacts = scanned_contacts(scan_structure(&Structure::from_pdb("1ABC", pdb), &chain_records("1ABC"), &settings()).unwrap());
    assert_eq!(contacts.len(), 3);
    assert!(contacts.iter().all(|contact| contact.3 != 'D'));
}

#[test]
pub fn test_residue_recorded_once_per_peptide() {
    let outcome = scan_structure(&contact_structure("1ABC"), &chain_records("1ABC"), &ScanSettings::new(&[2.0, 4.0, 6.0, 8.0, 10.0], 5, 50)).unwrap();
    if let ScanOutcome::Scanned(scan) = outcome {
        let mut seen: BTreeSet<(String, String, usize)> = BTreeSet::new();
        for contact in scan.get_contacts().iter() {
            assert!(seen.insert((contact.get_peptide_chain().to_owned(), contact.get_mhc_chain().to_owned(), contact.get_unaligned_index())));
        }
    } else {
        panic!("structure was skipped");
    }
}

#[test]
pub fn test_integrity_violation() {
    let records = vec![
        AlignedSequence::new("pdb.1ABC_A", "", ChainKind::Alpha, "-AWD"),
        AlignedSequence::new("pdb.1ABC_B", "", ChainKind::Beta, "EF")
    ];
    match scan_structure(&contact_structure("1ABC"), &records, &settings()) {
        Err(PipelineError::IntegrityViolation { accession, .. }) => assert_eq!(accession, "1ABC"),
        _ => panic!("expected an integrity violation")
    }
}

#[test]
pub fn test_chain_count_mismatch() {
    let records = vec![
        AlignedSequence::new("pdb.1ABC_A", "", ChainKind::Alpha, "-ACD"),
        AlignedSequence::new("pdb.1ABC_C", "", ChainKind::Alpha, "-ACD"),
        AlignedSequence::new("pdb.1ABC_B", "", ChainKind::Beta, "EF")
    ];
    assert_eq!(check_chain_records(&records, &settings()), Some(SkipReason::ChainCountMismatch { alpha: 2, beta: 1 }));
    match scan_structure(&contact_structure("1ABC"), &records, &settings()).unwrap() {
        ScanOutcome::Skipped(reason) => assert_eq!(reason.to_string(), "num chains for alpha != beta (2 != 1)"),
        ScanOutcome::Scanned(_) => panic!("expected a skip")
    }
}

#[test]
pub fn test_structure_chain_of_other_length() {
    let mut aligned_lengths: BTreeMap<ChainKind, usize> = BTreeMap::new();
    aligned_lengths.insert(ChainKind::Alpha, 4);
    aligned_lengths.insert(ChainKind::Beta, 2);
    let settings = settings().with_aligned_lengths(&aligned_lengths);
    assert_eq!(check_chain_records(&chain_records("1ABC"), &settings), None);

    let records = vec![
        AlignedSequence::new("pdb.1AQD_A", "", ChainKind::Alpha, "ACEDQ"),
        AlignedSequence::new("pdb.1AQD_B", "", ChainKind::Beta, "EF")
    ];
    let reason = check_chain_records(&records, &settings).unwrap();
    assert_eq!(reason, SkipReason::AlignmentLengthMismatch { sequence_id: "pdb.1AQD_A".to_owned(), expected: 4, found: 5 });
    assert_eq!(reason.key(), "alignment length mismatch");
    match scan_structure(&contact_structure("1AQD"), &records, &settings).unwrap() {
        ScanOutcome::Skipped(skipped) => assert_eq!(skipped, reason),
        ScanOutcome::Scanned(_) => panic!("expected a skip")
    }
}

#[test]
pub fn test_missing_chain_and_no_peptides() {
    let records = vec![
        AlignedSequence::new("pdb.1ABC_Q", "", ChainKind::Alpha, "-ACD"),
        AlignedSequence::new("pdb.1ABC_B", "", ChainKind::Beta, "EF")
    ];
    match scan_structure(&contact_structure("1ABC"), &records, &settings()).unwrap() {
        ScanOutcome::Skipped(reason) => assert_eq!(reason, SkipReason::MissingChain("Q".to_owned())),
        ScanOutcome::Scanned(_) => panic!("expected a skip")
    }
    match scan_structure(&contact_structure("1ABC"), &chain_records("1ABC"), &ScanSettings::new(&[2.0], 10, 50)).unwrap() {
        ScanOutcome::Skipped(reason) => assert_eq!(reason, SkipReason::NoPeptideChains),
        ScanOutcome::Scanned(_) => panic!("expected a skip")
    }
}

#[test]
pub fn test_scanner_merges_in_accession_order() {
    let mut structures: HashMap<String, PDB> = HashMap::new();
    for accession in ["2XYZ", "1ABC", "5LEN"].iter() {
        structures.insert(accession.to_string(), contact_pdb(accession));
    }
    let mut records_by_accession: BTreeMap<String, Vec<AlignedSequence>> = BTreeMap::new();
    records_by_accession.insert("2XYZ".to_owned(), chain_records("2XYZ"));
    records_by_accession.insert("1ABC".to_owned(), chain_records("1ABC"));
    // no structure file
    records_by_accession.insert("3NOP".to_owned(), chain_records("3NOP"));
    let mut mismatched = chain_records("4MIS");
    mismatched.push(AlignedSequence::new("pdb.4MIS_C", "", ChainKind::Alpha, "-ACD"));
    records_by_accession.insert("4MIS".to_owned(), mismatched);
    records_by_accession.insert("5LEN".to_owned(), vec![
        AlignedSequence::new("pdb.5LEN_A", "", ChainKind::Alpha, "ACD"),
        AlignedSequence::new("pdb.5LEN_B", "", ChainKind::Beta, "EF")
    ]);
    let mut aligned_lengths: BTreeMap<ChainKind, usize> = BTreeMap::new();
    aligned_lengths.insert(ChainKind::Alpha, 4);
    aligned_lengths.insert(ChainKind::Beta, 2);

    let single = ContactScanner::new(InMemorySource { structures: structures.clone() }, settings().with_aligned_lengths(&aligned_lengths), 1)
        .scan(records_by_accession.clone())
        .unwrap();
    let pooled = ContactScanner::new(InMemorySource { structures: structures }, settings().with_aligned_lengths(&aligned_lengths), 4)
        .scan(records_by_accession)
        .unwrap();

    assert_eq!(single.get_scanned(), &["1ABC".to_owned(), "2XYZ".to_owned()]);
    assert_eq!(single.get_contacts(), pooled.get_contacts());
    assert_eq!(single.get_contacts().len(), 6);
    assert_eq!(single.get_contacts()[0].get_accession(), "1ABC");
    assert!(single.was_scanned("2XYZ"));
    assert!(!single.was_scanned("3NOP"));
    let skip_counts = pooled.skip_counts();
    assert_eq!(skip_counts.get("structure unavailable"), Some(&1));
    assert_eq!(skip_counts.get("chain count mismatch"), Some(&1));
    assert_eq!(skip_counts.get("alignment length mismatch"), Some(&1));
}

#[test]
pub fn test_select_accessions() {
    let accessions: Vec<String> = (0..20).map(|i| format!("{}ABC", i)).collect();
    assert_eq!(select_accessions(&accessions, None, &[], None), accessions);
    assert_eq!(select_accessions(&accessions, Some(50), &[], None), accessions);

    let first = select_accessions(&accessions, Some(5), &[], Some(7));
    let second = select_accessions(&accessions, Some(5), &[], Some(7));
    assert_eq!(first.len(), 5);
    assert_eq!(first, second);

    let references = vec!["19ABC".to_owned(), "unknown".to_owned()];
    let with_reference = select_accessions(&accessions, Some(1), &references, Some(7));
    assert!(with_reference.contains(&"19ABC".to_owned()));
    assert!(!with_reference.contains(&"unknown".to_owned()));
    assert!(with_reference.len() <= 2);
}
