use std::collections::{BTreeMap, HashMap};

use crate::mhc::models::aligned_sequence::AlignedSequence;
use crate::mhc::models::chain_kind::ChainKind;
use crate::mhc::models::criterion::Criterion;
use crate::mhc::models::positional_statistic::{PositionalStatistic, PositionalTable};
use crate::mhc::models::tests::structure::{contact_pdb, write_cif_gz};
use crate::mhc::utility::contact_scanner::{ContactScanner, ScanSettings};
use crate::mhc::utility::structure_reader::{open_pdb, CifDirectory};
use crate::mhc::utility::visualization::{export_reference_structures, statistic_tracks};

#[test]
pub fn test_statistic_tracks() {
    let mut table = PositionalTable::new(
        vec![2.0, 4.0],
        vec![
            PositionalStatistic::new(ChainKind::Alpha, 0, 'A', 0.0, vec![0.0, 0.5]),
            PositionalStatistic::new(ChainKind::Beta, 3, 'E', 0.5, vec![0.25, 0.75])
        ]
    );
    table.add_criterion(Criterion::new(0.1, 4.0, 0.5)).unwrap();
    let tracks = statistic_tracks(&table);
    let names: Vec<&str> = tracks.iter().map(|track| track.get_name()).collect();
    assert_eq!(names, vec!["minor_allele_fraction", "2.0", "4.0", "maf_0.1_and_0.5_within_4.0_angstrom"]);
    assert_eq!(tracks[0].get(ChainKind::Beta, 3), Some(0.5));
    assert_eq!(tracks[2].get(ChainKind::Alpha, 0), Some(0.5));
    assert_eq!(tracks[3].get(ChainKind::Alpha, 0), Some(0.0));
    assert_eq!(tracks[3].get(ChainKind::Beta, 3), Some(1.0));
    assert_eq!(tracks[1].get(ChainKind::Beta, 0), None);
}

#[test]
pub fn test_export_reference_structures() {
    let dir = tempfile::tempdir().unwrap();
    write_cif_gz(&contact_pdb("1abc"), &dir.path().join("1abc.cif.gz"));
    let mut chain_records_by_accession: BTreeMap<String, Vec<AlignedSequence>> = BTreeMap::new();
    chain_records_by_accession.insert("1abc".to_owned(), vec![
        AlignedSequence::new("pdb.1abc_A", "", ChainKind::Alpha, "-ACD"),
        AlignedSequence::new("pdb.1abc_B", "", ChainKind::Beta, "EF")
    ]);
    let report = ContactScanner::new(CifDirectory::new(dir.path()), ScanSettings::new(&[4.0], 5, 50), 1)
        .scan(chain_records_by_accession.clone())
        .unwrap();
    let table = PositionalTable::new(
        vec![4.0],
        vec![
            PositionalStatistic::new(ChainKind::Alpha, 1, 'A', 0.25, vec![1.0]),
            PositionalStatistic::new(ChainKind::Alpha, 2, 'C', 0.5, vec![1.0]),
            PositionalStatistic::new(ChainKind::Beta, 0, 'E', 0.75, vec![0.0])
        ]
    );
    let out_dir = dir.path().join("aux");
    std::fs::create_dir(&out_dir).unwrap();

    let references = vec!["1abc".to_owned(), "2xyz".to_owned()];
    let written = export_reference_structures(&CifDirectory::new(dir.path()), &references, &report, &chain_records_by_accession, &table, &out_dir).unwrap();
    assert_eq!(written, vec![out_dir.join("1abc.minor_allele_fraction.cif"), out_dir.join("1abc.4.0.cif")]);

    let pdb = open_pdb(&written[0]).unwrap();
    let mut b_factors: HashMap<(String, isize), f64> = HashMap::new();
    for chain in pdb.chains() {
        for residue in chain.residues() {
            for atom in residue.atoms() {
                b_factors.insert((chain.id().to_owned(), residue.serial_number()), atom.b_factor());
            }
        }
    }
    assert_eq!(b_factors[&("A".to_owned(), 1)], 25.0);
    assert_eq!(b_factors[&("A".to_owned(), 2)], 50.0);
    assert_eq!(b_factors[&("A".to_owned(), 3)], 0.0);
    // water
    assert_eq!(b_factors[&("A".to_owned(), 4)], 0.0);
    assert_eq!(b_factors[&("B".to_owned(), 1)], 75.0);
    assert_eq!(b_factors[&("B".to_owned(), 2)], 0.0);
    assert_eq!(b_factors[&("P".to_owned(), 1)], 0.0);

    let contact_track = open_pdb(&written[1]).unwrap();
    let alpha_b_factors: Vec<f64> = contact_track.chains().next().unwrap().atoms().map(|atom| atom.b_factor()).collect();
    assert_eq!(alpha_b_factors, vec![100.0, 100.0, 100.0, 0.0, 0.0]);
}
