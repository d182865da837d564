use std::fs;
use std::path::Path;

use crate::mhc::errors::PipelineError;
use crate::mhc::models::tests::structure::{contact_pdb, write_cif_gz};
use crate::mhc::tasks::pseudosequences::{make_pseudosequences_task, subcommand, PseudosequenceArguments, DEFAULT_CUTOFFS};
use crate::mhc::utility::config::Config;

fn write_alignment(dir: &Path) -> (String, String) {
    let alpha = dir.join("alpha.aligned.fasta");
    let beta = dir.join("beta.aligned.fasta");
    fs::write(&alpha, ">alpha.1 HLA-DRA*01:01\nAC-D\n>alpha.2 HLA-DRA*01:02\nA-CD\n").unwrap();
    fs::write(&beta, ">beta.1 HLA-DRB1*01:01\nEF\n>beta.2 HLA-DRB1*03:01\nEW\n").unwrap();
    return (alpha.to_str().unwrap().to_owned(), beta.to_str().unwrap().to_owned());
}

fn arguments(cli_args: Vec<&str>) -> Result<PseudosequenceArguments, PipelineError> {
    let matches = subcommand().get_matches_from(cli_args);
    return PseudosequenceArguments::from_cli_args(&matches, &Config::new(Path::new("data"), 2));
}

#[test]
pub fn test_defaults() {
    let arguments = arguments(vec!["pseudosequences", "a.fasta", "b.fasta", "--criteria", "0.1", "4", "0.5"]).unwrap();
    assert_eq!(arguments.get_cutoffs(), &DEFAULT_CUTOFFS);
    assert_eq!(arguments.get_pdb_dir(), Path::new("data/pdb"));
    assert_eq!(arguments.get_criteria().len(), 1);
    assert_eq!(arguments.get_min_peptide_length(), 5);
    assert_eq!(arguments.get_max_peptide_length(), 50);
    assert_eq!(arguments.get_thread_count(), 2);
    assert!(arguments.get_reference_alleles().is_none());
}

#[test]
pub fn test_repeated_criteria() {
    let arguments = arguments(vec![
        "pseudosequences", "a.fasta", "b.fasta", "pdb",
        "--criteria", "0.1", "4", "0.5",
        "--criteria", "0.05", "6", "0.2",
        "--reference-structure", "1AQD",
        "--reference-structure", "4X5W"
    ]).unwrap();
    assert_eq!(arguments.get_criteria().len(), 2);
    assert_eq!(arguments.get_criteria()[1].name(), "maf_0.05_and_0.2_within_6.0_angstrom");
    assert_eq!(arguments.get_reference_structures(), &["1AQD".to_owned(), "4X5W".to_owned()]);
    assert_eq!(arguments.get_pdb_dir(), Path::new("pdb"));
}

#[test]
pub fn test_criterion_cutoff_must_be_evaluated() {
    let result = arguments(vec!["pseudosequences", "a.fasta", "b.fasta", "--cutoffs", "2", "4", "--criteria", "0.1", "6", "0.5"]);
    match result {
        Err(PipelineError::Argument(_)) => (),
        _ => panic!("expected an argument error")
    }
}

#[test]
pub fn test_peptide_lengths_must_be_ordered() {
    let result = arguments(vec![
        "pseudosequences", "a.fasta", "b.fasta", "--criteria", "0.1", "4", "0.5",
        "--peptide-chain-min-length", "20", "--peptide-chain-max-length", "10"
    ]);
    assert!(result.is_err());
}

#[test]
pub fn test_run_without_structures() {
    let dir = tempfile::tempdir().unwrap();
    let (alpha, beta) = write_alignment(dir.path());
    let out_csv = dir.path().join("pseudosequences.csv");
    let out_aux_dir = dir.path().join("aux");
    let arguments = arguments(vec![
        "pseudosequences", alpha.as_str(), beta.as_str(), dir.path().to_str().unwrap(),
        "--criteria", "0.1", "2", "0.0",
        "--reference-allele", "HLA-DRA*01:01", "DRB1*0101",
        "--out-csv", out_csv.to_str().unwrap(),
        "--out-aux-dir", out_aux_dir.to_str().unwrap()
    ]).unwrap();
    make_pseudosequences_task(&arguments).unwrap();

    let contents = fs::read_to_string(&out_csv).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, vec![
        "allele,maf_0.1_and_0.0_within_2.0_angstrom,kind",
        "HLA-DRA*01:01,CX,alpha",
        "HLA-DRA*01:02,XC,alpha",
        "HLA-DRB1*01:01,F,beta",
        "HLA-DRB1*03:01,W,beta"
    ]);
    assert!(out_aux_dir.join("aligned_sequences.csv").exists());
    assert_eq!(fs::read_to_string(out_aux_dir.join("contacts.csv")).unwrap().lines().count(), 1);
    let positional = fs::read_to_string(out_aux_dir.join("positional.csv")).unwrap();
    assert!(positional.lines().next().unwrap().ends_with("HLA-DRA*01:01/DRB1*0101 position,HLA-DRA*01:01/DRB1*0101 aa"));
    // header, 4 alpha and 2 beta columns
    assert_eq!(positional.lines().count(), 7);
}

#[test]
pub fn test_unknown_reference_allele() {
    let dir = tempfile::tempdir().unwrap();
    let (alpha, beta) = write_alignment(dir.path());
    let arguments = arguments(vec![
        "pseudosequences", alpha.as_str(), beta.as_str(), dir.path().to_str().unwrap(),
        "--criteria", "0.1", "2", "0.0",
        "--reference-allele", "HLA-DRA*09:99", "HLA-DRB1*01:01"
    ]).unwrap();
    match make_pseudosequences_task(&arguments) {
        Err(PipelineError::UnknownAllele(allele)) => assert_eq!(allele, "HLA-DRA*09:99"),
        _ => panic!("expected an unknown allele error")
    }
}

#[test]
pub fn test_run_with_structure() {
    let dir = tempfile::tempdir().unwrap();
    let alpha = dir.path().join("alpha.aligned.fasta");
    let beta = dir.path().join("beta.aligned.fasta");
    // 2bad has a chain aligned to another length, it is skipped
    fs::write(&alpha, ">alpha.1 HLA-DRA*01:01\n-ACD\n>alpha.2 HLA-DRA*01:02\n-WCE\n>pdb.1abc_A\n-ACD\n>pdb.2bad_A\nACEDQ\n").unwrap();
    fs::write(&beta, ">beta.1 HLA-DRB1*01:01\nEF\n>beta.2 HLA-DRB1*03:01\nQF\n>pdb.1abc_B\nEF\n>pdb.2bad_B\nEF\n").unwrap();
    let pdb_dir = dir.path().join("pdb");
    fs::create_dir(&pdb_dir).unwrap();
    write_cif_gz(&contact_pdb("1abc"), &pdb_dir.join("1abc.cif.gz"));
    let out_csv = dir.path().join("pseudosequences.csv");
    let out_aux_dir = dir.path().join("aux");

    let arguments = arguments(vec![
        "pseudosequences", alpha.to_str().unwrap(), beta.to_str().unwrap(), pdb_dir.to_str().unwrap(),
        "--criteria", "0.1", "4", "0.5",
        "--criteria", "0.1", "6", "0.5",
        "--reference-structure", "1abc",
        "--out-csv", out_csv.to_str().unwrap(),
        "--out-aux-dir", out_aux_dir.to_str().unwrap()
    ]).unwrap();
    make_pseudosequences_task(&arguments).unwrap();

    let contents = fs::read_to_string(&out_csv).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, vec![
        "allele,maf_0.1_and_0.5_within_4.0_angstrom,maf_0.1_and_0.5_within_6.0_angstrom,kind",
        "HLA-DRA*01:01,A,A,alpha",
        "HLA-DRA*01:02,W,W,alpha",
        "HLA-DRB1*01:01,,E,beta",
        "HLA-DRB1*03:01,,Q,beta"
    ]);
    let contacts = fs::read_to_string(out_aux_dir.join("contacts.csv")).unwrap();
    assert_eq!(contacts.lines().count(), 4);
    assert!(contacts.lines().all(|line| !line.contains("2bad")));
    assert!(out_aux_dir.join("1abc.minor_allele_fraction.cif").exists());
    assert!(out_aux_dir.join("1abc.4.0.cif").exists());
    assert!(out_aux_dir.join("1abc.maf_0.1_and_0.5_within_6.0_angstrom.cif").exists());
}
