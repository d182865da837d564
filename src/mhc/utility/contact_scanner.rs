use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::mpsc;
use std::sync::Arc;

use log::{debug, info, warn};
use pdbtbx::{ContainsAtomConformer, ContainsAtomConformerResidue, ContainsAtomConformerResidueChain, ContainsAtomConformerResidueChainModel};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use threadpool::ThreadPool;

use crate::mhc::errors::{PipelineError, SkipReason};
use crate::mhc::models::aligned_sequence::AlignedSequence;
use crate::mhc::models::chain_kind::ChainKind;
use crate::mhc::models::contact::Contact;
use crate::mhc::models::structure::{ResidueKey, Structure};
use crate::mhc::utility::structure_reader::StructureSource;

#[derive(Debug, Clone)]
pub struct ScanSettings {
    cutoffs: Vec<f64>,
    min_peptide_length: usize,
    max_peptide_length: usize,
    aligned_lengths: BTreeMap<ChainKind, usize>
}

impl ScanSettings {
    /// Cutoffs are sorted ascending and deduplicated.
    pub fn new(cutoffs: &[f64], min_peptide_length: usize, max_peptide_length: usize) -> Self {
        let mut cutoffs: Vec<f64> = cutoffs.iter().cloned().filter(|cutoff| cutoff.is_finite()).collect();
        cutoffs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        cutoffs.dedup();
        return Self {
            cutoffs: cutoffs,
            min_peptide_length: min_peptide_length,
            max_peptide_length: max_peptide_length,
            aligned_lengths: BTreeMap::new()
        };
    }

    /// Expected aligned length per kind. Structure chains of another length are skipped.
    pub fn with_aligned_lengths(mut self, aligned_lengths: &BTreeMap<ChainKind, usize>) -> Self {
        self.aligned_lengths = aligned_lengths.clone();
        return self;
    }

    pub fn get_cutoffs(&self) -> &[f64] {
        return &self.cutoffs;
    }

    pub fn max_cutoff(&self) -> f64 {
        return self.cutoffs.last().cloned().unwrap_or(0.0);
    }

    pub fn is_peptide_length(&self, length: usize) -> bool {
        return length >= self.min_peptide_length && length <= self.max_peptide_length;
    }
}

/// Result of scanning one structure which was not skipped.
#[derive(Debug, Clone)]
pub struct StructureScan {
    peptide_chains: Vec<String>,
    contacts: Vec<Contact>
}

impl StructureScan {
    pub fn get_contacts(&self) -> &[Contact] {
        return &self.contacts;
    }
}

#[derive(Debug, Clone)]
pub enum ScanOutcome {
    Scanned(StructureScan),
    Skipped(SkipReason)
}

/// Merged outcome of a scan over many structures, ordered by accession.
#[derive(Debug, Default)]
pub struct ScanReport {
    contacts: Vec<Contact>,
    scanned: Vec<String>,
    skipped: Vec<(String, SkipReason)>
}

impl ScanReport {
    pub fn get_contacts(&self) -> &[Contact] {
        return &self.contacts;
    }

    pub fn get_scanned(&self) -> &[String] {
        return &self.scanned;
    }

    pub fn was_scanned(&self, accession: &str) -> bool {
        return self.scanned.iter().any(|scanned| scanned == accession);
    }

    /// Number of skipped structures per reason.
    pub fn skip_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for (_, reason) in self.skipped.iter() {
            *counts.entry(reason.key()).or_insert(0) += 1;
        }
        return counts;
    }

    fn push(&mut self, accession: String, outcome: ScanOutcome) {
        match outcome {
            ScanOutcome::Scanned(scan) => {
                debug!("{}: {} contacts with peptide chains {}", accession, scan.contacts.len(), scan.peptide_chains.join(", "));
                self.contacts.extend(scan.contacts);
                self.scanned.push(accession);
            },
            ScanOutcome::Skipped(reason) => {
                warn!("Skipping {} because {}", accession, reason);
                self.skipped.push((accession, reason));
            }
        }
    }
}

/// Checks which need only the aligned chain records, done before a structure file is opened:
/// as many alpha as beta chains, and every chain aligned to the length of the panel of its kind.
pub fn check_chain_records(chain_records: &[AlignedSequence], settings: &ScanSettings) -> Option<SkipReason> {
    let alpha = chain_records.iter().filter(|record| record.get_kind() == ChainKind::Alpha).count();
    let beta = chain_records.iter().filter(|record| record.get_kind() == ChainKind::Beta).count();
    if alpha != beta {
        return Some(SkipReason::ChainCountMismatch { alpha: alpha, beta: beta });
    }
    for record in chain_records.iter() {
        if let Some(expected) = settings.aligned_lengths.get(&record.get_kind()) {
            if *expected != record.aligned_len() {
                return Some(SkipReason::AlignmentLengthMismatch {
                    sequence_id: record.get_sequence_id().to_owned(),
                    expected: *expected,
                    found: record.aligned_len()
                });
            }
        }
    }
    return None;
}

/// Finds MHC residues near the peptide chains of one structure.
///
/// Neighbors are looked up in an R-tree over all atoms at the largest cutoff, keeping the
/// smallest distance per residue. Cutoffs are then processed in ascending order per peptide
/// chain and a residue is only recorded at the first cutoff it qualifies for. Every recorded
/// residue is checked against the aligned chain record; a mismatch is an integrity violation.
pub fn scan_structure(structure: &Structure, chain_records: &[AlignedSequence], settings: &ScanSettings) -> Result<ScanOutcome, PipelineError> {
    if let Some(reason) = check_chain_records(chain_records, settings) {
        return Ok(ScanOutcome::Skipped(reason));
    }
    let accession = structure.get_accession();
    let chains = structure.get_chains();

    // structure chain index -> aligned record of an MHC chain
    let mut mhc_chains: HashMap<usize, &AlignedSequence> = HashMap::new();
    for record in chain_records.iter() {
        let chain_id = record.get_chain_id().unwrap_or("");
        match chains.iter().position(|chain| chain.get_id() == chain_id) {
            Some(chain_index) => { mhc_chains.insert(chain_index, record); },
            None => return Ok(ScanOutcome::Skipped(SkipReason::MissingChain(chain_id.to_owned())))
        }
    }

    let peptide_chain_indices: Vec<usize> = chains.iter().enumerate()
        .filter(|(_, chain)| settings.is_peptide_length(chain.len()))
        .map(|(chain_index, _)| chain_index)
        .collect();
    if peptide_chain_indices.is_empty() {
        return Ok(ScanOutcome::Skipped(SkipReason::NoPeptideChains));
    }

    let tree = structure.get_pdb().create_hierarchy_rtree();
    let max_cutoff_sq = settings.max_cutoff() * settings.max_cutoff();
    let mut contacts: Vec<Contact> = Vec::new();
    for peptide_chain_index in peptide_chain_indices.iter() {
        let peptide_chain = &chains[*peptide_chain_index];
        // smallest squared distance of every residue of other chains to any peptide atom
        let mut min_distance_sq: BTreeMap<ResidueKey, f64> = BTreeMap::new();
        for residue in peptide_chain.get_residues().iter() {
            for position in residue.get_atoms().iter() {
                for neighbor in tree.locate_within_distance(*position, max_cutoff_sq) {
                    if Some(neighbor.model().serial_number()) != structure.get_model_serial_number() {
                        continue;
                    }
                    let residue_key = match structure.residue_key(neighbor.chain().id(), neighbor.residue().id()) {
                        Some(residue_key) if residue_key.0 != *peptide_chain_index => residue_key,
                        _ => continue
                    };
                    let distance_sq = squared_distance(position, &neighbor.atom().pos());
                    let known = min_distance_sq.entry(residue_key).or_insert(distance_sq);
                    if distance_sq < *known {
                        *known = distance_sq;
                    }
                }
            }
        }

        let mut seen: BTreeSet<ResidueKey> = BTreeSet::new();
        for cutoff in settings.get_cutoffs().iter() {
            let cutoff_sq = cutoff * cutoff;
            let nearby: Vec<ResidueKey> = min_distance_sq.iter()
                .filter(|(residue_key, distance_sq)| **distance_sq <= cutoff_sq && !seen.contains(*residue_key))
                .map(|(residue_key, _)| *residue_key)
                .collect();
            seen.extend(nearby.iter().cloned());
            for (chain_index, residue_index) in nearby.into_iter() {
                let record = match mhc_chains.get(&chain_index) {
                    Some(record) => *record,
                    None => continue
                };
                let residue_code = chains[chain_index].get_residues()[residue_index].get_code();
                let aligned_column = check_residue(accession, record, residue_index, residue_code)?;
                contacts.push(Contact::new(
                    accession,
                    *cutoff,
                    peptide_chain.get_id(),
                    chains[chain_index].get_id(),
                    record.get_kind(),
                    residue_index,
                    aligned_column,
                    residue_code
                ));
            }
        }
    }

    return Ok(ScanOutcome::Scanned(StructureScan {
        peptide_chains: peptide_chain_indices.iter().map(|index| chains[*index].get_id().to_owned()).collect(),
        contacts: contacts
    }));
}

fn squared_distance(a: &(f64, f64, f64), b: &(f64, f64, f64)) -> f64 {
    return (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2) + (a.2 - b.2).powi(2);
}

/// Verifies the structure residue against the ungapped and the aligned sequence of its chain record.
/// Returns the aligned column of the residue.
pub fn check_residue(accession: &str, record: &AlignedSequence, residue_index: usize, residue_code: char) -> Result<usize, PipelineError> {
    let unaligned_code = match record.get_unaligned().get(residue_index) {
        Some(code) => *code,
        None => return Err(PipelineError::integrity(accession, format!(
            "residue {} of {} is beyond its aligned sequence of {} residues",
            residue_index, record.get_sequence_id(), record.get_unaligned().len()
        )))
    };
    if unaligned_code != residue_code {
        return Err(PipelineError::integrity(accession, format!(
            "residue {} of {} is {} in the structure but {} in the sequence",
            residue_index, record.get_sequence_id(), residue_code, unaligned_code
        )));
    }
    let aligned_column = match record.get_position_map().to_aligned(residue_index) {
        Some(column) => column,
        None => return Err(PipelineError::integrity(accession, format!(
            "residue {} of {} has no aligned column", residue_index, record.get_sequence_id()
        )))
    };
    let aligned_code = record.get_aligned()[aligned_column];
    if aligned_code != residue_code {
        return Err(PipelineError::integrity(accession, format!(
            "residue {} of {} is {} in the structure but {} at aligned column {}",
            residue_index, record.get_sequence_id(), residue_code, aligned_code, aligned_column
        )));
    }
    return Ok(aligned_column);
}

/// Picks the accessions to scan: a random subsample of at most `subsample` accessions
/// plus every requested reference structure that is known.
pub fn select_accessions(accessions: &[String], subsample: Option<usize>, reference_structures: &[String], seed: Option<u64>) -> Vec<String> {
    let count = match subsample {
        Some(count) if count < accessions.len() => count,
        _ => return accessions.to_vec()
    };
    let mut rng: StdRng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy()
    };
    let mut selected: BTreeSet<String> = accessions.choose_multiple(&mut rng, count).cloned().collect();
    for reference in reference_structures.iter() {
        if accessions.contains(reference) {
            selected.insert(reference.clone());
        }
    }
    return selected.into_iter().collect();
}

/// Scans structures on a thread pool. Every task owns its result; results are merged
/// in accession order once all tasks are done, so the report does not depend on the
/// number of threads. The first fatal error (by accession) is returned.
pub struct ContactScanner<S: StructureSource + 'static> {
    source: Arc<S>,
    settings: Arc<ScanSettings>,
    thread_count: usize
}

impl<S: StructureSource + 'static> ContactScanner<S> {
    pub fn new(source: S, settings: ScanSettings, thread_count: usize) -> Self {
        return Self {
            source: Arc::new(source),
            settings: Arc::new(settings),
            thread_count: if thread_count > 0 { thread_count } else { 1 }
        };
    }

    pub fn get_settings(&self) -> &ScanSettings {
        return &self.settings;
    }

    pub fn scan(&self, chain_records_by_accession: BTreeMap<String, Vec<AlignedSequence>>) -> Result<ScanReport, PipelineError> {
        let start_time: f64 = time::precise_time_s();
        let thread_pool = ThreadPool::new(self.thread_count);
        let (sender, receiver) = mpsc::channel::<(String, Result<ScanOutcome, PipelineError>)>();
        let number_of_structures = chain_records_by_accession.len();
        for (accession, chain_records) in chain_records_by_accession.into_iter() {
            let sender = sender.clone();
            let source_ptr = self.source.clone();
            let settings_ptr = self.settings.clone();
            thread_pool.execute(move || {
                let outcome = scan_accession(source_ptr.as_ref(), &accession, &chain_records, settings_ptr.as_ref());
                // the receiver only goes away if the main thread is gone
                let _ = sender.send((accession, outcome));
            });
        }
        drop(sender);
        let mut outcomes: Vec<(String, Result<ScanOutcome, PipelineError>)> = receiver.iter().collect();
        thread_pool.join();
        outcomes.sort_by(|a, b| a.0.cmp(&b.0));

        let mut report = ScanReport::default();
        for (accession, outcome) in outcomes.into_iter() {
            report.push(accession, outcome?);
        }
        info!(
            "Scanned {} / {} structures in {:.1}s, {} contacts",
            report.get_scanned().len(),
            number_of_structures,
            time::precise_time_s() - start_time,
            report.get_contacts().len()
        );
        for (reason, count) in report.skip_counts().iter() {
            info!("Skipped {} structures: {}", count, reason);
        }
        return Ok(report);
    }
}

fn scan_accession<S: StructureSource>(source: &S, accession: &str, chain_records: &[AlignedSequence], settings: &ScanSettings) -> Result<ScanOutcome, PipelineError> {
    // mismatched entries are never opened
    if let Some(reason) = check_chain_records(chain_records, settings) {
        return Ok(ScanOutcome::Skipped(reason));
    }
    let structure = match source.load(accession) {
        Ok(structure) => structure,
        Err(err) => match err {
            PipelineError::Io { .. } | PipelineError::Structure { .. } => return Ok(ScanOutcome::Skipped(SkipReason::StructureUnavailable(err.to_string()))),
            _ => return Err(err)
        }
    };
    return scan_structure(&structure, chain_records, settings);
}
