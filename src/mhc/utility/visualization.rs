//! Reference structures with positional statistics in the B-factor column,
//! for coloring by value in a molecular viewer.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use log::{info, warn};
use pdbtbx::{StrictnessLevel, PDB};

use crate::mhc::errors::PipelineError;
use crate::mhc::models::aligned_sequence::AlignedSequence;
use crate::mhc::models::amino_acids::amino_acid::AminoAcid;
use crate::mhc::models::chain_kind::ChainKind;
use crate::mhc::models::criterion::format_float;
use crate::mhc::models::positional_statistic::PositionalTable;
use crate::mhc::utility::contact_scanner::ScanReport;
use crate::mhc::utility::structure_reader::CifDirectory;

pub const MINOR_ALLELE_FRACTION: &str = "minor_allele_fraction";
const B_FACTOR_SCALE: f64 = 100.0;

/// One quantitative column of the positional table, keyed by (kind, aligned column).
pub struct StatisticTrack {
    name: String,
    values: HashMap<(ChainKind, usize), f64>
}

impl StatisticTrack {
    pub fn get_name(&self) -> &str {
        return self.name.as_str();
    }

    pub fn get(&self, kind: ChainKind, aligned_column: usize) -> Option<f64> {
        return self.values.get(&(kind, aligned_column)).cloned();
    }
}

/// Minor allele fraction, one track per cutoff and one per criterion (flags as 0 or 1).
/// Track names match the positional.csv header.
pub fn statistic_tracks(table: &PositionalTable) -> Vec<StatisticTrack> {
    let mut tracks: Vec<StatisticTrack> = Vec::new();
    let rows = table.get_rows();
    tracks.push(StatisticTrack {
        name: MINOR_ALLELE_FRACTION.to_owned(),
        values: rows.iter().map(|row| ((row.get_kind(), row.get_aligned_column()), row.get_minor_allele_fraction())).collect()
    });
    for (cutoff_index, cutoff) in table.get_cutoffs().iter().enumerate() {
        tracks.push(StatisticTrack {
            name: format_float(*cutoff),
            values: rows.iter().map(|row| ((row.get_kind(), row.get_aligned_column()), row.get_contact_fractions()[cutoff_index])).collect()
        });
    }
    for (criterion_index, criterion) in table.get_criteria().iter().enumerate() {
        tracks.push(StatisticTrack {
            name: criterion.name(),
            values: rows.iter()
                .map(|row| {
                    let flag = row.get_criteria_flags().get(criterion_index).cloned().unwrap_or(false);
                    ((row.get_kind(), row.get_aligned_column()), if flag { 1.0 } else { 0.0 })
                })
                .collect()
        });
    }
    return tracks;
}

/// Writes `{accession}.{track}.cif` for every requested reference structure which was scanned.
/// Returns the written files.
pub fn export_reference_structures(
    directory: &CifDirectory,
    reference_structures: &[String],
    report: &ScanReport,
    chain_records_by_accession: &BTreeMap<String, Vec<AlignedSequence>>,
    table: &PositionalTable,
    out_dir: &Path
) -> Result<Vec<PathBuf>, PipelineError> {
    let tracks = statistic_tracks(table);
    let mut written: Vec<PathBuf> = Vec::new();
    for accession in reference_structures.iter() {
        let chain_records = match chain_records_by_accession.get(accession) {
            Some(chain_records) if report.was_scanned(accession) => chain_records,
            _ => {
                warn!("No info for reference structure {}", accession);
                continue;
            }
        };
        let mut pdb = directory.load_pdb(accession)?;
        for track in tracks.iter() {
            apply_track(&mut pdb, chain_records, track);
            let out_file = out_dir.join(format!("{}.{}.cif", accession, track.get_name()));
            let out_file_display = out_file.display().to_string();
            if let Err(errors) = pdbtbx::save(&pdb, out_file_display.as_str(), StrictnessLevel::Loose) {
                return Err(PipelineError::Structure {
                    path: out_file_display,
                    message: errors.iter().map(|err| err.to_string()).collect::<Vec<String>>().join("; ")
                });
            }
            info!("Wrote {}", out_file_display);
            written.push(out_file);
        }
    }
    return Ok(written);
}

/// Resets every B-factor to zero, then sets `value * 100` on all atoms of MHC residues
/// whose aligned column has a value. Residues are counted the way structures are read:
/// amino acids of the first model only.
fn apply_track(pdb: &mut PDB, chain_records: &[AlignedSequence], track: &StatisticTrack) {
    for atom in pdb.atoms_mut() {
        let _ = atom.set_b_factor(0.0);
    }
    let model = match pdb.models_mut().next() {
        Some(model) => model,
        None => return
    };
    for chain in model.chains_mut() {
        let chain_id = chain.id().to_owned();
        let record = match chain_records.iter().find(|record| record.get_chain_id() == Some(chain_id.as_str())) {
            Some(record) => record,
            None => continue
        };
        let mut residue_index: usize = 0;
        for residue in chain.residues_mut() {
            let is_amino_acid = residue.name().and_then(AminoAcid::from_residue_name).is_some();
            if !is_amino_acid {
                continue;
            }
            let value = record.get_position_map().to_aligned(residue_index)
                .and_then(|column| track.get(record.get_kind(), column));
            residue_index += 1;
            if let Some(value) = value {
                for atom in residue.atoms_mut() {
                    let _ = atom.set_b_factor(value * B_FACTOR_SCALE);
                }
            }
        }
    }
}
