use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use pdbtbx::{StrictnessLevel, PDB};

use crate::mhc::errors::PipelineError;
use crate::mhc::models::structure::Structure;

const STRUCTURE_FILE_SUFFIX: &str = ".cif.gz";

/// Something structures can be loaded from by accession. Shared between the scan workers.
pub trait StructureSource: Send + Sync {
    fn load(&self, accession: &str) -> Result<Structure, PipelineError>;
}

/// Directory of gzipped mmCIF files named `<accession>.cif.gz`.
pub struct CifDirectory {
    pdb_dir: PathBuf
}

impl CifDirectory {
    pub fn new(pdb_dir: &Path) -> Self {
        return Self {
            pdb_dir: pdb_dir.to_path_buf()
        };
    }

    pub fn structure_path(&self, accession: &str) -> PathBuf {
        return self.pdb_dir.join(format!("{}{}", accession, STRUCTURE_FILE_SUFFIX));
    }

    /// Accessions of all structure files in the directory, sorted.
    pub fn accessions(&self) -> Result<Vec<String>, PipelineError> {
        let dir_display = self.pdb_dir.display().to_string();
        let mut accessions: Vec<String> = Vec::new();
        for dir_entry in fs::read_dir(&self.pdb_dir).map_err(|err| PipelineError::io(&dir_display, err))? {
            let dir_entry = dir_entry.map_err(|err| PipelineError::io(&dir_display, err))?;
            let file_name = dir_entry.file_name().to_string_lossy().into_owned();
            if file_name.ends_with(STRUCTURE_FILE_SUFFIX) {
                accessions.push(file_name.trim_end_matches(STRUCTURE_FILE_SUFFIX).to_owned());
            }
        }
        accessions.sort();
        return Ok(accessions);
    }

    pub fn load_pdb(&self, accession: &str) -> Result<PDB, PipelineError> {
        return open_pdb(&self.structure_path(accession));
    }
}

impl StructureSource for CifDirectory {
    fn load(&self, accession: &str) -> Result<Structure, PipelineError> {
        let pdb = self.load_pdb(accession)?;
        return Ok(Structure::from_pdb(accession, pdb));
    }
}

fn read_to_string(path: &Path) -> Result<String, PipelineError> {
    let path_display = path.display().to_string();
    let mut file = File::open(path).map_err(|err| PipelineError::io(&path_display, err))?;
    let mut contents = String::new();
    if path_display.ends_with(".gz") {
        GzDecoder::new(file).read_to_string(&mut contents).map_err(|err| PipelineError::io(&path_display, err))?;
    } else {
        file.read_to_string(&mut contents).map_err(|err| PipelineError::io(&path_display, err))?;
    }
    return Ok(contents);
}

/// Opens a (possibly gzipped) mmCIF file.
pub fn open_pdb(path: &Path) -> Result<PDB, PipelineError> {
    let contents = read_to_string(path)?;
    return match pdbtbx::open_mmcif_raw(&contents, StrictnessLevel::Loose) {
        Ok((pdb, _warnings)) => Ok(pdb),
        Err(errors) => Err(PipelineError::Structure {
            path: path.display().to_string(),
            message: errors.iter().map(|err| err.to_string()).collect::<Vec<String>>().join("; ")
        })
    };
}
