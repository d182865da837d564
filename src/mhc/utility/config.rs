use std::env;
use std::path::{Path, PathBuf};

use crate::mhc::errors::PipelineError;

const DATA_DIR_VARIABLE: &str = "MHC2_DATA_DIR";
const THREADS_VARIABLE: &str = "MHC2_THREADS";
const DEFAULT_DATA_DIR: &str = "./data";
const PDB_SUBDIR: &str = "pdb";

/// Runtime settings which are not given on the command line.
/// Built once in `main` and handed to the tasks.
#[derive(Debug, Clone)]
pub struct Config {
    data_dir: PathBuf,
    thread_count: usize
}

impl Config {
    pub fn new(data_dir: &Path, thread_count: usize) -> Self {
        return Self {
            data_dir: data_dir.to_path_buf(),
            thread_count: if thread_count > 0 { thread_count } else { 1 }
        };
    }

    /// Loads `.env` if there is one, then reads the environment.
    pub fn from_env() -> Result<Self, PipelineError> {
        // a missing .env is fine, the variables may come from the shell
        let _ = dotenv::dotenv();
        let data_dir = match env::var(DATA_DIR_VARIABLE) {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
            _ => PathBuf::from(DEFAULT_DATA_DIR)
        };
        let thread_count = match env::var(THREADS_VARIABLE) {
            Ok(count) => count.trim().parse::<usize>()
                .map_err(|_| PipelineError::Argument(format!("could not parse {}='{}' to unsigned integer", THREADS_VARIABLE, count)))?,
            Err(_) => num_cpus::get()
        };
        return Ok(Self::new(&data_dir, thread_count));
    }

    pub fn get_thread_count(&self) -> usize {
        return self.thread_count;
    }

    pub fn default_pdb_dir(&self) -> PathBuf {
        return self.data_dir.join(PDB_SUBDIR);
    }
}
