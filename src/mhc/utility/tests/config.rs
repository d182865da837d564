use std::path::Path;

use crate::mhc::utility::config::Config;

#[test]
pub fn test_default_pdb_dir() {
    let config = Config::new(Path::new("/srv/mhc2"), 4);
    assert_eq!(config.default_pdb_dir(), Path::new("/srv/mhc2/pdb"));
    assert_eq!(config.get_thread_count(), 4);
}

#[test]
pub fn test_thread_count_is_at_least_one() {
    let config = Config::new(Path::new("data"), 0);
    assert_eq!(config.get_thread_count(), 1);
}
