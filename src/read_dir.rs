use std::collections::BTreeMap;
use std::io::Result;
use std::path::{Path, PathBuf};

pub type MatchFiles = BTreeMap<String, PathBuf>;

const EXTENSIONS: [&str; 2] = [".json.gz", ".json"];

/// Splits `3895194.json` or `3895194.json.gz` into its match id.
pub fn match_id(file_name: &str) -> Option<&str> {
    EXTENSIONS
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext))
        .filter(|id| !id.is_empty())
}

/// Every event file in `path`, keyed by match id. When both a plain and a gzipped file exist for
/// the same match, the plain one wins.
pub fn read_dir(path: &Path) -> Result<MatchFiles> {
    let mut files = BTreeMap::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        if !entry.metadata()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let id = match file_name.to_str().and_then(match_id) {
            Some(id) => id.to_owned(),
            None => continue,
        };
        let path = entry.path();
        let plain = path.extension().map_or(false, |ext| ext == "json");
        if plain || !files.contains_key(&id) {
            files.insert(id, path);
        }
    }
    Ok(files)
}
