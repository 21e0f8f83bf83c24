use std::fs;
use std::path::Path;

use tempfile::TempDir;

pub(crate) const USERS: &str = r#"[
    {"id": 1, "name": "Ana", "surname": "Paz", "interests": [10]},
    {"id": 2, "name": "Bruno", "interests": ["music"]},
    {"id": 3, "name": "Carla", "interests": [10, "Music"]},
    {"id": 4, "name": "Dario"}
]"#;

pub(crate) const FRIENDSHIPS: &str = r#"[
    {"from_id": 1, "to_id": 2, "cost": 1},
    {"from_id": 2, "to_id": 3, "cost": 2},
    {"from_id": 1, "to_id": 3, "cost": 3},
    {"from_id": 3, "to_id": 4, "cost": 4},
    {"from_id": 2, "to_id": 4, "cost": 5}
]"#;

pub(crate) const CATEGORIES: &str = r#"[
    {"id": 10, "name": "sports", "cost": 3},
    {"id": 11, "name": "music", "cost": 2},
    {"id": 12, "cost": 4, "reached_user_ids": [4]}
]"#;

pub(crate) const CANDIDATES: &str = r#"[
    {"from_id": 4, "to_id": 1, "cost": 6},
    {"from_id": 2, "to_id": 4, "cost": 2}
]"#;

/// Writes `files` into a fresh temporary directory.
pub(crate) fn data_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for (name, contents) in files {
        write(dir.path(), name, contents);
    }
    dir
}

pub(crate) fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write document");
}
