use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use replyline_protocol::types::AutomationKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::draft::RuleDraft;
use crate::error::LoadError;

/// Draft authored on disk, tagged with the kind of automation it becomes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DraftDocument {
    pub kind: AutomationKind,
    #[serde(flatten)]
    pub draft: RuleDraft,
}

/// Loads drafts from a JSON/YAML file or from every such file in a directory.
pub fn load_drafts(path: impl AsRef<Path>) -> Result<Vec<DraftDocument>, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::MissingPath(path.display().to_string()));
    }

    let documents = if path.is_dir() {
        load_from_directory(path)?
    } else {
        load_from_file(path)?
    };

    deduplicate(&documents)?;
    debug!(count = documents.len(), path = %path.display(), "loaded drafts");
    Ok(documents)
}

fn load_from_directory(path: &Path) -> Result<Vec<DraftDocument>, LoadError> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(path).map_err(|err| LoadError::from_io(path, err))? {
        let entry = entry.map_err(|err| LoadError::from_io(path, err))?;
        let file_type = entry
            .file_type()
            .map_err(|err| LoadError::from_io(entry.path(), err))?;
        if file_type.is_dir() {
            continue;
        }

        if let Some(ext) = entry.path().extension().and_then(|value| value.to_str()) {
            if matches!(ext, "json" | "yaml" | "yml") {
                files.push(entry.path());
            }
        }
    }
    files.sort();

    let mut documents = Vec::new();
    for file in files {
        documents.append(&mut load_from_file(&file)?);
    }
    Ok(documents)
}

fn load_from_file(path: &Path) -> Result<Vec<DraftDocument>, LoadError> {
    let raw = fs::read_to_string(path).map_err(|err| LoadError::from_io(path, err))?;
    parse_drafts(&raw, path)
}

/// Parses `raw` as `{automations: [...]}`, a bare list, or a single document.
pub fn parse_drafts(raw: &str, path: &Path) -> Result<Vec<DraftDocument>, LoadError> {
    let mut documents = if let Ok(file) = serde_yaml::from_str::<DraftFile>(raw) {
        file.automations
    } else if let Ok(list) = serde_yaml::from_str::<Vec<DraftDocument>>(raw) {
        list
    } else {
        match serde_yaml::from_str::<DraftDocument>(raw) {
            Ok(document) => vec![document],
            Err(err) => {
                let message = format!(
                    "expected an automations document, a list or a single draft: {err}"
                );
                return Err(LoadError::parse_error(path, message));
            }
        }
    };

    for document in &mut documents {
        document.draft.normalize();
    }
    Ok(documents)
}

fn deduplicate(documents: &[DraftDocument]) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for document in documents {
        let name = document.draft.name.trim();
        if !seen.insert(name.to_string()) {
            return Err(LoadError::DuplicateName {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct DraftFile {
    automations: Vec<DraftDocument>,
}
