use regex::Regex;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::pipeline_report::ArtifactInfo;
use crate::utils::error::{BootstrapError, Result};

/// Finds the one build artifact matching a file-name pattern.
///
/// Patterns support `*` and `?` in the final path component only, e.g.
/// `dist/snowflake_sqlalchemy*.whl`.
#[derive(Debug, Clone)]
pub struct ArtifactResolver {
    pattern: String,
}

impl ArtifactResolver {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Resolve the pattern relative to `base`, requiring exactly one match
    pub fn resolve(&self, base: &Path) -> Result<ArtifactInfo> {
        let mut matches = self.find_matches(base)?;

        match matches.len() {
            0 => Err(BootstrapError::ArtifactNotFound {
                pattern: self.pattern.clone(),
            }),
            1 => {
                let path = matches.remove(0);
                let sha256 = sha256_file(&path)?;
                debug!(artifact = %path.display(), %sha256, "resolved artifact");
                Ok(ArtifactInfo { path, sha256 })
            }
            _ => Err(BootstrapError::ArtifactAmbiguous {
                pattern: self.pattern.clone(),
                matches,
            }),
        }
    }

    /// All regular files matching the pattern, sorted by path
    pub fn find_matches(&self, base: &Path) -> Result<Vec<PathBuf>> {
        let (dir, file_pattern) = self.split_pattern()?;
        let dir = base.join(dir);
        let matcher = file_name_regex(&file_pattern)?;

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut matches = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if matcher.is_match(&name.to_string_lossy()) {
                matches.push(entry.path());
            }
        }

        matches.sort();
        Ok(matches)
    }

    fn split_pattern(&self) -> Result<(PathBuf, String)> {
        let path = Path::new(&self.pattern);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                BootstrapError::ValidationError(format!(
                    "Artifact pattern '{}' must name a file",
                    self.pattern
                ))
            })?;

        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        if dir.to_string_lossy().contains(['*', '?']) {
            return Err(BootstrapError::ValidationError(format!(
                "Artifact pattern '{}' may only use wildcards in the file name",
                self.pattern
            )));
        }

        Ok((dir, file_name))
    }
}

fn file_name_regex(pattern: &str) -> Result<Regex> {
    let mut source = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(&other.to_string())),
        }
    }
    source.push('$');

    Regex::new(&source).map_err(|e| {
        BootstrapError::ValidationError(format!("Invalid artifact pattern '{}': {}", pattern, e))
    })
}

fn sha256_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}
