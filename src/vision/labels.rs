// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Class label set for the detection model.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Class id to name mapping, loaded from a newline-separated file.
///
/// Missing entries fall back to a `class_<id>` placeholder so an absent or
/// short label file never fails a request.
#[derive(Debug, Clone, Default)]
pub struct ClassLabels {
    names: Vec<String>,
}

impl ClassLabels {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read label file {}", path.display()))?;

        let names = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect::<Vec<_>>();

        tracing::info!(count = names.len(), path = %path.display(), "loaded class labels");
        Ok(Self { names })
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self, class_id: usize) -> String {
        self.names
            .get(class_id)
            .cloned()
            .unwrap_or_else(|| format!("class_{}", class_id))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_known_labels() {
        let labels = ClassLabels::from_names(["glass", "metal", "paper"]);
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.name(1), "metal");
    }

    #[test]
    fn test_fallback_label() {
        let labels = ClassLabels::from_names(["glass"]);
        assert_eq!(labels.name(7), "class_7");

        let empty = ClassLabels::default();
        assert!(empty.is_empty());
        assert_eq!(empty.name(0), "class_0");
    }

    #[test]
    fn test_from_file_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "glass\n\n  metal  \npaper").unwrap();

        let labels = ClassLabels::from_file(file.path()).unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.name(1), "metal");
    }

    #[test]
    fn test_from_file_missing() {
        assert!(ClassLabels::from_file("/nonexistent/labels.txt").is_err());
    }
}
