//! ImageNet label vocabulary.

use std::fs::File;
use std::io::BufReader;
use std::ops::Index;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Ordered class names, index-aligned with the model's output logits.
///
/// Loaded once from a JSON array of strings and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Labels(Vec<String>);

impl Labels {
    /// Load the vocabulary from a JSON array file.
    pub fn from_file<P>(path: P) -> Result<Labels>
    where
        P: AsRef<Path>,
    {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let names: Vec<String> = serde_json::from_reader(reader)?;
        debug!(path = %path.as_ref().display(), count = names.len(), "Loaded labels");
        Ok(Labels(names))
    }

    /// Label for class `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Number of classes in the vocabulary.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<usize> for Labels {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.0[index]
    }
}
