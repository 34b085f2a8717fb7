//! Vector Store Reader
//!
//! A store is a flat directory of text resources, three per vector, keyed by
//! a zero-padded 3-digit index:
//!
//! ```text
//! test_000_input.txt     64 pixel intensities, one per line
//! test_000_output.txt    expected label (first data line wins)
//! test_000_metadata.txt  `key: value` lines
//! ```

use crate::error::{Result, VectorError};
use crate::parser;
use crate::vector::TestVector;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File-name prefix shared by every vector resource.
pub const FILE_PREFIX: &str = "test_";

/// The three resources that make up one vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Pixel intensities
    Input,
    /// Expected label
    Output,
    /// Free-form metadata
    Metadata,
}

impl Resource {
    /// All resources, in load order
    pub const ALL: [Self; 3] = [Self::Input, Self::Output, Self::Metadata];

    /// File-name suffix of this resource
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Metadata => "metadata",
        }
    }

    /// File name of this resource for vector `index`
    pub fn file_name(self, index: usize) -> String {
        format!("{FILE_PREFIX}{index:03}_{}.txt", self.suffix())
    }
}

/// Directory of pre-recorded test vectors
#[derive(Debug, Clone)]
pub struct VectorStore {
    dir: PathBuf,
}

impl VectorStore {
    /// Open a store rooted at `dir`.
    ///
    /// The directory is not touched until a vector is loaded.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of one resource of vector `index`
    pub fn path(&self, index: usize, resource: Resource) -> PathBuf {
        self.dir.join(resource.file_name(index))
    }

    /// Load vector `index`.
    ///
    /// # Errors
    ///
    /// - [`VectorError::NotFound`] if any of the three resources is missing
    /// - [`VectorError::Malformed`] if the pixel list is not exactly 64 values
    ///   in `0..=3`, or there is no parsable label in `0..=9`
    pub fn load(&self, index: usize) -> Result<TestVector> {
        let input_path = self.path(index, Resource::Input);
        let output_path = self.path(index, Resource::Output);
        let metadata_path = self.path(index, Resource::Metadata);

        let input = read_resource(&input_path)?;
        let pixels = parser::parse_int_list(&input)
            .map_err(|reason| VectorError::malformed(&input_path, reason))?;

        let output = read_resource(&output_path)?;
        let expected = parser::parse_first_int(&output)
            .map_err(|reason| VectorError::malformed(&output_path, reason))?;

        let metadata = parser::parse_metadata(&read_resource(&metadata_path)?);

        let vector = TestVector::new(index, &pixels, expected, metadata).map_err(|fault| {
            let path = if fault.in_label() { &output_path } else { &input_path };
            VectorError::malformed(path, fault.to_string())
        })?;

        debug!(
            "Loaded vector {index:03}: expected={expected}, {} metadata keys",
            vector.metadata().len()
        );
        Ok(vector)
    }

    /// Indices with a canonically named input resource, ascending.
    ///
    /// Having an input file does not guarantee the other two exist; `load`
    /// still reports those as [`VectorError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be read.
    pub fn indices(&self) -> Result<Vec<usize>> {
        let entries = fs::read_dir(&self.dir).map_err(|source| VectorError::Scan {
            path: self.dir.clone(),
            source,
        })?;

        let suffix = format!("_{}.txt", Resource::Input.suffix());
        let found: BTreeSet<usize> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let index: usize = name
                    .strip_prefix(FILE_PREFIX)?
                    .strip_suffix(&suffix)?
                    .parse()
                    .ok()?;
                // Only names `load` would open: `test_7_` or `test_+7_` are not
                (Resource::Input.file_name(index) == name).then_some(index)
            })
            .collect();

        info!("Found {} vectors in {}", found.len(), self.dir.display());
        Ok(found.into_iter().collect())
    }
}

fn read_resource(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => VectorError::not_found(path),
        _ => VectorError::from(e),
    })
}
