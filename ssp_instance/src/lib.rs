mod error;
mod parser;
mod random;

pub use error::{HeaderField, InstanceError};
pub use parser::{parse, InstanceFile, Rule};
pub use random::{generate, MIN_RANDOM_SIZE};

use std::fmt;
use std::fs;
use std::path::Path;

/// A subset sum problem: a sequence of integers and the sum a subset of them has to reach.
///
/// The element order is fixed at construction. Solvers report solution values in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    elements: Vec<i64>,
    target: i64,
}

/// How [`Instance::new`] arranges the given elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementOrder {
    AsGiven,
    /// Largest first, which lets the remaining-sum bound of a branch-and-prune search tighten
    /// at shallow depths.
    Descending,
}

impl Instance {
    pub fn new(mut elements: Vec<i64>, target: i64, order: ElementOrder) -> Instance {
        if order == ElementOrder::Descending {
            elements.sort_unstable_by(|a, b| b.cmp(a));
        }
        Instance { elements, target }
    }

    pub fn elements(&self) -> &[i64] {
        &self.elements
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Sum of all elements, widened so that it cannot overflow.
    pub fn total_sum(&self) -> i128 {
        self.elements.iter().map(|&e| e as i128).sum()
    }
}

impl From<InstanceFile> for Instance {
    fn from(file: InstanceFile) -> Instance {
        Instance::new(file.elements, file.target, ElementOrder::Descending)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SSP(n = {}; target = {})", self.elements.len(), self.target)
    }
}

/// Reads and parses an instance file. The elements of the returned instance are sorted in
/// descending order.
///
/// Bytes that are not valid UTF-8 are replaced before parsing, so they surface as a malformed
/// header or element rather than as an I/O error.
pub fn load(path: impl AsRef<Path>) -> Result<Instance, InstanceError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| InstanceError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let file = parse(&String::from_utf8_lossy(&bytes))?;
    tracing::debug!(path = %path.display(), size = file.size, "loaded instance file");
    Ok(Instance::from(file))
}
