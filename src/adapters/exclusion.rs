use crate::domain::model::Ean13;
use crate::domain::ports::ExclusionSet;
use crate::utils::error::{ForgeError, Result};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Codes listed in a text file, one per line.
///
/// Blank lines are skipped and `#` starts a comment. Any other line must be a
/// valid 13-digit code; the first bad line fails the whole load.
#[derive(Debug, Clone, Default)]
pub struct FileExclusions {
    codes: HashSet<Ean13>,
}

impl FileExclusions {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::parse(&path.display().to_string(), &text)
    }

    pub fn from_bytes(source: &str, bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| ForgeError::ExclusionFileError {
            path: source.to_string(),
            line: 0,
            reason: format!("not UTF-8: {}", e),
        })?;
        Self::parse(source, text)
    }

    pub fn parse(source: &str, text: &str) -> Result<Self> {
        let mut codes = HashSet::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let code = line.parse::<Ean13>().map_err(|e| ForgeError::ExclusionFileError {
                path: source.to_string(),
                line: index + 1,
                reason: format!("{}: {} ({})", e.kind(), e, line),
            })?;
            codes.insert(code);
        }
        tracing::debug!(source, codes = codes.len(), "loaded exclusion list");
        Ok(Self { codes })
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn into_codes(self) -> HashSet<Ean13> {
        self.codes
    }
}

impl ExclusionSet for FileExclusions {
    fn contains(&self, code: &Ean13) -> bool {
        self.codes.contains(code)
    }
}

/// An exclusion set several generators can share.
///
/// `contains` alone cannot stop two threads from accepting the same code.
/// Generate, then `claim`: only the caller whose claim succeeds keeps the code.
#[derive(Debug, Default)]
pub struct SharedExclusions {
    inner: Mutex<HashSet<Ean13>>,
}

impl SharedExclusions {
    pub fn new(codes: HashSet<Ean13>) -> Self {
        Self {
            inner: Mutex::new(codes),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<Ean13>> {
        // the set stays consistent even if a holder panicked
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Atomically records `code`; false if it was already taken.
    pub fn claim(&self, code: Ean13) -> bool {
        self.lock().insert(code)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl ExclusionSet for SharedExclusions {
    fn contains(&self, code: &Ean13) -> bool {
        self.lock().contains(code)
    }
}
