use std::{collections::BTreeMap, fmt};

/// Index of a file registered with an uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(pub usize);

impl FileId {
    /// Returns the raw index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for FileId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Picks the value that applies to one file.
///
/// An override replaces the global value outright; the two are never merged.
pub fn effective<'a, T>(global: &'a T, scoped: Option<&'a T>) -> &'a T {
    scoped.unwrap_or(global)
}

/// A global value plus independent per-file overrides.
///
/// A file with no entry inherits the global value. A file with an entry uses
/// that entry even when it is empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scoped<T> {
    global: T,
    overrides: BTreeMap<FileId, T>,
}

impl<T> Scoped<T> {
    /// Creates a scope with the given global value and no overrides.
    pub fn new(global: T) -> Self {
        Self {
            global,
            overrides: BTreeMap::new(),
        }
    }

    /// Replaces the global value, or one file's override when `file` is set.
    pub fn set(&mut self, value: T, file: Option<FileId>) {
        match file {
            Some(id) => {
                self.overrides.insert(id, value);
            }
            None => self.global = value,
        }
    }

    /// Removes a file's override so it inherits the global value again.
    pub fn clear(&mut self, file: FileId) -> Option<T> {
        self.overrides.remove(&file)
    }

    /// Returns the global value.
    pub fn global(&self) -> &T {
        &self.global
    }

    /// Returns a file's override, if one was set.
    pub fn scoped(&self, file: FileId) -> Option<&T> {
        self.overrides.get(&file)
    }

    /// Returns the value in effect for `file`.
    pub fn effective(&self, file: FileId) -> &T {
        effective(&self.global, self.scoped(file))
    }
}

impl<T: Clone> Scoped<T> {
    /// Returns an owned copy of the value in effect for `file`.
    ///
    /// Later changes to the scope do not affect the returned copy.
    pub fn snapshot(&self, file: FileId) -> T {
        self.effective(file).clone()
    }
}
