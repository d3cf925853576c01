//! Program names and the on-device program catalog.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{info, warn};

use super::error::{CycleError, CycleResult};
use super::runner::Runner;
use crate::native::{Command, DeviceSession, FILE_NAME_FIELD, JOB_EXTENSION};

/// Normalized job name: trimmed, upper-cased, without the `.JOB` suffix.
///
/// Normalization is idempotent, so `ProgramName::new(a.as_str()) == a`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProgramName(String);

impl ProgramName {
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ProgramName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Normalize a raw job file name.
pub fn normalize(raw: &str) -> String {
    let mut name = raw.trim().to_uppercase();
    while let Some(stripped) = name.strip_suffix(JOB_EXTENSION) {
        name = stripped.trim_end().to_string();
    }
    name
}

/// Programs available on the sensor at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramCatalog {
    programs: BTreeSet<ProgramName>,
}

impl ProgramCatalog {
    pub fn contains(&self, program: &ProgramName) -> bool {
        self.programs.contains(program)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProgramName> {
        self.programs.iter()
    }
}

impl<'a> FromIterator<&'a str> for ProgramCatalog {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            programs: iter.into_iter().map(ProgramName::new).collect(),
        }
    }
}

impl<S: DeviceSession> Runner<S> {
    /// Fetch the file list from the sensor. Never cached.
    pub fn program_catalog(&mut self) -> CycleResult<ProgramCatalog> {
        self.cancel.check()?;
        let response = self.send(Command::ListFiles)?;
        Ok(response.fields(FILE_NAME_FIELD).collect())
    }

    /// Fail with [`CycleError::ProgramNotFound`] unless `target` is stored on
    /// the sensor.
    pub fn ensure_program_exists(&mut self, target: &ProgramName) -> CycleResult<()> {
        info!("Checking the program...");

        let catalog = self.program_catalog()?;
        info!("Found {} programs.", catalog.len());

        if !catalog.contains(target) {
            warn!("Program not found: {target}");
            return Err(CycleError::ProgramNotFound(target.clone()));
        }
        Ok(())
    }
}
