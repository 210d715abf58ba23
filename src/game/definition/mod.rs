use anyhow::*;
use itertools::Itertools;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

pub mod quality;
pub mod record;

pub use record::{RawRecord, SchoolId, SchoolRecord};

use quality::Severity;

use crate::game::question::CHOICE_COUNT;

const BUNDLED_DATASET: &str = include_str!("../../../data/schools.csv");

#[derive(Clone, Debug)]
pub struct SchoolStore {
    records: Vec<SchoolRecord>,
}

impl SchoolStore {
    pub fn bundled() -> Result<SchoolStore> {
        let records = SchoolStore::read_csv(BUNDLED_DATASET.as_bytes())
            .context("Bundled dataset is malformed")?;
        SchoolStore::new(records)
    }

    pub fn open(source: &Path) -> Result<SchoolStore> {
        let records = SchoolStore::read(source)?;
        SchoolStore::new(records)
            .with_context(|| format!("Dataset {} was rejected", source.display()))
    }

    /// Reads a dataset without validating it.
    pub fn read(source: &Path) -> Result<Vec<SchoolRecord>> {
        let file = File::open(source)
            .with_context(|| format!("Could not open dataset {}", source.display()))?;
        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match extension.as_deref() {
            Some("csv") => SchoolStore::read_csv(file),
            Some("json") => SchoolStore::read_json(file),
            _ => Err(anyhow!(
                "Unsupported dataset format: {} (expected .csv or .json)",
                source.display()
            )),
        }
    }

    fn read_csv<R: Read>(reader: R) -> Result<Vec<SchoolRecord>> {
        let mut records = Vec::new();
        let mut csv_reader = csv::Reader::from_reader(reader);
        for record in csv_reader.deserialize() {
            let raw_record: RawRecord = record?;
            records.push(raw_record.into());
        }
        Ok(records)
    }

    fn read_json<R: Read>(reader: R) -> Result<Vec<SchoolRecord>> {
        let records = serde_json::from_reader(reader)?;
        Ok(records)
    }

    pub fn new(records: Vec<SchoolRecord>) -> Result<SchoolStore> {
        let mut ids = HashSet::new();
        if let Some(duplicate) = records.iter().find(|r| !ids.insert(r.id)) {
            bail!("School id {} is used more than once", duplicate.id);
        }

        let issues = quality::inspect(&records);
        for issue in issues.iter().filter(|i| i.severity() == Severity::Warning) {
            warn!("{}", issue);
        }
        let failures = issues
            .iter()
            .filter(|i| i.severity() == Severity::Failure)
            .collect::<Vec<_>>();
        if !failures.is_empty() {
            bail!(
                "{} school(s) failed quality checks:\n{}",
                failures.len(),
                failures.iter().join("\n")
            );
        }

        let (records, rejected): (Vec<SchoolRecord>, Vec<SchoolRecord>) = records
            .into_iter()
            .partition(|r| quality::grade(r).is_playable());
        for record in &rejected {
            warn!(
                "#{} {} is graded {} and will not be asked",
                record.id,
                record.school_name,
                quality::grade(record)
            );
        }

        if records.len() < CHOICE_COUNT {
            bail!(
                "A quiz needs at least {} schools, found {}",
                CHOICE_COUNT,
                records.len()
            );
        }

        info!("Loaded {} schools", records.len());
        Ok(SchoolStore { records })
    }

    pub fn records(&self) -> &[SchoolRecord] {
        &self.records
    }
}
