use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use anyhow::Result;
use chrono::NaiveDate;
use zip::ZipArchive;

use crate::{pings, DayLog, Executive, ExecutiveName, RoutePath};

impl DayLog {
    pub fn import_zip_path(path: &str) -> Result<Self> {
        let bytes = fs_err::read(path)?;
        Self::import_zip_bytes(bytes)
    }

    /// Imports a zipped bundle of tracker exports. Trackers upload one CSV
    /// per batch, so the same executive usually appears in several members.
    pub fn import_zip_bytes(bytes: Vec<u8>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut csv_files: Vec<String> = archive
            .file_names()
            .filter(|name| name.ends_with(".csv"))
            .map(|name| name.to_string())
            .collect();
        if csv_files.is_empty() {
            bail!("The bundle has no .csv files");
        }
        // ID assignment depends on merge order, so make it deterministic
        csv_files.sort();

        let mut log = DayLog::empty();
        for name in csv_files {
            let mut buffer = Vec::new();
            get_zip_file(&mut archive, &name)?.read_to_end(&mut buffer)?;
            let (date, routes) = pings::load(&buffer[..])?;
            info!("Merging {} executives from {name}", routes.len());
            log.merge(date, routes);
        }
        Ok(log)
    }

    fn merge(&mut self, date: Option<NaiveDate>, routes: BTreeMap<ExecutiveName, RoutePath>) {
        if self.date.is_none() {
            self.date = date;
        }
        for (original_id, route) in routes {
            let id = self.ids.insert_idempotent(&original_id);
            match self.executives.get_mut(id.0) {
                Some(existing) => {
                    existing.route.extend(route);
                    existing.route.sort_by_time();
                }
                None => {
                    self.executives.push(Executive {
                        id,
                        original_id,
                        route,
                    });
                }
            }
        }
    }
}

// Adds the path in the error message
fn get_zip_file<'a, R: std::io::Read + std::io::Seek>(
    archive: &'a mut ZipArchive<R>,
    path: &str,
) -> Result<zip::read::ZipFile<'a>> {
    archive
        .by_name(path)
        .map_err(|err| anyhow!("{path}: {err}"))
}
