use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::{ExecutiveName, LocationPoint, RoutePath};

/// Reads a raw tracker export: one CSV row per GPS ping, with every executive
/// in the field that day interleaved. Rows without coordinates get skipped.
/// Also returns the date of the first row, to label the day.
pub fn load<R: std::io::Read>(
    reader: R,
) -> Result<(Option<NaiveDate>, BTreeMap<ExecutiveName, RoutePath>)> {
    let mut data_per_exec: BTreeMap<ExecutiveName, Vec<(NaiveDateTime, LocationPoint)>> =
        BTreeMap::new();
    let mut date = None;
    let mut skipped = 0;
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Ping = rec?;

        let captured = NaiveDateTime::parse_from_str(&rec.captured_at, "%Y-%m-%d %H:%M:%S")?;
        if date.is_none() {
            date = Some(captured.date());
        }

        let (latitude, longitude) = match (rec.latitude, rec.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let point = LocationPoint {
            latitude,
            longitude,
            timestamp: captured.format("%Y-%m-%dT%H:%M:%S").to_string(),
            is_predicted: rec.predicted.unwrap_or(0) != 0,
        };
        data_per_exec
            .entry(rec.emp_code)
            .or_insert_with(Vec::new)
            .push((captured, point));
    }
    if skipped > 0 {
        warn!("Skipped {skipped} pings without coordinates");
    }

    // Trackers upload in batches, so one executive's pings arrive interleaved
    // and out of order.
    let mut results = BTreeMap::new();
    for (emp_code, mut pings) in data_per_exec {
        pings.sort_by_key(|(captured, _)| *captured);
        results.insert(
            emp_code,
            RoutePath::new(pings.into_iter().map(|(_, pt)| pt).collect()),
        );
    }
    Ok((date, results))
}

#[derive(Deserialize)]
struct Ping {
    #[serde(rename = "EMP_CODE")]
    emp_code: ExecutiveName,
    #[serde(rename = "CAPTURED_AT")]
    captured_at: String,
    #[serde(rename = "LATITUDE")]
    latitude: Option<f64>,
    #[serde(rename = "LONGITUDE")]
    longitude: Option<f64>,
    #[serde(rename = "PREDICTED", default)]
    predicted: Option<u8>,
}
