#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod ids;
mod import;
mod pings;
mod route;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use self::ids::{CheapID, ExecutiveID, ExecutiveName, IDMapping};
pub use self::route::{route_from_json_str, LocationPoint, LonLat, RoutePath};

/// Everything tracked for one calendar day of field work.
#[derive(Serialize, Deserialize)]
pub struct DayLog {
    /// Taken from the first ping. None for manually assembled logs.
    pub date: Option<NaiveDate>,
    pub executives: Vec<Executive>,
    pub ids: IDMapping<ExecutiveName, ExecutiveID>,
}

#[derive(Serialize, Deserialize)]
pub struct Executive {
    pub id: ExecutiveID,
    pub original_id: ExecutiveName,
    pub route: RoutePath,
}

impl DayLog {
    pub fn load_pings<R: std::io::Read>(reader: R) -> Result<Self> {
        let (date, routes) = pings::load(reader)?;
        let mut log = Self::empty();
        log.date = date;
        for (original_id, route) in routes {
            let id = log.ids.insert_new(original_id.clone())?;
            log.executives.push(Executive {
                id,
                original_id,
                route,
            });
        }
        info!(
            "Loaded {} executives with {} pings ({} predicted)",
            log.executives.len(),
            log.executives.iter().map(|x| x.route.len()).sum::<usize>(),
            log.executives
                .iter()
                .map(|x| x.route.predicted_count())
                .sum::<usize>()
        );
        Ok(log)
    }

    pub fn empty() -> Self {
        Self {
            date: None,
            executives: Vec::new(),
            ids: IDMapping::new(),
        }
    }

    /// IDs assigned by loading index directly into `executives`
    pub fn executive(&self, id: ExecutiveID) -> Option<&Executive> {
        self.executives.get(id.0)
    }
}
