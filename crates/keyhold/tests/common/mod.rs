#![allow(dead_code)]

use keyhold::{
    core::db::codec::CodecError,
    prelude::*,
};
use tracing_subscriber::EnvFilter;

///
/// Site
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Site {
    pub building: String,
    pub floor: u8,
}

///
/// Reading
/// Sensor reading with a unique serial, a shared sensor name, an ordered
/// temperature, and an equality-only site.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Reading {
    pub id: u32,
    pub serial: String,
    pub sensor: String,
    pub celsius: i32,
    pub site: Opaque<Site>,
}

impl Reading {
    pub fn new(id: u32, sensor: &str, celsius: i32) -> Self {
        Self {
            id,
            serial: format!("SN-{id:04}"),
            sensor: sensor.to_string(),
            celsius,
            site: Opaque(site("north", 1)),
        }
    }

    #[must_use]
    pub fn at(mut self, site: Site) -> Self {
        self.site = Opaque(site);
        self
    }
}

impl EntityKind for Reading {
    type Key = u32;

    const MODEL: &'static EntityModel = &EntityModel::new(
        "Reading",
        "id",
        ValueKind::Uint32,
        &[
            IndexModel::new("serial", ValueKind::Text, true),
            IndexModel::new("sensor", ValueKind::Text, false),
            IndexModel::new("celsius", ValueKind::Int32, false),
            IndexModel::new("site", ValueKind::Opaque, false),
        ],
    );

    fn key(&self) -> u32 {
        self.id
    }

    fn index_value(&self, index: &IndexModel) -> Result<Option<Vec<u8>>, CodecError> {
        match index.field {
            "serial" => index_field(index, self.serial.as_str()),
            "sensor" => index_field(index, self.sensor.as_str()),
            "celsius" => index_field(index, &self.celsius),
            "site" => index_field(index, &self.site),
            _ => Ok(None),
        }
    }
}

pub fn site(building: &str, floor: u8) -> Site {
    Site {
        building: building.to_string(),
        floor,
    }
}

/// Route debug events to the test harness; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("keyhold_core=debug"))
        .with_test_writer()
        .try_init();
}

/// Debug-enabled in-memory database holding `readings`.
pub fn db_with(readings: &[Reading]) -> Db<MemoryStore> {
    init_tracing();

    let db = Db::in_memory().debug();
    for reading in readings {
        db.insert(reading).expect("seed reading should insert");
    }

    db
}

pub fn ids(readings: &[Reading]) -> Vec<u32> {
    readings.iter().map(|r| r.id).collect()
}
