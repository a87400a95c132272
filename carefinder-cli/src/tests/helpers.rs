//! Test helpers for writing datasets and caches into scratch directories.

use camino::Utf8Path;
use geo::Coord;
use serde_json::json;

pub(super) const CENTRAL_LAGOS: Coord<f64> = Coord {
    x: 3.3792,
    y: 6.5244,
};
pub(super) const YABA: Coord<f64> = Coord {
    x: 3.3792,
    y: 6.5425,
};
pub(super) const SURULERE: Coord<f64> = Coord {
    x: 3.3515,
    y: 6.5,
};
pub(super) const EPE: Coord<f64> = Coord { x: 3.98, y: 6.58 };

/// A facility row as it appears in the dataset, with its true location.
#[derive(Debug, Clone, Copy)]
pub(super) struct Site {
    pub(super) name: &'static str,
    pub(super) address: &'static str,
    pub(super) location: Coord<f64>,
}

pub(super) const YABA_EYE: Site = Site {
    name: "Yaba Eye Clinic",
    address: "12 Herbert Macaulay Way, Yaba",
    location: YABA,
};
pub(super) const SURULERE_EYE: Site = Site {
    name: "Surulere Eye Centre",
    address: "4 Adeniran Ogunsanya St, Surulere",
    location: SURULERE,
};
pub(super) const EPE_GENERAL: Site = Site {
    name: "Epe General Hospital",
    address: "Hospital Road, Epe",
    location: EPE,
};
pub(super) const VISITOR_ADDRESS: &str = "Broad Street";

/// Write `contents` to `path`, creating parent directories.
pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directory");
    }
    std::fs::write(path, contents).expect("write file");
}

/// Write a dataset holding one eye-surgery facility per site.
pub(super) fn write_dataset(path: &Utf8Path, sites: &[Site]) {
    let rows: Vec<serde_json::Value> = sites
        .iter()
        .map(|site| {
            json!({
                "Name": site.name,
                "Full Address": site.address,
                "Services": "Eye Surgery, Optometry",
                "Cost Level": "Low",
                "Quality Score": 4.6,
                "User Rating": "4.4",
            })
        })
        .collect();
    let payload = serde_json::to_string_pretty(&rows).expect("serialise dataset");
    write_utf8(path, payload.as_bytes());
}

/// The address sent to the maps service for a dataset address.
pub(super) fn qualified(address: &str) -> String {
    format!("{address}, {}", carefinder_data::DEFAULT_ADDRESS_SUFFIX)
}
