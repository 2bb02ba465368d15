//! # Feature-Class Routing
//!
//! Maps a symbol set code and geometry to the dataset (feature class) that
//! stores symbols of that kind. Most symbol sets live in a single dataset
//! regardless of geometry; control measures and METOC symbols are split by
//! geometry.
//!
//! A miss is not an error here: [`resolve`] returns `None` and callers treat
//! it as "cannot commit this symbol".

use crate::code::GeometryClass;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Which geometries a routing row applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGeometry {
    Any,
    Only(GeometryClass),
}

#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub symbol_set: &'static str,
    pub geometry: RouteGeometry,
    pub dataset: &'static str,
}

impl Route {
    const fn any(symbol_set: &'static str, dataset: &'static str) -> Self {
        Self {
            symbol_set,
            geometry: RouteGeometry::Any,
            dataset,
        }
    }

    const fn only(
        symbol_set: &'static str,
        geometry: GeometryClass,
        dataset: &'static str,
    ) -> Self {
        Self {
            symbol_set,
            geometry: RouteGeometry::Only(geometry),
            dataset,
        }
    }

    fn applies_to(&self, geometry: GeometryClass) -> bool {
        match self.geometry {
            RouteGeometry::Any => true,
            RouteGeometry::Only(g) => g == geometry,
        }
    }
}

use GeometryClass::{Area, Line, Point};

/// The routing table. Geometry-specific rows precede catch-all rows for the
/// same symbol set.
pub const ROUTES: &[Route] = &[
    Route::any("01", "Air"),
    Route::any("02", "Air"),
    Route::any("05", "Space"),
    Route::any("06", "Space"),
    Route::any("10", "LandUnits"),
    Route::any("11", "LandUnits"),
    Route::any("15", "LandEquipment"),
    Route::any("20", "LandInstallation"),
    Route::only("25", Point, "ControlMeasuresPoints"),
    Route::only("25", Line, "ControlMeasuresLines"),
    Route::only("25", Area, "ControlMeasuresAreas"),
    Route::any("27", "LandUnits"),
    Route::any("30", "SeaSurface"),
    Route::any("35", "SeaSubsurface"),
    Route::any("36", "SeaSubsurface"),
    Route::any("40", "Activities"),
    Route::only("45", Point, "METOCPoints"),
    Route::only("45", Line, "METOCLines"),
    Route::only("45", Area, "METOCAreas"),
    Route::only("46", Point, "METOCPoints"),
    Route::only("46", Line, "METOCLines"),
    Route::only("46", Area, "METOCAreas"),
    Route::any("47", "METOCPoints"),
    Route::any("50", "SignalsIntelligence"),
    Route::any("51", "SignalsIntelligence"),
    Route::any("52", "SignalsIntelligence"),
    Route::any("53", "SignalsIntelligence"),
    Route::any("54", "SignalsIntelligence"),
    Route::any("60", "Cyberspace"),
];

static ROUTES_BY_SET: Lazy<HashMap<&'static str, Vec<&'static Route>>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, Vec<&'static Route>> = HashMap::new();
    for route in ROUTES {
        map.entry(route.symbol_set).or_default().push(route);
    }
    map
});

/// Resolve the dataset for a symbol set and geometry.
pub fn resolve(symbol_set: &str, geometry: GeometryClass) -> Option<&'static str> {
    ROUTES_BY_SET
        .get(symbol_set)?
        .iter()
        .find(|route| route.applies_to(geometry))
        .map(|route| route.dataset)
}

/// All distinct dataset names in the table, in table order.
pub fn datasets() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for route in ROUTES {
        if !names.contains(&route.dataset) {
            names.push(route.dataset);
        }
    }
    names
}
