//! Joins the live controller list against the fixed reference data.
//!
//! The result is a pure value: airports and FIRs decorated with the
//! controllers currently online, plus a flat map of positioned controller
//! records. Publishing is the publisher's job.

use std::collections::BTreeMap;

use tracing::debug;

use crate::fixed::{RunwayMap, VatspyData};
use crate::models::{Airport, Controller, Fir, Runway, StoredController, VersionedPoint};

pub const FACILITY_ATIS: i64 = 1;
pub const FACILITY_DELIVERY: i64 = 2;
pub const FACILITY_GROUND: i64 = 3;
pub const FACILITY_TOWER: i64 = 4;
pub const FACILITY_APPROACH: i64 = 5;
pub const FACILITY_CENTER: i64 = 6;

/// Controller-derived state of one feed snapshot, keyed the way the
/// versioned store keys it (airport/FIR icao, controller callsign).
#[derive(Debug, Default)]
pub struct ControllerState {
    pub airports: BTreeMap<String, Airport>,
    pub firs: BTreeMap<String, Fir>,
    pub controllers: BTreeMap<String, StoredController>,
}

pub fn assemble_controllers(
    fixed: &VatspyData,
    runways: &RunwayMap,
    ctrls: Vec<Controller>,
    atis: Vec<Controller>,
) -> ControllerState {
    let mut state = ControllerState::default();

    for ctrl in ctrls {
        match ctrl.facility {
            FACILITY_DELIVERY..=FACILITY_APPROACH => {
                attach_airport_controller(fixed, runways, &mut state, ctrl)
            }
            FACILITY_CENTER => attach_fir_controller(fixed, &mut state, ctrl),
            _ => {}
        }
    }

    // ATIS stations come in a separate feed list without a facility of
    // their own.
    for mut ctrl in atis {
        ctrl.facility = FACILITY_ATIS;
        attach_airport_controller(fixed, runways, &mut state, ctrl);
    }

    state
}

fn attach_airport_controller(
    fixed: &VatspyData,
    runways: &RunwayMap,
    state: &mut ControllerState,
    mut ctrl: Controller,
) {
    let Some(fixed_airport) = fixed.find_airport_by_callsign(&ctrl.callsign) else {
        debug!("can't find airport by callsign {}", ctrl.callsign);
        return;
    };

    let airport = state
        .airports
        .entry(fixed_airport.icao.clone())
        .or_insert_with(|| Airport::new(fixed_airport.clone()));

    if ctrl.facility != FACILITY_ATIS {
        if let Some(airport_runways) = runways.get(&airport.fixed.icao) {
            airport.runways = airport_runways
                .iter()
                .map(|(ident, runway)| (ident.clone(), Runway::from(runway)))
                .collect();
        }
    }

    let slot_name = match ctrl.facility {
        FACILITY_ATIS => "ATIS",
        FACILITY_DELIVERY => "Delivery",
        FACILITY_GROUND => "Ground",
        FACILITY_TOWER => "Tower",
        FACILITY_APPROACH => "Approach",
        _ => return,
    };
    ctrl.human_readable = Some(format!("{} {}", airport.fixed.name, slot_name));

    let position = VersionedPoint {
        lat: airport.fixed.latitude,
        lng: airport.fixed.longitude,
    };
    state.controllers.insert(
        ctrl.callsign.clone(),
        StoredController::new(ctrl.clone(), position),
    );

    let slot = match ctrl.facility {
        FACILITY_ATIS => &mut airport.controllers.atis,
        FACILITY_DELIVERY => &mut airport.controllers.delivery,
        FACILITY_GROUND => &mut airport.controllers.ground,
        FACILITY_TOWER => &mut airport.controllers.tower,
        FACILITY_APPROACH => &mut airport.controllers.approach,
        _ => return,
    };
    *slot = Some(ctrl);
}

fn attach_fir_controller(fixed: &VatspyData, state: &mut ControllerState, mut ctrl: Controller) {
    let Some(fixed_fir) = fixed.find_fir_by_callsign(&ctrl.callsign) else {
        debug!("can't find FIR by callsign {}", ctrl.callsign);
        return;
    };

    let fir = state
        .firs
        .entry(fixed_fir.icao.clone())
        .or_insert_with(|| Fir::new(fixed_fir.clone()));

    let control_name = fixed
        .find_country_by_icao(&fir.fixed.icao)
        .and_then(|country| country.custom_control_name.as_deref())
        .unwrap_or("Radar");
    ctrl.human_readable = Some(format!("{} {}", fir.fixed.name, control_name));

    // Positioned controller records need a boundary centroid. A FIR without
    // boundaries still lists the controller, but no ctrl record is emitted.
    match &fir.fixed.boundaries {
        Some(bounds) => {
            let position = VersionedPoint {
                lat: bounds.center.lat,
                lng: bounds.center.lng,
            };
            state.controllers.insert(
                ctrl.callsign.clone(),
                StoredController::new(ctrl.clone(), position),
            );
        }
        None => debug!(
            "fir {} has no boundaries, skipping positioned record for {}",
            fir.fixed.icao, ctrl.callsign
        ),
    }

    fir.controllers.insert(ctrl.callsign.clone(), ctrl);
}
