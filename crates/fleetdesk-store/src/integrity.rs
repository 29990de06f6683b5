use crate::store::FleetStore;
use fleetdesk_schema::VehicleId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Default, Serialize)]
pub struct IntegrityReport {
    pub vehicles_checked: usize,
    pub vehicles_passed: usize,
    pub trips_checked: usize,
    pub open_trips: usize,
    pub failed: Vec<IntegrityFailure>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct IntegrityFailure {
    pub entity: String,
    pub reason: String,
}

impl fmt::Display for IntegrityFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.entity, self.reason)
    }
}

/// Check every vehicle and trip against the lifecycle invariants.
///
/// Closed trips may reference vehicles or drivers that have since been
/// deleted. Open trips, current drivers and handover targets may not.
pub fn verify_fleet_integrity(store: &FleetStore) -> IntegrityReport {
    let mut report = IntegrityReport {
        vehicles_checked: store.vehicles.len(),
        trips_checked: store.trips.len(),
        ..IntegrityReport::default()
    };

    let mut open_by_vehicle: BTreeMap<&VehicleId, Vec<&str>> = BTreeMap::new();
    for trip in store.trips.iter().filter(|t| t.is_open()) {
        report.open_trips += 1;
        open_by_vehicle
            .entry(&trip.vehicle_id)
            .or_default()
            .push(trip.id.as_str());
        if !store.vehicles.contains_key(&trip.vehicle_id) {
            report.failed.push(IntegrityFailure {
                entity: trip.id.to_string(),
                reason: format!("open trip references unknown vehicle {}", trip.vehicle_id),
            });
        }
    }
    for trip in &store.trips {
        if let Some(end) = trip.end_time {
            if end < trip.start_time {
                report.failed.push(IntegrityFailure {
                    entity: trip.id.to_string(),
                    reason: format!("ends at {end} before its start {}", trip.start_time),
                });
            }
        }
        if let Some(end) = trip.end_mileage {
            if end < trip.start_mileage {
                report.failed.push(IntegrityFailure {
                    entity: trip.id.to_string(),
                    reason: format!(
                        "end mileage {end} is below start mileage {}",
                        trip.start_mileage
                    ),
                });
            }
        }
    }

    for vehicle in store.vehicles.values() {
        let before = report.failed.len();

        if let Err(reason) = vehicle.check_coupling() {
            report.failed.push(IntegrityFailure {
                entity: vehicle.id.to_string(),
                reason,
            });
        }
        for (slot, driver) in [
            ("current driver", &vehicle.current_driver_id),
            ("handover target", &vehicle.handover_to_driver_id),
        ] {
            if let Some(driver) = driver {
                if !store.drivers.contains_key(driver) {
                    report.failed.push(IntegrityFailure {
                        entity: vehicle.id.to_string(),
                        reason: format!("{slot} {driver} is not a known driver"),
                    });
                }
            }
        }

        if let Some(open) = open_by_vehicle.get(&vehicle.id) {
            if open.len() > 1 {
                report.failed.push(IntegrityFailure {
                    entity: vehicle.id.to_string(),
                    reason: format!("{} open trips: {}", open.len(), open.join(", ")),
                });
            }
            for trip_id in open {
                if let Ok(trip) = store.trip(trip_id) {
                    if vehicle.current_driver_id.as_ref() != Some(&trip.driver_id) {
                        report.failed.push(IntegrityFailure {
                            entity: vehicle.id.to_string(),
                            reason: format!(
                                "open trip {} belongs to {}, not the current holder",
                                trip.id, trip.driver_id
                            ),
                        });
                    }
                }
            }
        }

        if report.failed.len() == before {
            report.vehicles_passed += 1;
        }
    }

    report
}
