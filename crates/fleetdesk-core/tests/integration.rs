use chrono::{DateTime, Utc};
use fleetdesk_core::{
    ChecklistConfirmation, Command, CoreError, Engine, EngineConfig, FixedClock,
    MissingTripPolicy, Session,
};
use fleetdesk_schema::{
    CnhCategory, Driver, DriverId, DriverRole, FuelLevel, FuelType, TripId, TripPatch, Vehicle,
    VehicleId, VehicleStatus, VehicleType,
};
use fleetdesk_store::{verify_fleet_integrity, FleetSnapshot, FleetStore};

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn driver(id: &str, name: &str) -> Driver {
    Driver {
        id: DriverId::new(id),
        name: name.to_owned(),
        email: format!("{}@example.com", id.to_lowercase()),
        phone: "(11) 90000-0000".to_owned(),
        address: "São Paulo, SP".to_owned(),
        cnh_number: "000000000".to_owned(),
        cnh_expiration: "2030-01-01".parse().unwrap(),
        role: DriverRole::Driver,
        cnh_category: CnhCategory::B,
    }
}

fn car(id: &str, mileage: u64) -> Vehicle {
    Vehicle {
        id: VehicleId::new(id),
        status: VehicleStatus::Available,
        location: "São Paulo, SP".to_owned(),
        model: "Palio".to_owned(),
        brand: "Fiat".to_owned(),
        license_plate: "DW19A94".to_owned(),
        fuel_type: FuelType::Flex,
        year: 2008,
        vehicle_type: VehicleType::LightCar,
        has_arla32: false,
        current_driver_id: None,
        mileage,
        fuel_level: FuelLevel::Full,
        handover_to_driver_id: None,
        handover_justification: None,
        last_location: None,
        gps_status: None,
    }
}

/// CAR-001 available at 100000 km, drivers DRV-001..003, no trips.
fn small_fleet() -> FleetStore {
    let mut store = FleetStore::new();
    store.add_vehicle(car("CAR-001", 100_000)).unwrap();
    store.add_driver(driver("DRV-001", "Carlos Pereira")).unwrap();
    store.add_driver(driver("DRV-002", "Fernanda Lima")).unwrap();
    store.add_driver(driver("DRV-003", "Ricardo Alves")).unwrap();
    store
}

fn engine_at(store: FleetStore, config: EngineConfig, now: &str) -> Engine {
    Engine::with_clock(store, config, Box::new(FixedClock(at(now))))
}

fn engine(store: FleetStore) -> Engine {
    engine_at(store, EngineConfig::default(), "2024-08-15T08:00:00Z")
}

/// CAR-001 checked out by DRV-001 at 100000 km.
fn in_use_engine() -> Engine {
    let mut engine = engine(small_fleet());
    engine
        .check_out("CAR-001", "DRV-001", 100_000, FuelLevel::Full, "SP", "delivery")
        .unwrap();
    engine
}

fn assert_coupled(store: &FleetStore) {
    let report = verify_fleet_integrity(store);
    assert!(report.is_clean(), "integrity failures: {:?}", report.failed);
    for vehicle in store.vehicles() {
        assert_eq!(
            vehicle.current_driver_id.is_some(),
            vehicle.status.requires_driver(),
            "driver coupling broken on {}",
            vehicle.id
        );
        assert_eq!(
            vehicle.handover_to_driver_id.is_some(),
            vehicle.status == VehicleStatus::PendingHandover,
            "handover coupling broken on {}",
            vehicle.id
        );
        let open = store
            .trips()
            .iter()
            .filter(|t| t.vehicle_id == vehicle.id && t.is_open())
            .count();
        assert!(open <= 1, "{} has {open} open trips", vehicle.id);
    }
}

#[test]
fn checkout_then_checkin_scenario() {
    let mut engine = engine(small_fleet());

    engine
        .check_out("CAR-001", "DRV-001", 100_000, FuelLevel::Full, "SP", "delivery")
        .unwrap();
    let car = engine.store().vehicle("CAR-001").unwrap();
    assert_eq!(car.status, VehicleStatus::InUse);
    assert_eq!(car.current_driver_id.as_deref(), Some("DRV-001"));
    let trip = engine.store().open_trip_for("CAR-001").unwrap().clone();
    assert_eq!(trip.start_mileage, 100_000);
    assert!(trip.end_time.is_none());
    assert_eq!(trip.origin.as_deref(), Some("Garagem"));
    assert_coupled(engine.store());

    engine.check_in("CAR-001", 100_250, FuelLevel::Half).unwrap();
    let car = engine.store().vehicle("CAR-001").unwrap();
    assert_eq!(car.status, VehicleStatus::Available);
    assert!(car.current_driver_id.is_none());
    assert_eq!(car.mileage, 100_250);
    assert_eq!(car.fuel_level, FuelLevel::Half);

    let closed = engine.store().trip(&trip.id).unwrap();
    assert!(closed.end_time.is_some());
    assert_eq!(closed.end_mileage, Some(100_250));
    assert_eq!(closed.end_fuel_level, Some(FuelLevel::Half));
    assert_eq!(closed.distance(), Some(250));
    assert!(engine.store().open_trip_for("CAR-001").is_none());
    assert_coupled(engine.store());
}

#[test]
fn handover_scenario() {
    let mut engine = in_use_engine();
    let first_trip = engine.store().open_trip_for("CAR-001").unwrap().id.clone();

    engine
        .initiate_handover("CAR-001", "DRV-002", "shift end")
        .unwrap();
    let car = engine.store().vehicle("CAR-001").unwrap();
    assert_eq!(car.status, VehicleStatus::PendingHandover);
    assert_eq!(car.handover_to_driver_id.as_deref(), Some("DRV-002"));
    assert_eq!(car.handover_justification.as_deref(), Some("shift end"));
    assert_eq!(car.current_driver_id.as_deref(), Some("DRV-001"));
    assert_eq!(engine.store().open_trip_for("CAR-001").unwrap().id, first_trip);
    assert_coupled(engine.store());

    let carlos = DriverId::new("DRV-001");
    let fernanda = DriverId::new("DRV-002");
    let inbox: Vec<_> = engine
        .store()
        .pending_handovers_for(&fernanda)
        .map(|v| v.id.as_str())
        .collect();
    assert_eq!(inbox, vec!["CAR-001"]);
    let outbox: Vec<_> = engine
        .store()
        .pending_handovers_by(&carlos)
        .map(|v| v.id.as_str())
        .collect();
    assert_eq!(outbox, vec!["CAR-001"]);
    assert_eq!(engine.store().pending_handovers_for(&carlos).count(), 0);
    assert_eq!(engine.store().pending_handovers_by(&fernanda).count(), 0);

    let trips_before = engine.store().trips().len();
    let outcome = engine
        .accept_handover("CAR-001", 100_300, FuelLevel::ThreeQuarters, "RJ", "pickup")
        .unwrap();
    assert_eq!(outcome.closed_trip.as_ref(), Some(&first_trip));

    let old = engine.store().trip(&first_trip).unwrap();
    assert!(old.end_time.is_some());
    assert_eq!(old.end_mileage, Some(100_300));

    let new = engine.store().open_trip_for("CAR-001").unwrap();
    assert_eq!(Some(&new.id), outcome.opened_trip.as_ref());
    assert_eq!(new.driver_id, "DRV-002");
    assert_eq!(new.start_mileage, 100_300);
    assert_eq!(new.start_fuel_level, FuelLevel::ThreeQuarters);
    assert_eq!(new.destination, "RJ");

    let car = engine.store().vehicle("CAR-001").unwrap();
    assert_eq!(car.status, VehicleStatus::InUse);
    assert_eq!(car.current_driver_id.as_deref(), Some("DRV-002"));
    assert!(car.handover_to_driver_id.is_none());
    assert!(car.handover_justification.is_none());
    assert_eq!(engine.store().trips().len(), trips_before + 1);
    assert_eq!(engine.store().pending_handovers_for(&fernanda).count(), 0);
    assert_coupled(engine.store());
}

#[test]
fn closing_before_trip_start_is_rejected() {
    let mut engine = engine_at(
        FleetStore::seeded(),
        EngineConfig::default(),
        "2000-01-01T00:00:00Z",
    );
    let before = engine.store().vehicle("CAR-001").unwrap().clone();

    let err = engine
        .check_in("CAR-001", 200_000, FuelLevel::Half)
        .unwrap_err();
    assert!(matches!(err, CoreError::ClockRegression { .. }), "{err}");

    engine
        .initiate_handover("CAR-001", "DRV-002", "fim de turno")
        .unwrap();
    let err = engine
        .accept_handover("CAR-001", 200_000, FuelLevel::Half, "RJ", "coleta")
        .unwrap_err();
    assert!(matches!(err, CoreError::ClockRegression { .. }), "{err}");

    let trip = engine.store().open_trip_for("CAR-001").unwrap();
    assert_eq!(trip.id, "TRIP-001");
    assert!(trip.end_time.is_none());
    assert_eq!(engine.store().vehicle("CAR-001").unwrap().mileage, before.mileage);
    assert_coupled(engine.store());
}

#[test]
fn handover_reject_round_trip() {
    let mut engine = in_use_engine();
    let before = engine.store().vehicle("CAR-001").unwrap().clone();
    let trips_before = engine.store().trips().to_vec();

    engine
        .initiate_handover("CAR-001", "DRV-002", "shift end")
        .unwrap();
    engine.reject_handover("CAR-001").unwrap();

    assert_eq!(engine.store().vehicle("CAR-001").unwrap(), &before);
    assert_eq!(engine.store().trips(), trips_before.as_slice());
}

#[test]
fn illegal_transitions_change_nothing() {
    let mut engine = in_use_engine();
    let before = engine.store().vehicle("CAR-001").unwrap().clone();
    let trips_before = engine.store().trips().to_vec();

    let attempts: Vec<Result<_, CoreError>> = vec![
        engine.check_out("CAR-001", "DRV-002", 100_000, FuelLevel::Full, "SP", "x"),
        engine.accept_handover("CAR-001", 100_100, FuelLevel::Full, "SP", "x"),
        engine.reject_handover("CAR-001"),
    ];
    for result in attempts {
        assert!(matches!(result, Err(CoreError::InvalidTransition { .. })));
    }
    assert_eq!(engine.store().vehicle("CAR-001").unwrap(), &before);
    assert_eq!(engine.store().trips(), trips_before.as_slice());
}

#[test]
fn second_initiate_fails_and_keeps_first_proposal() {
    let mut engine = in_use_engine();
    engine
        .initiate_handover("CAR-001", "DRV-002", "shift end")
        .unwrap();
    let err = engine
        .initiate_handover("CAR-001", "DRV-003", "other")
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));
    let car = engine.store().vehicle("CAR-001").unwrap();
    assert_eq!(car.handover_to_driver_id.as_deref(), Some("DRV-002"));
}

#[test]
fn check_in_of_available_vehicle_fails() {
    let mut engine = engine(small_fleet());
    let err = engine
        .check_in("CAR-001", 100_100, FuelLevel::Half)
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));
}

#[test]
fn check_in_during_pending_handover_fails() {
    let mut engine = in_use_engine();
    engine
        .initiate_handover("CAR-001", "DRV-002", "shift end")
        .unwrap();
    let err = engine
        .check_in("CAR-001", 100_100, FuelLevel::Half)
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));
}

#[test]
fn maintenance_vehicle_rejects_every_command() {
    let mut store = small_fleet();
    store.set_maintenance("CAR-001", true).unwrap();
    let mut engine = engine(store);

    assert!(engine
        .check_out("CAR-001", "DRV-001", 100_000, FuelLevel::Full, "SP", "x")
        .is_err());
    assert!(engine.check_in("CAR-001", 100_000, FuelLevel::Full).is_err());
    assert!(engine.initiate_handover("CAR-001", "DRV-002", "x").is_err());
    assert!(engine.reject_handover("CAR-001").is_err());
    assert_eq!(
        engine.store().vehicle("CAR-001").unwrap().status,
        VehicleStatus::Maintenance
    );
}

#[test]
fn missing_open_trip_fails_loudly_by_default() {
    let mut engine = in_use_engine();
    let trip = engine.store().open_trip_for("CAR-001").unwrap().id.clone();
    close_behind_engines_back(engine.store_mut(), &trip);

    let before = engine.store().vehicle("CAR-001").unwrap().clone();
    let err = engine
        .check_in("CAR-001", 100_200, FuelLevel::Half)
        .unwrap_err();
    assert!(matches!(err, CoreError::NoActiveTrip(_)));
    assert_eq!(engine.store().vehicle("CAR-001").unwrap(), &before);
}

#[test]
fn missing_open_trip_proceeds_when_permitted() {
    let config = EngineConfig::default().with_missing_trip_policy(MissingTripPolicy::Proceed);
    let mut engine = engine_at(small_fleet(), config, "2024-08-15T08:00:00Z");
    engine
        .check_out("CAR-001", "DRV-001", 100_000, FuelLevel::Full, "SP", "delivery")
        .unwrap();
    engine
        .initiate_handover("CAR-001", "DRV-002", "shift end")
        .unwrap();
    let trip = engine.store().open_trip_for("CAR-001").unwrap().id.clone();
    close_behind_engines_back(engine.store_mut(), &trip);

    let outcome = engine
        .accept_handover("CAR-001", 100_300, FuelLevel::Half, "RJ", "pickup")
        .unwrap();
    assert!(outcome.closed_trip.is_none());
    assert!(outcome.opened_trip.is_some());
    assert_coupled(engine.store());
}

fn close_behind_engines_back(store: &mut FleetStore, trip: &TripId) {
    store
        .apply_trip_patch(
            trip,
            TripPatch::close(at("2024-08-15T09:00:00Z"), 100_050, None),
        )
        .unwrap();
}

#[test]
fn mileage_never_moves_backwards() {
    let mut engine = in_use_engine();
    let err = engine
        .check_in("CAR-001", 99_000, FuelLevel::Half)
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::MileageRegression {
            current: 100_000,
            reported: 99_000,
            ..
        }
    ));
    assert_eq!(
        engine.store().vehicle("CAR-001").unwrap().status,
        VehicleStatus::InUse
    );
}

#[test]
fn pause_toggles_open_trip_only() {
    let mut engine = in_use_engine();
    assert_eq!(engine.toggle_trip_pause("CAR-001").unwrap().paused, Some(true));
    assert!(engine.store().open_trip_for("CAR-001").unwrap().is_paused);

    engine.check_in("CAR-001", 100_100, FuelLevel::Half).unwrap();
    let closed = &engine.store().trips()[0];
    assert!(!closed.is_paused);

    let outcome = engine.toggle_trip_pause("CAR-001").unwrap();
    assert!(outcome.paused.is_none());
    assert!(!engine.store().trips()[0].is_paused);
}

#[test]
fn trip_ids_are_unique_within_one_instant() {
    let mut store = small_fleet();
    store.add_vehicle(car("CAR-002", 5_000)).unwrap();
    let mut engine = engine(store);
    engine
        .check_out("CAR-001", "DRV-001", 100_000, FuelLevel::Full, "SP", "a")
        .unwrap();
    engine
        .check_out("CAR-002", "DRV-002", 5_000, FuelLevel::Full, "SP", "b")
        .unwrap();
    let trips = engine.store().trips();
    assert_eq!(trips.len(), 2);
    assert_eq!(trips[0].start_time, trips[1].start_time);
    assert_ne!(trips[0].id, trips[1].id);
}

#[test]
fn long_random_walk_keeps_invariants() {
    let mut store = small_fleet();
    store.add_vehicle(car("CAR-002", 50_000)).unwrap();
    let mut engine = engine(store);
    let drivers = ["DRV-001", "DRV-002", "DRV-003"];
    let vehicles = ["CAR-001", "CAR-002"];
    let mut mileage = 100_000;

    // Deterministic pseudo-random sequence of commands; failures are fine,
    // broken invariants are not.
    let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
    for _ in 0..400 {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let vehicle = vehicles[(seed % 2) as usize];
        let driver = drivers[((seed >> 8) % 3) as usize];
        mileage += 10;
        let _ = match (seed >> 16) % 6 {
            0 => engine.check_out(vehicle, driver, mileage, FuelLevel::Full, "SP", "x"),
            1 => engine.check_in(vehicle, mileage, FuelLevel::Half),
            2 => engine.initiate_handover(vehicle, driver, "troca"),
            3 => engine.accept_handover(vehicle, mileage, FuelLevel::Half, "RJ", "y"),
            4 => engine.reject_handover(vehicle),
            _ => engine.toggle_trip_pause(vehicle),
        };
        assert_coupled(engine.store());
    }
}

#[test]
fn checked_execution_requires_full_checklist() {
    let mut engine = engine(small_fleet());
    let cmd = Command::CheckOut {
        vehicle: VehicleId::new("CAR-001"),
        driver: DriverId::new("DRV-001"),
        start_mileage: 100_000,
        start_fuel_level: FuelLevel::Full,
        destination: "SP".to_owned(),
        purpose: "delivery".to_owned(),
    };
    let mut partial = ChecklistConfirmation::new();
    partial.confirm("Pneus em bom estado e calibrados");
    let err = engine.execute_checked(&cmd, &partial).unwrap_err();
    match err {
        CoreError::IncompleteChecklist(missing) => assert_eq!(missing.len(), 7),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        engine.store().vehicle("CAR-001").unwrap().status,
        VehicleStatus::Available
    );

    let all = ChecklistConfirmation::all(engine.config().checklist.clone());
    engine.execute_checked(&cmd, &all).unwrap();
}

#[test]
fn session_survives_snapshot_export_and_import() {
    let script = r#"
[[step]]
action = "check-out"
vehicle = "CAR-001"
driver = "DRV-001"
start_mileage = 100000
start_fuel_level = "Full"
destination = "SP"
purpose = "delivery"
confirm_checklist = true

[[step]]
action = "initiate-handover"
vehicle = "CAR-001"
target_driver = "DRV-002"
justification = "shift end"
"#;
    let mut engine = engine(small_fleet());
    let report = Session::from_toml(script).unwrap().run(&mut engine);
    assert!(report.is_success());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    engine
        .store()
        .to_snapshot(at("2024-08-15T09:00:00Z"))
        .write_to_file(&path)
        .unwrap();

    let restored = FleetStore::from_snapshot(FleetSnapshot::read_from_file(&path).unwrap()).unwrap();
    let mut engine = engine_at(restored, EngineConfig::default(), "2024-08-15T10:00:00Z");
    engine
        .accept_handover("CAR-001", 100_300, FuelLevel::ThreeQuarters, "RJ", "pickup")
        .unwrap();
    assert_eq!(engine.store().trips().len(), 2);

    // The restored sequence still yields fresh ids.
    let ids: Vec<_> = engine.store().trips().iter().map(|t| t.id.clone()).collect();
    assert_ne!(ids[0], ids[1]);
    assert_coupled(engine.store());
}
