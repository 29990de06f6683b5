//! Built-in mock fleet used when a session starts without a snapshot.

use crate::store::FleetStore;
use chrono::{DateTime, NaiveDate, Utc};
use fleetdesk_schema::{
    CnhCategory, Driver, DriverId, DriverRole, FuelLevel, FuelLog, FuelLogId, FuelType,
    GpsStatus, IncidentId, IncidentLocation, IncidentReport, IncidentSeverity, IncidentType,
    LastLocation, MaintenanceSchedule, MaintenanceStatus, Message, MessageId, MessageTarget,
    ScheduleId, Trip, TripId, User, UserId, UserRole, Vehicle, VehicleId, VehicleStatus,
    VehicleType,
};

/// Driver the single-driver field view acts as.
pub const DEFAULT_DRIVER_ID: &str = "DRV-001";
/// User account the office view acts as (a manager).
pub const DEFAULT_USER_ID: &str = "USR-002";

fn utc(s: &str) -> DateTime<Utc> {
    s.parse().unwrap_or_default()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn vehicle(
    id: &str,
    status: VehicleStatus,
    location: &str,
    (brand, model, plate): (&str, &str, &str),
    fuel_type: FuelType,
    year: u16,
    vehicle_type: VehicleType,
    has_arla32: bool,
    driver: Option<&str>,
    mileage: u64,
    fuel_level: FuelLevel,
) -> Vehicle {
    Vehicle {
        id: VehicleId::new(id),
        status,
        location: location.to_owned(),
        model: model.to_owned(),
        brand: brand.to_owned(),
        license_plate: plate.to_owned(),
        fuel_type,
        year,
        vehicle_type,
        has_arla32,
        current_driver_id: driver.map(DriverId::new),
        mileage,
        fuel_level,
        handover_to_driver_id: None,
        handover_justification: None,
        last_location: None,
        gps_status: None,
    }
}

fn vehicles() -> Vec<Vehicle> {
    let mut car = vehicle(
        "CAR-001",
        VehicleStatus::InUse,
        "Houston, TX",
        ("Fiat", "Palio", "DW19A94"),
        FuelType::Flex,
        2008,
        VehicleType::LightCar,
        false,
        Some("DRV-001"),
        130_100,
        FuelLevel::Half,
    );
    car.gps_status = Some(GpsStatus::Active);

    let mut van = vehicle(
        "VAN-001",
        VehicleStatus::Available,
        "Phoenix, AZ",
        ("Renault", "Oroch", "TCY4F88"),
        FuelType::Flex,
        2025,
        VehicleType::Pickup,
        true,
        None,
        40_160,
        FuelLevel::ThreeQuarters,
    );
    van.last_location = Some(LastLocation {
        timestamp: "18/08/2025, 17:28:57".to_owned(),
        address: "Phoenix, AZ".to_owned(),
    });

    vec![
        car,
        vehicle(
            "TRK-001",
            VehicleStatus::Available,
            "New York, NY",
            ("Volvo", "VNL 860", "ABC-1234"),
            FuelType::S10Diesel,
            2022,
            VehicleType::Truck,
            true,
            None,
            120_500,
            FuelLevel::Full,
        ),
        van,
        vehicle(
            "VAN-002",
            VehicleStatus::Available,
            "Garagem",
            ("Renault", "Oroch", "RNP6J45"),
            FuelType::Flex,
            2022,
            VehicleType::Pickup,
            false,
            None,
            215_358,
            FuelLevel::Full,
        ),
    ]
}

fn drivers() -> Vec<Driver> {
    let rows = [
        (
            "DRV-001",
            "Carlos Pereira",
            "carlos.p@example.com",
            "(11) 98765-4321",
            "Rua das Flores, 123, São Paulo, SP",
            "123456789",
            "2025-10-15",
            DriverRole::Driver,
            CnhCategory::AB,
        ),
        (
            "DRV-002",
            "Fernanda Lima",
            "fernanda.l@example.com",
            "(21) 91234-5678",
            "Avenida Copacabana, 456, Rio de Janeiro, RJ",
            "987654321",
            "2026-05-20",
            DriverRole::Driver,
            CnhCategory::D,
        ),
        (
            "DRV-003",
            "Ricardo Alves",
            "ricardo.a@example.com",
            "(31) 95555-4444",
            "Praça da Liberdade, 789, Belo Horizonte, MG",
            "112233445",
            "2024-12-01",
            DriverRole::TractorOperator,
            CnhCategory::C,
        ),
        (
            "DRV-004",
            "Juliana Costa",
            "juliana.c@example.com",
            "(51) 93333-2222",
            "Rua dos Andradas, 101, Porto Alegre, RS",
            "556677889",
            "2027-02-28",
            DriverRole::MachineOperator,
            CnhCategory::E,
        ),
    ];
    rows.into_iter()
        .map(
            |(id, name, email, phone, address, cnh, expiration, role, category)| Driver {
                id: DriverId::new(id),
                name: name.to_owned(),
                email: email.to_owned(),
                phone: phone.to_owned(),
                address: address.to_owned(),
                cnh_number: cnh.to_owned(),
                cnh_expiration: date(expiration),
                role,
                cnh_category: category,
            },
        )
        .collect()
}

fn trips() -> Vec<Trip> {
    vec![
        Trip {
            id: TripId::new("TRIP-001"),
            vehicle_id: VehicleId::new("CAR-001"),
            driver_id: DriverId::new("DRV-001"),
            start_time: utc("2024-08-10T08:00:00Z"),
            end_time: None,
            start_mileage: 130_100,
            end_mileage: None,
            start_fuel_level: FuelLevel::Full,
            end_fuel_level: None,
            origin: None,
            destination: "Rio de Janeiro, RJ".to_owned(),
            purpose: "Entrega Cliente A".to_owned(),
            is_paused: false,
        },
        Trip {
            id: TripId::new("TRIP-002"),
            vehicle_id: VehicleId::new("VAN-001"),
            driver_id: DriverId::new("DRV-002"),
            start_time: utc("2024-08-11T10:00:00Z"),
            end_time: Some(utc("2024-08-11T12:15:00Z")),
            start_mileage: 40_000,
            end_mileage: Some(40_160),
            start_fuel_level: FuelLevel::ThreeQuarters,
            end_fuel_level: Some(FuelLevel::Half),
            origin: Some("Phoenix, AZ".to_owned()),
            destination: "Tucson, AZ".to_owned(),
            purpose: "Visita Técnica".to_owned(),
            is_paused: false,
        },
    ]
}

fn fuel_logs() -> Vec<FuelLog> {
    let rows = [
        ("FUEL-001", "CAR-001", "DRV-001", "2024-08-12", 40.0, 5.90, 236.00, 129_500, "Gasolina", Some("Posto Shell")),
        ("FUEL-002", "VAN-001", "DRV-002", "2024-08-11", 60.0, 6.10, 366.00, 40_000, "Etanol", None),
        ("FUEL-003", "TRK-001", "DRV-003", "2024-08-10", 200.0, 5.75, 1150.00, 120_000, "Diesel S10", Some("Posto Ipiranga")),
    ];
    rows.into_iter()
        .map(
            |(id, vehicle, driver, day, liters, price, total, mileage, fuel, station)| FuelLog {
                id: FuelLogId::new(id),
                vehicle_id: VehicleId::new(vehicle),
                driver_id: DriverId::new(driver),
                date: date(day),
                liters,
                price_per_liter: price,
                total_cost: total,
                mileage,
                record_type: "Combustível".to_owned(),
                fuel_type: fuel.to_owned(),
                fuel_station: station.map(str::to_owned),
                receipt_photo_filename: None,
                receipt_file_filename: None,
            },
        )
        .collect()
}

fn incident_reports() -> Vec<IncidentReport> {
    vec![IncidentReport {
        id: IncidentId::new("INC-001"),
        vehicle_id: VehicleId::new("CAR-001"),
        driver_id: DriverId::new("DRV-002"),
        date: utc("2024-08-14T07:00:00Z"),
        description: "Arranhão profundo na lateral direita do para-choque.".to_owned(),
        severity: IncidentSeverity::Low,
        kind: IncidentType::Scratch,
        location: IncidentLocation::FrontBumper,
        photo_filenames: Vec::new(),
        document_filenames: Vec::new(),
    }]
}

fn schedules() -> Vec<MaintenanceSchedule> {
    vec![
        MaintenanceSchedule {
            id: ScheduleId::new("SCH-001"),
            vehicle_id: VehicleId::new("CAR-001"),
            workshop: "Oficina Central".to_owned(),
            workshop_address: Some("Rua do Mecânico, 123".to_owned()),
            workshop_phone: Some("1155551234".to_owned()),
            date_time: utc("2024-07-20T14:00:00Z"),
            description: "Troca de óleo e filtro".to_owned(),
            status: MaintenanceStatus::Completed,
            mileage: Some(128_500),
            cost: Some(250.00),
        },
        MaintenanceSchedule {
            id: ScheduleId::new("SCH-002"),
            vehicle_id: VehicleId::new("TRK-001"),
            workshop: "Point S Pneus".to_owned(),
            workshop_address: Some("Av. das Rodas, 456".to_owned()),
            workshop_phone: None,
            date_time: utc("2024-09-12T09:00:00Z"),
            description: "Alinhamento e balanceamento".to_owned(),
            status: MaintenanceStatus::Scheduled,
            mileage: None,
            cost: None,
        },
    ]
}

fn messages() -> Vec<Message> {
    let rows = [
        (
            "MSG-001",
            "Lembrete de Segurança",
            "Por favor, lembrem-se de realizar a verificação diária dos veículos antes de iniciar a rota.",
            None,
            "2024-08-14T09:00:00Z",
            "2024-08-20T23:59:59Z",
        ),
        (
            "MSG-002",
            "Documentação Pendente",
            "Carlos, por favor, envie a cópia atualizada da sua CNH para o RH até o final da semana.",
            Some("DRV-001"),
            "2024-08-13T14:30:00Z",
            "2024-08-18T23:59:59Z",
        ),
        (
            "MSG-003",
            "Manutenção Agendada (Expirada)",
            "Lembrete de manutenção para o veículo TRK-001.",
            None,
            "2024-08-01T10:00:00Z",
            "2024-08-05T23:59:59Z",
        ),
    ];
    rows.into_iter()
        .map(|(id, title, content, target, created, expires)| Message {
            id: MessageId::new(id),
            title: title.to_owned(),
            content: content.to_owned(),
            target: target.map_or(MessageTarget::All, |d| MessageTarget::Driver(DriverId::new(d))),
            author: "Admin".to_owned(),
            created_at: utc(created),
            expires_at: utc(expires),
        })
        .collect()
}

fn users() -> Vec<User> {
    [
        ("USR-001", "admin@fromtamax.com", UserRole::SuperAdmin),
        ("USR-002", "gerente@fromtamax.com", UserRole::Manager),
        ("USR-003", "carlos.p@example.com", UserRole::Driver),
    ]
    .into_iter()
    .map(|(id, email, role)| User {
        id: UserId::new(id),
        email: email.to_owned(),
        role,
    })
    .collect()
}

/// A store holding the built-in mock fleet.
pub fn seeded() -> FleetStore {
    let mut store = FleetStore::new();
    store.vehicles = vehicles().into_iter().map(|v| (v.id.clone(), v)).collect();
    store.drivers = drivers().into_iter().map(|d| (d.id.clone(), d)).collect();
    store.users = users().into_iter().map(|u| (u.id.clone(), u)).collect();
    store.trips = trips();
    store.fuel_logs = fuel_logs();
    store.incident_reports = incident_reports();
    store.schedules = schedules();
    store.messages = messages();
    store
}

impl FleetStore {
    pub fn seeded() -> Self {
        seeded()
    }
}
