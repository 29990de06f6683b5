//! Drivers and dashboard user accounts.

use crate::types::{DriverId, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DriverRole {
    Driver,
    TractorOperator,
    MachineOperator,
}

impl fmt::Display for DriverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverRole::Driver => write!(f, "driver"),
            DriverRole::TractorOperator => write!(f, "tractor operator"),
            DriverRole::MachineOperator => write!(f, "machine operator"),
        }
    }
}

/// Combined CNH (Brazilian driving licence) category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CnhCategory {
    A,
    B,
    C,
    D,
    E,
    AB,
    AC,
    AD,
    AE,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub cnh_number: String,
    pub cnh_expiration: NaiveDate,
    pub role: DriverRole,
    pub cnh_category: CnhCategory,
}

impl Driver {
    /// A licence is valid through its expiration day.
    pub fn license_expired(&self, on: NaiveDate) -> bool {
        on > self.cnh_expiration
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UserRole {
    SuperAdmin,
    Admin,
    Manager,
    Driver,
}

impl UserRole {
    /// Office roles may register, edit and delete fleet records.
    ///
    /// This is a presentation-level check; the lifecycle engine does not
    /// consult it.
    pub fn can_manage(self) -> bool {
        self != UserRole::Driver
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::SuperAdmin => write!(f, "super admin"),
            UserRole::Admin => write!(f, "admin"),
            UserRole::Manager => write!(f, "manager"),
            UserRole::Driver => write!(f, "driver"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
}
