//! Newtype wrappers for entity identifiers, providing compile-time type safety.
//!
//! All newtypes serialize/deserialize as plain strings so snapshots stay
//! readable and ids match the ones shown to operators (`CAR-001`, `DRV-002`).

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance from a string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Return the inner string as a slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

id_newtype!(
    /// Fleet vehicle identifier, e.g. `CAR-001`.
    VehicleId
);

id_newtype!(
    /// Driver identifier, e.g. `DRV-001`.
    DriverId
);

id_newtype!(
    /// Trip identifier. Engine-assigned ids use the `TRIP-` prefix.
    TripId
);

id_newtype!(
    /// Fuel log identifier (`FUEL-` prefix).
    FuelLogId
);

id_newtype!(
    /// Incident report identifier (`INC-` prefix).
    IncidentId
);

id_newtype!(
    /// Maintenance schedule identifier (`SCH-` prefix).
    ScheduleId
);

id_newtype!(
    /// Internal message identifier (`MSG-` prefix).
    MessageId
);

id_newtype!(
    /// Dashboard user account identifier (`USR-` prefix).
    UserId
);
