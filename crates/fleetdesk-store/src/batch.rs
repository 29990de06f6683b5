use fleetdesk_schema::{Trip, TripId, TripPatch, VehicleId, VehiclePatch};
use serde::{Deserialize, Serialize};

/// A single change to the lifecycle-owned part of the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mutation {
    PatchVehicle { id: VehicleId, patch: VehiclePatch },
    PatchTrip { id: TripId, patch: TripPatch },
    CreateTrip(Trip),
}

/// An ordered set of mutations that [`crate::FleetStore::apply`] commits
/// together or not at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MutationBatch {
    mutations: Vec<Mutation>,
}

impl MutationBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patch_vehicle(&mut self, id: VehicleId, patch: VehiclePatch) -> &mut Self {
        self.mutations.push(Mutation::PatchVehicle { id, patch });
        self
    }

    pub fn patch_trip(&mut self, id: TripId, patch: TripPatch) -> &mut Self {
        self.mutations.push(Mutation::PatchTrip { id, patch });
        self
    }

    pub fn create_trip(&mut self, trip: Trip) -> &mut Self {
        self.mutations.push(Mutation::CreateTrip(trip));
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mutation> {
        self.mutations.iter()
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// Trips this batch opens.
    pub fn created_trips(&self) -> impl Iterator<Item = &Trip> {
        self.mutations.iter().filter_map(|m| match m {
            Mutation::CreateTrip(trip) => Some(trip),
            _ => None,
        })
    }

    /// Ids of trips this batch closes.
    pub fn closed_trips(&self) -> impl Iterator<Item = &TripId> {
        self.mutations.iter().filter_map(|m| match m {
            Mutation::PatchTrip { id, patch } if patch.end_time.is_some() => Some(id),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a MutationBatch {
    type Item = &'a Mutation;
    type IntoIter = std::slice::Iter<'a, Mutation>;

    fn into_iter(self) -> Self::IntoIter {
        self.mutations.iter()
    }
}
