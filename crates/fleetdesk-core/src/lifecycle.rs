use crate::CoreError;
use fleetdesk_schema::VehicleStatus;

/// Check that the engine may move a vehicle from `from` to `to`.
///
/// Maintenance has no engine edges; it is entered and left manually.
pub fn validate_transition(
    vehicle: &str,
    from: VehicleStatus,
    to: VehicleStatus,
) -> Result<(), CoreError> {
    let valid = matches!(
        (from, to),
        (VehicleStatus::Available, VehicleStatus::InUse)
            | (
                VehicleStatus::InUse,
                VehicleStatus::Available | VehicleStatus::PendingHandover
            )
            | (VehicleStatus::PendingHandover, VehicleStatus::InUse)
    );

    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            vehicle: vehicle.to_owned(),
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}
