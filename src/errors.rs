/// Typed failures from the availability engine and its configuration.
///
/// `InvalidConfiguration` is fatal to the call that raised it and propagates
/// to the caller. `InvalidReservation` is recovered locally by skipping the
/// offending record; the skip is reported as a diagnostic, never swallowed.
/// `UnknownBuilding` downgrades registry-backed lookups to reservation-derived
/// data only.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid reservation for room {room}: {reason}")]
    InvalidReservation { room: String, reason: String },

    #[error("unknown building: {0}")]
    UnknownBuilding(String),
}
