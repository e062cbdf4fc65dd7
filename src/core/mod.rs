pub mod markup;
pub mod record;
pub mod store;

pub use crate::domain::model::{Engine, Transmission, Vehicle, VehicleKind, Wheel};
pub use crate::domain::ports::{DecodePolicy, Storage, VehicleCodec};
pub use crate::utils::error::Result;

use crate::utils::error::ErrorCategory;

/// Gathers decoded entries under `policy`. Under `Abort` the first failing
/// entry stops iteration; under `Skip` data errors are logged and dropped.
pub(crate) fn collect_entries<I>(
    format: &str,
    policy: DecodePolicy,
    entries: I,
) -> Result<Vec<Vehicle>>
where
    I: IntoIterator<Item = Result<Vehicle>>,
{
    let mut vehicles = Vec::new();
    let mut skipped = 0usize;

    for (index, entry) in entries.into_iter().enumerate() {
        match entry {
            Ok(vehicle) => {
                tracing::debug!("Decoded {} entry {} as {}", format, index, vehicle.tag());
                vehicles.push(vehicle);
            }
            Err(e) if policy == DecodePolicy::Skip && e.category() == ErrorCategory::Data => {
                tracing::warn!("⚠️ Skipping {} entry {}: {}", format, index, e);
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} malformed {} entries", skipped, format);
    }

    Ok(vehicles)
}
