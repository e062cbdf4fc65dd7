use crate::core::markup::MarkupCodec;
use crate::core::record::RecordCodec;
use crate::domain::model::Vehicle;
use crate::domain::ports::{DecodePolicy, Storage, VehicleCodec};
use crate::utils::error::Result;

/// Ordered, append-only collection of vehicles persisted through a [`Storage`].
pub struct VehicleStorage<S: Storage> {
    storage: S,
    vehicles: Vec<Vehicle>,
    record_codec: RecordCodec,
    markup_codec: MarkupCodec,
}

impl<S: Storage> VehicleStorage<S> {
    pub fn new(storage: S) -> Self {
        Self::with_policy(storage, DecodePolicy::default())
    }

    pub fn with_policy(storage: S, policy: DecodePolicy) -> Self {
        Self {
            storage,
            vehicles: Vec::new(),
            record_codec: RecordCodec::new(policy),
            markup_codec: MarkupCodec::new(policy),
        }
    }

    pub fn add(&mut self, vehicle: Vehicle) {
        tracing::debug!("Adding {} '{}'", vehicle.tag(), vehicle.model());
        self.vehicles.push(vehicle);
    }

    pub fn get_all(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn save_json(&self, path: &str) -> Result<()> {
        self.save_with(&self.record_codec, path)
    }

    pub fn save_xml(&self, path: &str) -> Result<()> {
        self.save_with(&self.markup_codec, path)
    }

    pub fn load_json(&mut self, path: &str) -> Result<usize> {
        let codec = self.record_codec;
        self.load_with(&codec, path)
    }

    pub fn load_xml(&mut self, path: &str) -> Result<usize> {
        let codec = self.markup_codec;
        self.load_with(&codec, path)
    }

    pub fn save_with<C: VehicleCodec>(&self, codec: &C, path: &str) -> Result<()> {
        let data = codec.encode(&self.vehicles)?;
        self.storage.write_file(path, &data)?;

        tracing::info!(
            "💾 Saved {} vehicles to {} ({} bytes, {})",
            self.vehicles.len(),
            path,
            data.len(),
            codec.format_name()
        );
        Ok(())
    }

    /// Replaces the current contents with the decoded document. A missing
    /// source empties the store; any other failure leaves it untouched.
    pub fn load_with<C: VehicleCodec>(&mut self, codec: &C, path: &str) -> Result<usize> {
        let data = match self.storage.read_file(path) {
            Ok(data) => data,
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    "📂 {} file '{}' not found, starting with an empty collection",
                    codec.format_name(),
                    path
                );
                self.vehicles.clear();
                return Ok(0);
            }
            Err(e) => return Err(e),
        };

        let vehicles = codec.decode(&data)?;
        tracing::info!(
            "📥 Loaded {} vehicles from {} ({})",
            vehicles.len(),
            path,
            codec.format_name()
        );

        self.vehicles = vehicles;
        Ok(self.vehicles.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Engine, Transmission, Wheel};
    use crate::utils::error::StoreError;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStorage {
        files: RefCell<HashMap<String, Vec<u8>>>,
    }

    impl Storage for MemoryStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound).into())
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files.borrow_mut().insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn motorcycle(model: &str) -> Vehicle {
        Vehicle::motorcycle(
            model,
            Engine::new("Petrol", 60.0).unwrap(),
            Transmission::new("Manual", 5).unwrap(),
            vec![Wheel::new(17).unwrap(); 2],
            "Touring",
        )
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut store = VehicleStorage::new(MemoryStorage::default());
        assert!(store.is_empty());

        store.add(motorcycle("B"));
        store.add(motorcycle("A"));
        store.add(motorcycle("B"));

        let models: Vec<&str> = store.get_all().iter().map(|v| v.model()).collect();
        assert_eq!(models, vec!["B", "A", "B"]);
    }

    #[test]
    fn test_load_replaces_contents() {
        let mut store = VehicleStorage::new(MemoryStorage::default());
        store.add(motorcycle("Saved"));
        store.save_json("fleet.json").unwrap();

        store.add(motorcycle("Unsaved"));
        assert_eq!(store.len(), 2);

        assert_eq!(store.load_json("fleet.json").unwrap(), 1);
        assert_eq!(store.get_all()[0].model(), "Saved");
    }

    #[test]
    fn test_missing_source_yields_empty_store() {
        let mut store = VehicleStorage::new(MemoryStorage::default());
        store.add(motorcycle("Stale"));

        assert_eq!(store.load_xml("absent.xml").unwrap(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_load_keeps_contents() {
        let storage = MemoryStorage::default();
        storage.write_file("broken.json", b"[{\"type\": \"Car\"}]").unwrap();

        let mut store = VehicleStorage::new(storage);
        store.add(motorcycle("Kept"));

        let err = store.load_json("broken.json").unwrap_err();
        assert!(matches!(err, StoreError::MissingData { .. }));
        assert_eq!(store.len(), 1);
    }
}
