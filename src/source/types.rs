use serde::{Deserialize, Serialize};

/// An inspection vehicle as exposed by the `cars` table.
///
/// Identity is `id_unico`; nothing else is unique within a loaded set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub id_unico: String,
    pub name: String,
    pub model: String,
    pub license_plate: String,
}

impl Vehicle {
    pub fn new(
        id_unico: impl Into<String>,
        name: impl Into<String>,
        model: impl Into<String>,
        license_plate: impl Into<String>,
    ) -> Self {
        Self {
            id_unico: id_unico.into(),
            name: name.into(),
            model: model.into(),
            license_plate: license_plate.into(),
        }
    }

    /// Primary display text, e.g. "Inspection Vehicle 1 Toyota Hilux".
    pub fn label(&self) -> String {
        format!("{} {}", self.name, self.model)
    }

    pub fn secondary_label(&self) -> &str {
        &self.license_plate
    }

    /// Case-insensitive substring match across every display field.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [
            &self.id_unico,
            &self.name,
            &self.model,
            &self.license_plate,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}
