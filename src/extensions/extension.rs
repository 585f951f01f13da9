use serde::{Deserialize, Serialize};

/// A user-defined concept layered on top of the base vocabulary. The
/// `concept` is the storage key, already compounded with underscores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub concept: String,
    pub vector: Vec<f32>,
    pub occurrence: u64,
    pub input: ExtensionInput,
}

/// What the user originally submitted; kept for round-tripping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionInput {
    pub definition: String,
    pub weight: f32,
}
