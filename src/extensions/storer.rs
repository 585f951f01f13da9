use std::sync::Arc;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::vector::Vector;
use crate::extensions::extension::{Extension, ExtensionInput};
use crate::extensions::lookup::ExtensionStorer;

/// Extensions don't have a corpus frequency; they enter the vocabulary
/// with a fixed nominal occurrence.
const EXTENSION_OCCURRENCE: u64 = 1000;

/// The slice of the vectorizer the storer needs: turning a definition
/// corpus into a single vector.
pub trait Vectorizes: Send + Sync {
    fn corpi(&self, corpi: &[String]) -> Result<Vector>;
}

/// Validates a user-submitted concept, vectorizes its definition, and
/// hands the finished extension to the repository.
pub struct Storer {
    vectorizer: Arc<dyn Vectorizes>,
    repo: Arc<dyn ExtensionStorer>,
}

impl Storer {
    pub fn new(vectorizer: Arc<dyn Vectorizes>, repo: Arc<dyn ExtensionStorer>) -> Self {
        Storer { vectorizer, repo }
    }

    pub fn put(&self, concept: &str, input: ExtensionInput) -> Result<()> {
        validate(concept, &input)
            .map_err(|err| Error::new(err.kind, format!("invalid extension: {}", err.context)))?;

        let definition = [input.definition.clone()];
        let vector = self
            .vectorizer
            .corpi(&definition)
            .map_err(|err| Error::new(err.kind, format!("vectorize definition: {}", err.context)))?;

        let extension = Extension {
            concept: compound(concept),
            vector: vector.into_components(),
            occurrence: EXTENSION_OCCURRENCE,
            input,
        };

        self.repo
            .put(&extension)
            .map_err(|err| Error::new(err.kind, format!("store extension: {}", err.context)))
    }
}

/// Spaces become underscores, matching how the vectorizer builds compound
/// lookup keys.
fn compound(concept: &str) -> String {
    concept.split(' ').collect::<Vec<_>>().join("_")
}

fn validate(concept: &str, input: &ExtensionInput) -> Result<()> {
    if concept.chars().count() < 2 {
        return Err(Error::new(
            ErrorKind::InvalidArgument,
            "concept must have at least two characters",
        ));
    }

    for c in concept.chars() {
        if !c.is_lowercase() && !c.is_whitespace() && !c.is_numeric() {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "concept must be made up of all lowercase letters and/or numbers, for custom \
                 compound words use spaces, e.g. 'flux capacitor'",
            ));
        }
    }

    if input.definition.is_empty() {
        return Err(Error::new(ErrorKind::InvalidArgument, "definition cannot be empty"));
    }

    if input.weight > 1.0 || input.weight < 0.0 {
        return Err(Error::new(ErrorKind::InvalidArgument, "weight must be between 0 and 1"));
    }

    if input.weight < 1.0 {
        return Err(Error::new(
            ErrorKind::InvalidArgument,
            "weights below 1 (extending an existing concept) not supported yet - coming soon",
        ));
    }

    Ok(())
}
