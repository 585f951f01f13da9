use tracing::info;

use crate::analysis::camelcase;
use crate::analysis::stopwords::StopwordDetector;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::vector::{compute_centroid, Vector};
use crate::index::memory::{MemoryIndex, MemoryIndexBuilder};
use crate::index::VectorIndex;
use crate::schema::model::Schema;

/// Synthetic entries have no corpus frequency; they carry a nominal
/// occurrence so the index row is fully populated.
const SYNTHETIC_OCCURRENCE: u64 = 1;

/// Projects a schema's class and property names into the vector space of
/// the base index.
///
/// Every class yields an entry `$OBJECT[Class]`, every property an entry
/// `$OBJECT[Class][property]`; each maps to the centroid of the vectors of
/// the name's camelCase parts after lowercasing and stopword removal.
/// Parts resolve against the base vocabulary only; user extensions do not
/// participate.
pub fn build_memory_index_from_schema(
    schema: &Schema,
    base: &dyn VectorIndex,
    stopwords: &StopwordDetector,
) -> Result<MemoryIndex> {
    let mut builder = MemoryIndexBuilder::new(base.vector_width());

    for class in &schema.classes {
        let class_key = format!("$OBJECT[{}]", class.class);

        let centroid = centroid_for_name(&class.class, base, stopwords).map_err(|err| {
            Error::new(
                err.kind,
                format!("class '{}': {}", class.class, err.context),
            )
        })?;
        builder.add_word(&class_key, centroid, SYNTHETIC_OCCURRENCE)?;

        for property in &class.properties {
            let property_key = format!("{}[{}]", class_key, property.name);

            let centroid = centroid_for_name(&property.name, base, stopwords).map_err(|err| {
                Error::new(
                    err.kind,
                    format!(
                        "property '{}' in class '{}': {}",
                        property.name, class.class, err.context
                    ),
                )
            })?;
            builder.add_word(&property_key, centroid, SYNTHETIC_OCCURRENCE)?;
        }
    }

    info!(entries = builder.len(), "built schema centroids");
    builder.build()
}

/// Centroid over the camelCase parts of a name that survive lowercasing
/// and stopword removal. Fails with `NotFound` on the first part missing
/// from the base vocabulary.
fn centroid_for_name(
    name: &str,
    base: &dyn VectorIndex,
    stopwords: &StopwordDetector,
) -> Result<Vector> {
    let mut vectors = Vec::new();

    for part in camelcase::split(name) {
        let part = part.to_lowercase();
        if stopwords.is_stopword(&part) {
            continue;
        }

        match base.word_to_index(&part) {
            Some(item) => vectors.push(base.vector_for_index(item)?),
            None => {
                return Err(Error::new(
                    ErrorKind::NotFound,
                    format!("camel cased name part '{}' is not in the vocabulary", part),
                ));
            }
        }
    }

    if vectors.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidArgument,
            "every part of the name is a stopword, nothing left to vectorize",
        ));
    }

    compute_centroid(&vectors)
}
