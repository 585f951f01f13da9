use crate::analysis::camelcase;
use crate::core::error::{Error, ErrorKind, Result};

/// Whether a schema search looks for class names or property names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Class,
    Property,
}

#[derive(Debug, Clone)]
pub struct Keyword {
    pub keyword: String,
    /// Contribution of this keyword to the query centroid, in `[0, 1]`.
    pub weight: f32,
}

#[derive(Debug, Clone)]
pub struct SearchParams {
    pub search_type: SearchType,
    /// The (possibly camelCased) name to search for.
    pub name: String,
    pub keywords: Vec<Keyword>,
    /// Results below this certainty are dropped, in `[0, 1]`.
    pub certainty: f32,
}

impl SearchParams {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::new(ErrorKind::InvalidArgument, "Name cannot be empty"));
        }

        validate_certainty_or_weight(self.certainty)
            .map_err(|err| Error::new(ErrorKind::InvalidArgument, format!("invalid Certainty: {}", err.context)))?;

        for (position, keyword) in self.keywords.iter().enumerate() {
            validate_keyword(keyword).map_err(|err| {
                Error::new(
                    ErrorKind::InvalidArgument,
                    format!("invalid keyword at position {}: {}", position, err.context),
                )
            })?;
        }

        Ok(())
    }
}

fn validate_keyword(keyword: &Keyword) -> Result<()> {
    if keyword.keyword.is_empty() {
        return Err(Error::new(ErrorKind::InvalidArgument, "Keyword cannot be empty"));
    }

    if camelcase::split(&keyword.keyword).len() > 1 {
        return Err(Error::new(
            ErrorKind::InvalidArgument,
            format!(
                "keywords cannot be camelCased - instead split your keyword up into several \
                 keywords, this way each word of your camelCased string can have its own \
                 weight, got '{}'",
                keyword.keyword
            ),
        ));
    }

    validate_certainty_or_weight(keyword.weight)
        .map_err(|err| Error::new(ErrorKind::InvalidArgument, format!("invalid Weight: {}", err.context)))
}

fn validate_certainty_or_weight(value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        return Ok(());
    }

    Err(Error::new(
        ErrorKind::InvalidArgument,
        format!("must be between 0 and 1, but got '{}'", value),
    ))
}
