use serde::{Deserialize, Serialize};

/// External domain schema whose class and property names get projected
/// into the vector space. The names are camelCased identifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub classes: Vec<Class>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub class: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
}

impl Schema {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_json() {
        let schema: Schema = serde_json::from_str(
            r#"{"classes": [{"class": "City", "properties": [{"name": "name"}]}]}"#,
        )
        .unwrap();

        assert_eq!(schema.classes.len(), 1);
        assert_eq!(schema.classes[0].class, "City");
        assert_eq!(schema.classes[0].properties[0].name, "name");
    }

    #[test]
    fn properties_default_to_empty() {
        let schema: Schema = serde_json::from_str(r#"{"classes": [{"class": "City"}]}"#).unwrap();
        assert!(schema.classes[0].properties.is_empty());
    }
}
