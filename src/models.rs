use crate::ns;
use serde::{Deserialize, Serialize};

/// Declared datatype of a semantic property.
///
/// Datatypes outside the four SMW types the client classifies are kept
/// verbatim in `Other` so their values still come through as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyType {
    Boolean,
    WikiPage,
    Uri,
    Date,
    Other(String),
}

impl PropertyType {
    pub fn from_uri(uri: &str) -> Self {
        match uri {
            ns::BOOLEAN => PropertyType::Boolean,
            ns::WIKI_PAGE => PropertyType::WikiPage,
            ns::URI => PropertyType::Uri,
            ns::DATE => PropertyType::Date,
            other => PropertyType::Other(other.to_string()),
        }
    }

    pub fn as_uri(&self) -> &str {
        match self {
            PropertyType::Boolean => ns::BOOLEAN,
            PropertyType::WikiPage => ns::WIKI_PAGE,
            PropertyType::Uri => ns::URI,
            PropertyType::Date => ns::DATE,
            PropertyType::Other(uri) => uri,
        }
    }
}

impl From<String> for PropertyType {
    fn from(uri: String) -> Self {
        PropertyType::from_uri(&uri)
    }
}

impl From<PropertyType> for String {
    fn from(datatype: PropertyType) -> Self {
        datatype.as_uri().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub uri: String,
    pub label: String,
    #[serde(rename = "type")]
    pub datatype: PropertyType,
}

/// One value of a semantic property on a page.
///
/// `label` is only set for wiki-page references, where `value` is the
/// resolver URI of the referenced page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub property: PropertyDescriptor,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub title: String,
    pub properties: Vec<PropertyValue>,
    pub free_text: String,
}
