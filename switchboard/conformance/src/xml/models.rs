use serde::{Deserialize, Serialize};

/// Contains a simple model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "SimpleModel")]
pub struct SimpleModel {
    pub name: String,
    pub age: i32,
}

/// Contains fields that are XML attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "ModelWithAttributes")]
pub struct ModelWithAttributes {
    #[serde(rename = "@id1")]
    pub id1: i32,

    #[serde(rename = "@id2")]
    pub id2: String,

    pub enabled: bool,
}
