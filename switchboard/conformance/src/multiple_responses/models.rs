use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyException {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct B {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_status_code: Option<String>,
}

/// Payload of an operation that returns `MyException` on 200 and `B` on 201.
///
/// The variant is chosen by the response status, not by the body shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MyExceptionOrB {
    MyException(MyException),
    B(B),
}
