use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    #[serde(rename = "userId", alias = "userid")]
    pub user_id: i32,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub version: Option<i32>,
}

/// Seed document: `{ "posts": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posts {
    pub posts: Vec<Post>,
}

/// Incoming body for create and update. Every field is optional so that missing
/// values reach the service guards instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostRequest {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default, rename = "userId", alias = "userid")]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "int_or_numeric_string")]
    pub version: Option<i32>,
}

/// Clients send the version either as a number or as a quoted number (`"1"`).
fn int_or_numeric_string<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i32),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid version: {:?}", text))),
    }
}

impl Post {
    pub fn new(id: i32, user_id: i32, title: String, body: String) -> Self {
        Self {
            id,
            user_id,
            title,
            body,
            version: None,
        }
    }
}
