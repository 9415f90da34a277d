use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::bookmark::Bookmark;
use super::errors::ProtocolError;

/// The only data type this server answers for.
pub const BOOKMARK_TYPE: &str = "bookmark";

/// One inbound protocol message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub id: Value,
    #[serde(rename = "type", default = "default_type")]
    pub data_type: String,
    pub action: String,
    #[serde(default)]
    pub request: RequestFields,
    #[serde(default)]
    pub transaction: Credentials,
}

fn default_type() -> String {
    BOOKMARK_TYPE.to_string()
}

/// Credential pair carried by an envelope. Either field may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// `data` payload of create and update requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookmarkData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Raw request fields as they arrive on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestFields {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub data: Option<BookmarkData>,
    #[serde(default)]
    pub add_tags: Option<Vec<String>>,
    #[serde(default)]
    pub del_tags: Option<Vec<String>>,
}

/// A decoded request, one variant per action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkRequest {
    Create {
        url: String,
        tags: Vec<String>,
    },
    Update {
        url: String,
        tags: Option<Vec<String>>,
        add_tags: Option<Vec<String>>,
        del_tags: Option<Vec<String>>,
    },
    Delete {
        url: String,
    },
    Retrieve {
        url: Option<String>,
    },
}

impl BookmarkRequest {
    /// Decodes the action name and raw fields into a typed request.
    pub fn decode(action: &str, fields: RequestFields) -> Result<Self, ProtocolError> {
        let RequestFields {
            url,
            data,
            add_tags,
            del_tags,
        } = fields;
        let url = url.filter(|u| !u.is_empty());

        match action {
            "create" => {
                let data = data.ok_or_else(|| ProtocolError::MissingField("data".to_string()))?;
                let url = data
                    .url
                    .filter(|u| !u.is_empty())
                    .ok_or_else(|| ProtocolError::MissingField("data.url".to_string()))?;
                Ok(Self::Create {
                    url,
                    tags: data.tags.unwrap_or_default(),
                })
            }
            "update" => Ok(Self::Update {
                url: url.ok_or_else(|| ProtocolError::MissingField("url".to_string()))?,
                tags: data.and_then(|d| d.tags),
                add_tags,
                del_tags,
            }),
            "delete" => Ok(Self::Delete {
                url: url.ok_or_else(|| ProtocolError::MissingField("url".to_string()))?,
            }),
            "retrieve" => Ok(Self::Retrieve { url }),
            other => Err(ProtocolError::UnknownAction(other.to_string())),
        }
    }

    /// Lower-case action name, as it appears on the wire.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Retrieve { .. } => "retrieve",
        }
    }

    /// Reply tag sent back when the action succeeds.
    pub fn success_tag(&self) -> &'static str {
        match self {
            Self::Create { .. } => "CREATED",
            Self::Update { .. } => "UPDATED",
            Self::Delete { .. } => "DELETED",
            Self::Retrieve { .. } => "RETRIEVED",
        }
    }
}

/// Reply tag for a failed action, e.g. `RETRIEVE_FAIL`.
pub fn failure_tag(action: &str) -> String {
    format!("{}_FAIL", action.to_uppercase())
}

/// Reply tag for a request rejected by the auth gate.
pub const DENIED_TAG: &str = "ACCESS_DENIED";

/// Reply tag for a message that could not be decoded at all.
pub const ERROR_TAG: &str = "ERROR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Error,
}

/// A status line attached to a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub code: u16,
    pub message: String,
}

/// Payload of a successful reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<BTreeMap<String, Bookmark>>,
}

/// One outbound protocol message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub id: Value,
    #[serde(rename = "type")]
    pub data_type: String,
    pub action: String,
    #[serde(default)]
    pub response: ResponseBody,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

impl Reply {
    pub fn success(id: Value, tag: &str, result: BTreeMap<String, Bookmark>, message: String) -> Self {
        Self {
            id,
            data_type: BOOKMARK_TYPE.to_string(),
            action: tag.to_string(),
            response: ResponseBody {
                result: Some(result),
            },
            logs: vec![LogEntry {
                level: LogLevel::Info,
                code: 200,
                message,
            }],
        }
    }

    pub fn failure(id: Value, tag: String, code: u16, messages: Vec<String>) -> Self {
        Self {
            id,
            data_type: BOOKMARK_TYPE.to_string(),
            action: tag,
            response: ResponseBody::default(),
            logs: messages
                .into_iter()
                .map(|message| LogEntry {
                    level: LogLevel::Error,
                    code,
                    message,
                })
                .collect(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.response.result.is_some()
    }
}
