use crate::{content_type::ContentType, matching::MatchingRules};
use serde_json::Value;
use std::collections::HashMap;

/// A body that can be missing, explicitly empty, or carry bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionalBody {
    Missing,
    Empty,
    Present {
        value: Vec<u8>,
        content_type: Option<ContentType>,
    },
}

impl OptionalBody {
    pub fn body<B: Into<Vec<u8>>>(value: B, content_type: Option<ContentType>) -> Self {
        OptionalBody::Present {
            value: value.into(),
            content_type,
        }
    }

    pub fn text<S: Into<String>>(value: S) -> Self {
        Self::body(value.into(), Some(ContentType::text_plain()))
    }

    pub fn json<S: Into<String>>(value: S) -> Self {
        Self::body(value.into(), Some(ContentType::json()))
    }

    pub fn is_null_or_empty(&self) -> bool {
        match self {
            OptionalBody::Missing | OptionalBody::Empty => true,
            OptionalBody::Present { value, .. } => value.is_empty(),
        }
    }

    pub fn is_present(&self) -> bool {
        !self.is_null_or_empty()
    }

    pub fn value(&self) -> &[u8] {
        match self {
            OptionalBody::Present { value, .. } => value,
            _ => &[],
        }
    }

    pub fn value_as_string(&self) -> String {
        String::from_utf8_lossy(self.value()).into()
    }

    pub fn content_type(&self) -> Option<&ContentType> {
        match self {
            OptionalBody::Present { content_type, .. } => content_type.as_ref(),
            _ => None,
        }
    }
}

impl Default for OptionalBody {
    fn default() -> Self {
        OptionalBody::Missing
    }
}

/// The response recorded in the contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, Vec<String>>,
    pub body: OptionalBody,
    pub matching_rules: MatchingRules,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: OptionalBody::Missing,
            matching_rules: MatchingRules::default(),
        }
    }

    pub fn content_type_header(&self) -> Option<ContentType> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .and_then(|(_, values)| values.first())
            .and_then(ContentType::parse)
    }

    /// The declared content type of the body, falling back to the `Content-Type` header.
    pub fn content_type(&self) -> Option<ContentType> {
        self.body
            .content_type()
            .cloned()
            .or_else(|| self.content_type_header())
    }

    pub fn json_body(&self) -> bool {
        self.content_type()
            .map(|content_type| content_type.is_json())
            .unwrap_or(false)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}

/// What the provider actually returned.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub status_code: Option<u16>,
    pub headers: Option<HashMap<String, Vec<String>>>,
    pub content_type: ContentType,
    pub body: Option<OptionalBody>,
}

impl ProviderResponse {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code: Some(status_code),
            headers: None,
            content_type: ContentType::text_plain(),
            body: None,
        }
    }

    /// The actual side handed to the response matcher. A missing status is treated as 200.
    pub fn as_response(&self) -> Response {
        Response {
            status: self.status_code.unwrap_or(200),
            headers: self.headers.clone().unwrap_or_default(),
            body: self.body.clone().unwrap_or(OptionalBody::Empty),
            matching_rules: MatchingRules::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpInteraction {
    pub description: String,
    pub response: Response,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    pub description: String,
    pub contents: OptionalBody,
    pub metadata: HashMap<String, Value>,
    pub matching_rules: MatchingRules,
}

impl Message {
    pub fn content_type(&self) -> Option<ContentType> {
        metadata_content_type(&self.metadata).or_else(|| self.contents.content_type().cloned())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageContents {
    pub contents: OptionalBody,
    pub metadata: HashMap<String, Value>,
    pub matching_rules: MatchingRules,
}

impl MessageContents {
    pub fn content_type(&self) -> Option<ContentType> {
        metadata_content_type(&self.metadata).or_else(|| self.contents.content_type().cloned())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AsynchronousMessage {
    pub description: String,
    pub contents: MessageContents,
}

/// The interaction kinds a comparison can be asked to verify.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Http(HttpInteraction),
    AsynchronousMessage(AsynchronousMessage),
    Message(Message),
}

impl Interaction {
    pub fn description(&self) -> &str {
        match self {
            Interaction::Http(i) => &i.description,
            Interaction::AsynchronousMessage(m) => &m.description,
            Interaction::Message(m) => &m.description,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Interaction::Http(_) => "HTTP interaction",
            Interaction::AsynchronousMessage(_) => "asynchronous message",
            Interaction::Message(_) => "message",
        }
    }
}

/// The observed counterpart of an [`Interaction`].
#[derive(Debug, Clone, PartialEq)]
pub enum ActualResult {
    Response(ProviderResponse),
    Message {
        body: OptionalBody,
        metadata: Option<HashMap<String, Value>>,
    },
}

impl ActualResult {
    pub fn kind(&self) -> &'static str {
        match self {
            ActualResult::Response(_) => "an actual response",
            ActualResult::Message { .. } => "an actual message",
        }
    }
}

pub(crate) const CONTENT_TYPE_METADATA_KEYS: [&str; 3] =
    ["contentType", "content-type", "Content-Type"];

fn metadata_content_type(metadata: &HashMap<String, Value>) -> Option<ContentType> {
    CONTENT_TYPE_METADATA_KEYS
        .iter()
        .filter_map(|key| metadata.get(*key))
        .filter_map(Value::as_str)
        .find_map(ContentType::parse)
}
