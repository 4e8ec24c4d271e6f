use serde_json::Value;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMismatch {
    pub expected: u16,
    pub actual: u16,
}

impl StatusMismatch {
    pub fn description(&self) -> String {
        format!(
            "expected status of {} but was {}",
            self.expected, self.actual
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMismatch {
    pub header_key: String,
    pub expected: String,
    pub actual: String,
    pub mismatch: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyTypeMismatch {
    pub expected: String,
    pub actual: String,
    pub mismatch: String,
}

impl BodyTypeMismatch {
    pub fn new<S1: Into<String>, S2: Into<String>>(expected: S1, actual: S2) -> Self {
        let expected = expected.into();
        let actual = actual.into();
        let mismatch = format!(
            "Expected a body of '{}' but the actual content type was '{}'",
            expected, actual
        );

        Self {
            expected,
            actual,
            mismatch,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyMismatch {
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub mismatch: String,
    /// Structural path of the mismatch, e.g. `$.field[0]`.
    pub path: String,
}

impl BodyMismatch {
    pub fn new<S: Into<String>>(
        expected: Option<String>,
        actual: Option<String>,
        mismatch: S,
    ) -> Self {
        Self {
            expected,
            actual,
            mismatch: mismatch.into(),
            path: String::from("$"),
        }
    }

    pub fn at_path<S: Into<String>>(mut self, path: S) -> Self {
        self.path = path.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataMismatch {
    pub key: String,
    pub expected: Value,
    pub actual: Value,
    pub mismatch: String,
}

/// A single discrepancy reported by a matcher. The comparison only groups
/// these; it never rewrites them.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    Status(StatusMismatch),
    Header(HeaderMismatch),
    BodyType(BodyTypeMismatch),
    Body(BodyMismatch),
    Metadata(MetadataMismatch),
}

impl Mismatch {
    pub fn mismatch_type(&self) -> &'static str {
        match self {
            Mismatch::Status(_) => "StatusMismatch",
            Mismatch::Header(_) => "HeaderMismatch",
            Mismatch::BodyType(_) => "BodyTypeMismatch",
            Mismatch::Body(_) => "BodyMismatch",
            Mismatch::Metadata(_) => "MetadataMismatch",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Mismatch::Status(m) => m.description(),
            Mismatch::Header(m) => m.mismatch.clone(),
            Mismatch::BodyType(m) => m.mismatch.clone(),
            Mismatch::Body(m) => m.mismatch.clone(),
            Mismatch::Metadata(m) => m.mismatch.clone(),
        }
    }
}

impl Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.mismatch_type(), self.description())
    }
}

impl From<StatusMismatch> for Mismatch {
    fn from(m: StatusMismatch) -> Self {
        Mismatch::Status(m)
    }
}

impl From<HeaderMismatch> for Mismatch {
    fn from(m: HeaderMismatch) -> Self {
        Mismatch::Header(m)
    }
}

impl From<BodyTypeMismatch> for Mismatch {
    fn from(m: BodyTypeMismatch) -> Self {
        Mismatch::BodyType(m)
    }
}

impl From<BodyMismatch> for Mismatch {
    fn from(m: BodyMismatch) -> Self {
        Mismatch::Body(m)
    }
}

impl From<MetadataMismatch> for Mismatch {
    fn from(m: MetadataMismatch) -> Self {
        Mismatch::Metadata(m)
    }
}
