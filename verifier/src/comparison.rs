use crate::{
    comparison_configuration::ComparisonConfiguration,
    content_type::ContentType,
    data::{ActualResult, Interaction, OptionalBody, ProviderResponse, Response},
    diff::{generate_full_diff, should_generate_diff, GENERATE_DIFF_KEY},
    error::Error,
    matching::{ContentMatcherRegistry, MatchingContext, MatchingRules},
    mismatch::{
        BodyMismatch, BodyTypeMismatch, HeaderMismatch, MetadataMismatch, Mismatch,
        StatusMismatch,
    },
    resolver::ValueResolver,
};
use serde_json::{json, Map, Value};
use std::{
    cmp::max,
    collections::{BTreeMap, HashMap},
};

/// Body mismatches grouped by path, plus the rendered diff (empty when diffing was skipped).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyComparisonResult {
    pub mismatches: HashMap<String, Vec<BodyMismatch>>,
    pub diff: Vec<String>,
}

impl BodyComparisonResult {
    pub fn has_mismatches(&self) -> bool {
        self.mismatches.values().any(|group| !group.is_empty())
    }

    pub fn to_json(&self) -> Value {
        json!({
            "mismatches": descriptions(&self.mismatches, |m| m.mismatch.clone()),
            "diff": self.diff.join("\n"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub status_mismatch: Option<StatusMismatch>,
    /// Keyed by every expected header name, including the ones that matched.
    pub header_mismatches: HashMap<String, Vec<HeaderMismatch>>,
    pub body_mismatches: Result<BodyComparisonResult, BodyTypeMismatch>,
    pub metadata_mismatches: HashMap<String, Vec<MetadataMismatch>>,
}

impl Default for ComparisonResult {
    fn default() -> Self {
        Self {
            status_mismatch: None,
            header_mismatches: HashMap::new(),
            body_mismatches: Ok(BodyComparisonResult::default()),
            metadata_mismatches: HashMap::new(),
        }
    }
}

impl ComparisonResult {
    pub fn is_ok(&self) -> bool {
        self.status_mismatch.is_none()
            && self.header_mismatches.values().all(Vec::is_empty)
            && self.metadata_mismatches.values().all(Vec::is_empty)
            && matches!(&self.body_mismatches, Ok(body) if !body.has_mismatches())
    }

    pub fn to_json(&self) -> Value {
        let body = match &self.body_mismatches {
            Ok(body) => body.to_json(),
            Err(type_mismatch) => json!({ "bodyTypeMismatch": type_mismatch.mismatch }),
        };

        json!({
            "status": self.status_mismatch.as_ref().map(StatusMismatch::description),
            "headers": descriptions(&self.header_mismatches, |m| m.mismatch.clone()),
            "body": body,
            "metadata": descriptions(&self.metadata_mismatches, |m| m.mismatch.clone()),
        })
    }
}

fn descriptions<T, F: Fn(&T) -> String>(groups: &HashMap<String, Vec<T>>, describe: F) -> Value {
    let sorted: BTreeMap<&String, &Vec<T>> = groups.iter().collect();

    sorted
        .into_iter()
        .map(|(key, group)| {
            let described = group.iter().map(&describe).map(Value::from).collect();
            (key.clone(), Value::Array(described))
        })
        .collect::<Map<String, Value>>()
        .into()
}

#[derive(Debug)]
pub struct ResponseComparison<'a> {
    expected_headers: Vec<String>,
    expected_body: &'a OptionalBody,
    is_json_body: bool,
    actual_content_type: ContentType,
    actual_body: Option<&'a OptionalBody>,
}

impl<'a> ResponseComparison<'a> {
    pub fn new<I: IntoIterator<Item = S>, S: Into<String>>(
        expected_headers: I,
        expected_body: &'a OptionalBody,
        is_json_body: bool,
        actual_content_type: ContentType,
        actual_body: Option<&'a OptionalBody>,
    ) -> Self {
        Self {
            expected_headers: expected_headers.into_iter().map(Into::into).collect(),
            expected_body,
            is_json_body,
            actual_content_type,
            actual_body,
        }
    }

    /// The first status mismatch. Matchers report at most one; any others are dropped.
    pub fn status_result(&self, mismatches: &[Mismatch]) -> Option<StatusMismatch> {
        mismatches.iter().find_map(|mismatch| match mismatch {
            Mismatch::Status(status) => Some(status.clone()),
            _ => None,
        })
    }

    /// Header mismatches for exactly the expected header names. Mismatches on
    /// headers the contract never declared are dropped.
    pub fn header_result(&self, mismatches: &[Mismatch]) -> HashMap<String, Vec<HeaderMismatch>> {
        let mut by_name: HashMap<String, Vec<HeaderMismatch>> = HashMap::new();
        for mismatch in mismatches {
            if let Mismatch::Header(header) = mismatch {
                by_name
                    .entry(header.header_key.to_lowercase())
                    .or_default()
                    .push(header.clone());
            }
        }

        self.expected_headers
            .iter()
            .map(|name| {
                let group = by_name
                    .get(&name.to_lowercase())
                    .cloned()
                    .unwrap_or_default();
                (name.clone(), group)
            })
            .collect()
    }

    pub fn body_result(
        &self,
        mismatches: &[Mismatch],
        resolver: &dyn ValueResolver,
    ) -> Result<BodyComparisonResult, BodyTypeMismatch> {
        let type_mismatch = mismatches.iter().find_map(|mismatch| match mismatch {
            Mismatch::BodyType(type_mismatch) => Some(type_mismatch.clone()),
            _ => None,
        });
        if let Some(type_mismatch) = type_mismatch {
            return Err(type_mismatch);
        }

        let mut body_mismatches: HashMap<String, Vec<BodyMismatch>> = HashMap::new();
        for mismatch in mismatches {
            if let Mismatch::Body(body) = mismatch {
                body_mismatches
                    .entry(body.path.clone())
                    .or_default()
                    .push(body.clone());
            }
        }

        let expected = self.expected_body.value_as_string();
        let actual = self.actual_body.map(OptionalBody::value).unwrap_or(&[]);
        let length = max(actual.len(), expected.chars().count());

        let diff = match should_generate_diff(resolver, length) {
            Ok(true) => generate_full_diff(
                &self.actual_content_type.decode(actual),
                &self.actual_content_type,
                &expected,
                self.is_json_body,
            ),
            Ok(false) => Vec::new(),
            Err(error) => {
                tracing::warn!(
                    "Invalid value for property '{}' - {}",
                    GENERATE_DIFF_KEY,
                    error
                );
                Vec::new()
            }
        };

        Ok(BodyComparisonResult {
            mismatches: body_mismatches,
            diff,
        })
    }

    /// Metadata mismatches grouped by key. Unlike headers, the keys are not
    /// restricted to the expected ones.
    pub fn metadata_result(mismatches: &[Mismatch]) -> HashMap<String, Vec<MetadataMismatch>> {
        let mut by_key: HashMap<String, Vec<MetadataMismatch>> = HashMap::new();
        for mismatch in mismatches {
            if let Mismatch::Metadata(metadata) = mismatch {
                by_key
                    .entry(metadata.key.clone())
                    .or_default()
                    .push(metadata.clone());
            }
        }

        by_key
    }
}

pub fn compare_response(
    expected: &Response,
    actual: &ProviderResponse,
    configuration: &ComparisonConfiguration,
) -> ComparisonResult {
    let mismatches = configuration.response_matcher().response_mismatches(
        expected,
        &actual.as_response(),
        configuration.content_matchers(),
        configuration.plugin_configuration(),
    );
    tracing::debug!("Response matching reported {} mismatch(es)", mismatches.len());

    let comparison = ResponseComparison::new(
        expected.headers.keys(),
        &expected.body,
        expected.json_body(),
        actual.content_type.clone(),
        actual.body.as_ref(),
    );
    let resolver = configuration.value_resolver();

    ComparisonResult {
        status_mismatch: comparison.status_result(&mismatches),
        header_mismatches: comparison.header_result(&mismatches),
        body_mismatches: comparison.body_result(&mismatches, resolver.as_ref()),
        metadata_mismatches: HashMap::new(),
    }
}

/// The parts of a message-like interaction the comparison works on.
struct MessageParts<'a> {
    contents: &'a OptionalBody,
    metadata: &'a HashMap<String, Value>,
    matching_rules: &'a MatchingRules,
    content_type: Option<ContentType>,
}

impl<'a> MessageParts<'a> {
    fn from_interaction(interaction: &'a Interaction) -> Result<Self, Error> {
        match interaction {
            Interaction::AsynchronousMessage(message) => Ok(Self {
                contents: &message.contents.contents,
                metadata: &message.contents.metadata,
                matching_rules: &message.contents.matching_rules,
                content_type: message.contents.content_type(),
            }),
            Interaction::Message(message) => Ok(Self {
                contents: &message.contents,
                metadata: &message.metadata,
                matching_rules: &message.matching_rules,
                content_type: message.content_type(),
            }),
            Interaction::Http(_) => Err(Error::UnsupportedInteraction(interaction.kind().into())),
        }
    }
}

/// Compares an actual message payload (and metadata, when given) against a
/// recorded message. HTTP interactions are rejected.
pub fn compare_message(
    interaction: &Interaction,
    actual: &OptionalBody,
    metadata: Option<&HashMap<String, Value>>,
    configuration: &ComparisonConfiguration,
) -> Result<ComparisonResult, Error> {
    let message = MessageParts::from_interaction(interaction)?;
    tracing::debug!(
        "Comparing {} '{}'",
        interaction.kind(),
        interaction.description()
    );

    let body_context = MatchingContext::new(
        message.matching_rules.rules_for_category("body"),
        true,
        configuration.plugin_configuration().clone(),
    );
    let metadata_context = MatchingContext::new(
        message.matching_rules.rules_for_category("metadata"),
        true,
        configuration.plugin_configuration().clone(),
    );

    let body_mismatches = compare_message_body(
        interaction,
        actual,
        &body_context,
        configuration.content_matchers(),
    )?;
    let metadata_mismatches = match metadata {
        Some(actual_metadata) => configuration.metadata_matcher().compare_metadata(
            message.metadata,
            actual_metadata,
            &metadata_context,
        ),
        None => Vec::new(),
    };

    let content_type = message
        .content_type
        .unwrap_or_else(ContentType::text_plain);
    let comparison = ResponseComparison::new(
        vec!["Content-Type"],
        message.contents,
        content_type.is_json(),
        content_type,
        Some(actual),
    );
    let resolver = configuration.value_resolver();

    Ok(ComparisonResult {
        body_mismatches: comparison.body_result(&body_mismatches, resolver.as_ref()),
        metadata_mismatches: ResponseComparison::metadata_result(&metadata_mismatches),
        ..ComparisonResult::default()
    })
}

/// Runs the content matcher registered for the message's content type over
/// the payload, or compares it literally when none is registered.
pub fn compare_message_body(
    interaction: &Interaction,
    actual: &OptionalBody,
    context: &MatchingContext,
    content_matchers: &ContentMatcherRegistry,
) -> Result<Vec<Mismatch>, Error> {
    let message = MessageParts::from_interaction(interaction)?;

    Ok(content_matchers
        .lookup_or_fallback(message.content_type.as_ref())
        .match_body(message.contents, actual, context)
        .into_mismatches())
}

pub fn compare(
    interaction: &Interaction,
    actual: &ActualResult,
    configuration: &ComparisonConfiguration,
) -> Result<ComparisonResult, Error> {
    match (interaction, actual) {
        (Interaction::Http(http), ActualResult::Response(response)) => {
            Ok(compare_response(&http.response, response, configuration))
        }
        (Interaction::AsynchronousMessage(_), ActualResult::Message { body, metadata })
        | (Interaction::Message(_), ActualResult::Message { body, metadata }) => {
            compare_message(interaction, body, metadata.as_ref(), configuration)
        }
        (interaction, actual) => Err(Error::UnsupportedInteraction(format!(
            "{} against {}",
            interaction.kind(),
            actual.kind()
        ))),
    }
}
