mod comparison;
mod comparison_configuration;
mod content_type;
mod data;
mod diff;
mod error;
mod matching;
mod mismatch;
mod resolver;
mod size;
mod util;

pub use comparison::{
    compare, compare_message, compare_message_body, compare_response, BodyComparisonResult,
    ComparisonResult, ResponseComparison,
};
pub use comparison_configuration::ComparisonConfiguration;
pub use content_type::ContentType;
pub use data::{
    ActualResult, AsynchronousMessage, HttpInteraction, Interaction, Message, MessageContents,
    OptionalBody, ProviderResponse, Response,
};
pub use diff::{generate_diff, generate_full_diff, should_generate_diff, GENERATE_DIFF_KEY};
pub use error::Error;
pub use matching::{
    BodyItemMatchResult, BodyMatchResult, ContentMatcher, ContentMatcherRegistry,
    LiteralContentMatcher, LiteralMetadataMatcher, LiteralResponseMatcher, MatchingContext,
    MatchingRuleCategory, MatchingRules, MetadataMatcher, ResponseMatcher,
};
pub use mismatch::{
    BodyMismatch, BodyTypeMismatch, HeaderMismatch, MetadataMismatch, Mismatch, StatusMismatch,
};
pub use resolver::{EnvironmentResolver, MapValueResolver, ValueResolver};
pub use size::size_of;
pub use util::extract_headers;
