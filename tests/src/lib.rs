#[cfg(test)]
mod tests {
    use contract_verifier::{
        compare, compare_message, compare_response, ActualResult, BodyMatchResult, BodyMismatch,
        BodyTypeMismatch, ComparisonConfiguration, ContentMatcher, ContentMatcherRegistry,
        ContentType, HeaderMismatch, HttpInteraction, Interaction, MapValueResolver,
        MatchingContext, Message, Mismatch, OptionalBody, ProviderResponse, Response,
        ResponseMatcher, StatusMismatch, GENERATE_DIFF_KEY,
    };
    use serde_json::{json, Value};
    use std::{collections::HashMap, sync::Arc};

    /// Replays a fixed mismatch list, standing in for a real structural matcher.
    #[derive(Debug)]
    struct ScriptedResponseMatcher(Vec<Mismatch>);

    impl ResponseMatcher for ScriptedResponseMatcher {
        fn response_mismatches(
            &self,
            _expected: &Response,
            _actual: &Response,
            _content_matchers: &ContentMatcherRegistry,
            _plugin_configuration: &HashMap<String, Value>,
        ) -> Vec<Mismatch> {
            self.0.clone()
        }
    }

    /// Reports a mismatch for every top level JSON field that differs.
    #[derive(Debug)]
    struct TopLevelJsonMatcher;

    impl ContentMatcher for TopLevelJsonMatcher {
        fn match_body(
            &self,
            expected: &OptionalBody,
            actual: &OptionalBody,
            _context: &MatchingContext,
        ) -> BodyMatchResult {
            let expected: Value =
                serde_json::from_slice(expected.value()).unwrap_or(Value::Null);
            let actual: Value = serde_json::from_slice(actual.value()).unwrap_or(Value::Null);

            let mismatches = expected
                .as_object()
                .into_iter()
                .flatten()
                .filter(|(key, value)| actual.get(key.as_str()) != Some(*value))
                .map(|(key, value)| {
                    BodyMismatch::new(
                        Some(value.to_string()),
                        actual.get(key.as_str()).map(Value::to_string),
                        format!("Field '{}' differs", key),
                    )
                    .at_path(format!("$.{}", key))
                })
                .collect();

            BodyMatchResult::from_mismatches(mismatches)
        }
    }

    fn configuration(diff_setting: &str) -> ComparisonConfiguration {
        let mut configuration = ComparisonConfiguration::new();
        configuration.set_value_resolver(Arc::new(
            MapValueResolver::new().with_value(GENERATE_DIFF_KEY, diff_setting),
        ));
        configuration
    }

    fn expected_response() -> Response {
        let mut response = Response::new(200);
        response
            .headers
            .insert("X-Env".into(), vec!["prod".into()]);
        response
            .headers
            .insert("Content-Type".into(), vec!["application/json".into()]);
        response.body = OptionalBody::json(r#"{"id":1,"name":"widget"}"#);
        response
    }

    fn actual_response(body: &str) -> ProviderResponse {
        let mut response = ProviderResponse::new(200);
        response.headers = Some(
            vec![
                ("x-env".to_string(), vec!["prod".to_string()]),
                ("content-type".to_string(), vec!["application/json".to_string()]),
            ]
            .into_iter()
            .collect(),
        );
        response.content_type = ContentType::json();
        response.body = Some(OptionalBody::json(body));
        response
    }

    #[test]
    fn matching_response_is_ok() {
        let result = compare_response(
            &expected_response(),
            &actual_response(r#"{"id":1,"name":"widget"}"#),
            &configuration("true"),
        );

        assert!(result.is_ok());
        assert!(result.header_mismatches["X-Env"].is_empty());
        assert!(result.header_mismatches["Content-Type"].is_empty());
        assert!(result.body_mismatches.unwrap().diff.is_empty());
    }

    #[test]
    fn registered_json_matcher_groups_by_path_and_diffs_pretty_json() {
        let mut configuration = configuration("NOT_SET");
        configuration
            .add_content_matchers(|registry| registry.register("application/json", TopLevelJsonMatcher));

        let result = compare_response(
            &expected_response(),
            &actual_response(r#"{"id":2,"name":"widget"}"#),
            &configuration,
        );

        let body = result.body_mismatches.unwrap();
        assert_eq!(body.mismatches.keys().collect::<Vec<_>>(), vec!["$.id"]);
        assert_eq!(
            body.diff,
            vec![" {", "-  \"id\": 1,", "+  \"id\": 2,", "   \"name\": \"widget\"", " }"]
        );
    }

    #[test]
    fn header_keys_follow_the_contract_not_the_matcher() {
        let mut configuration = configuration("false");
        configuration.set_response_matcher(Arc::new(ScriptedResponseMatcher(vec![
            HeaderMismatch {
                header_key: "X-Undeclared".into(),
                expected: String::new(),
                actual: "1".into(),
                mismatch: "unexpected".into(),
            }
            .into(),
            StatusMismatch {
                expected: 200,
                actual: 503,
            }
            .into(),
            StatusMismatch {
                expected: 200,
                actual: 502,
            }
            .into(),
        ])));

        let result = compare_response(
            &expected_response(),
            &actual_response("{}"),
            &configuration,
        );

        let mut keys: Vec<_> = result.header_mismatches.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["Content-Type", "X-Env"]);
        assert!(result.header_mismatches.values().all(Vec::is_empty));
        assert_eq!(result.status_mismatch.unwrap().actual, 503);
    }

    #[test]
    fn body_type_failure_excludes_path_mismatches() {
        let mut configuration = configuration("true");
        configuration.set_response_matcher(Arc::new(ScriptedResponseMatcher(vec![
            BodyMismatch::new(None, None, "id differs").at_path("$.id").into(),
            BodyTypeMismatch::new("application/json", "application/octet-stream").into(),
        ])));

        let result = compare_response(
            &expected_response(),
            &actual_response("{}"),
            &configuration,
        );

        assert_eq!(
            result.body_mismatches,
            Err(BodyTypeMismatch::new(
                "application/json",
                "application/octet-stream"
            ))
        );
        assert_eq!(
            result.to_json()["body"],
            json!({
                "bodyTypeMismatch":
                    "Expected a body of 'application/json' but the actual content type was 'application/octet-stream'"
            })
        );
    }

    #[test]
    fn diff_threshold_applies_to_the_larger_body() {
        let large = format!(r#"{{"id":1,"name":"{}"}}"#, "w".repeat(2000));

        let small = compare_response(
            &expected_response(),
            &actual_response(r#"{"id":1,"name":"gadget"}"#),
            &configuration("1KB"),
        );
        let big = compare_response(
            &expected_response(),
            &actual_response(&large),
            &configuration("1KB"),
        );

        let small = small.body_mismatches.unwrap();
        assert_eq!(small.mismatches["$"].len(), 1);
        assert!(!small.diff.is_empty());

        let big = big.body_mismatches.unwrap();
        assert_eq!(big.mismatches["$"].len(), 1);
        assert!(big.diff.is_empty());
    }

    #[test]
    fn message_with_unregistered_content_type_is_compared_verbatim() {
        let mut message = Message::default();
        message.description = "custom payload".into();
        message.contents = OptionalBody::body("abc", None);
        message
            .metadata
            .insert("contentType".into(), json!("application/x-custom"));
        let interaction = Interaction::Message(message);

        let result = compare(
            &interaction,
            &ActualResult::Message {
                body: OptionalBody::body("abd", None),
                metadata: None,
            },
            &configuration("true"),
        )
        .unwrap();

        let body = result.body_mismatches.unwrap();
        let mismatches = &body.mismatches["$"];
        assert_eq!(mismatches.len(), 1);
        assert_eq!(
            mismatches[0].mismatch,
            "Actual body 'abd' is not equal to the expected body 'abc'"
        );
        assert_eq!(body.diff, vec!["-abc", "+abd"]);
    }

    #[test]
    fn http_interaction_cannot_be_compared_as_a_message() {
        let interaction = Interaction::Http(HttpInteraction {
            description: "get widget".into(),
            response: expected_response(),
        });

        let error = compare_message(
            &interaction,
            &OptionalBody::Empty,
            None,
            &configuration("true"),
        )
        .unwrap_err();

        assert_eq!(
            error.to_string(),
            "Matching a HTTP interaction is not implemented"
        );
    }

    #[test]
    fn http_interaction_dispatches_to_response_comparison() {
        let interaction = Interaction::Http(HttpInteraction {
            description: "get widget".into(),
            response: expected_response(),
        });
        let mut actual = actual_response(r#"{"id":1,"name":"widget"}"#);
        actual.status_code = Some(404);

        let result = compare(
            &interaction,
            &ActualResult::Response(actual),
            &configuration("true"),
        )
        .unwrap();

        assert!(!result.is_ok());
        assert_eq!(
            result.status_mismatch.as_ref().map(StatusMismatch::description),
            Some("expected status of 200 but was 404".to_string())
        );
    }
}
