use crate::{
    content_type::ContentType,
    data::{OptionalBody, ProviderResponse},
    error::Error,
};
use hyper::{body, header::CONTENT_TYPE, Body, HeaderMap, Response};
use std::collections::HashMap;

pub fn extract_headers(header_map: &HeaderMap) -> HashMap<String, Vec<String>> {
    // it currently ignores header values with opaque characters
    let mut headers: HashMap<String, Vec<String>> = HashMap::new();
    for (key, value) in header_map {
        if let Ok(value) = value.to_str() {
            headers
                .entry(String::from(key.as_str()))
                .or_default()
                .push(String::from(value));
        }
    }

    headers
}

impl ProviderResponse {
    /// Reads a hyper response into a [`ProviderResponse`], consuming its body.
    pub async fn from_http(response: Response<Body>) -> Result<Self, Error> {
        let status_code = response.status().as_u16();
        let headers = extract_headers(response.headers());
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(ContentType::parse);

        let body = body::to_bytes(response.into_body()).await?;
        let body = if body.is_empty() {
            OptionalBody::Empty
        } else {
            OptionalBody::body(body.to_vec(), content_type.clone())
        };

        Ok(Self {
            status_code: Some(status_code),
            headers: Some(headers),
            content_type: content_type.unwrap_or_else(ContentType::text_plain),
            body: Some(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    #[test]
    fn multi_valued_headers_are_kept_together() {
        let mut header_map = HeaderMap::new();
        header_map.append("x-env", HeaderValue::from_static("prod"));
        header_map.append("x-env", HeaderValue::from_static("eu"));
        header_map.append("x-opaque", HeaderValue::from_bytes(b"caf\xe9").unwrap());

        let headers = extract_headers(&header_map);

        assert_eq!(headers["x-env"], vec!["prod", "eu"]);
        assert!(!headers.contains_key("x-opaque"));
    }

    #[tokio::test]
    async fn reads_status_headers_and_body() {
        let response = Response::builder()
            .status(201)
            .header("Content-Type", "application/json; charset=utf-8")
            .body(Body::from(r#"{"id":1}"#))
            .unwrap();

        let provider_response = ProviderResponse::from_http(response).await.unwrap();

        assert_eq!(provider_response.status_code, Some(201));
        assert!(provider_response.content_type.is_json());
        assert_eq!(
            provider_response.headers.unwrap()["content-type"],
            vec!["application/json; charset=utf-8"]
        );
        assert_eq!(
            provider_response.body.unwrap().value_as_string(),
            r#"{"id":1}"#
        );
    }

    #[tokio::test]
    async fn empty_body_and_missing_content_type() {
        let response = Response::builder().status(204).body(Body::empty()).unwrap();

        let provider_response = ProviderResponse::from_http(response).await.unwrap();

        assert_eq!(provider_response.body, Some(OptionalBody::Empty));
        assert_eq!(provider_response.content_type, ContentType::text_plain());
    }
}
