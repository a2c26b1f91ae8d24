use crate::{
    config::ApiConfig,
    data::{
        prefix_index::{IndexEntry, PrefixIndex},
        student::{RawStudent, Student},
    },
    error::{
        BuildClientSnafu, EmptyPrefixSnafu, IndexStatusSnafu, MalformedIndexSnafu, NoRecordSnafu,
        RollcallResult, UnreachableSnafu,
    },
};
use futures::future::join_all;
use serde_json::Value;
use snafu::{OptionExt, ResultExt, ensure};
use std::sync::Arc;
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Read-only client for the student API.
#[derive(Clone, Debug)]
pub struct DirectoryClient {
    http: reqwest::Client,
    api: Arc<ApiConfig>,
    origin: Url,
}

impl DirectoryClient {
    pub fn new(api: Arc<ApiConfig>) -> RollcallResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(api.request_timeout())
            .build()
            .context(BuildClientSnafu)?;
        let origin = api.origin();

        Ok(Self { http, api, origin })
    }

    pub fn student_url(&self, prefix: &str) -> Url {
        let mut url = self.api.base().clone();
        // bases that cannot take segments are rejected when the config is built
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(prefix);
        }
        url
    }

    pub async fn fetch_index(&self) -> RollcallResult<PrefixIndex> {
        let url = self.api.base().clone();
        debug!(%url, "Fetching student index");

        let rsp = self
            .http
            .get(url.clone())
            .send()
            .await
            .context(UnreachableSnafu { url: url.as_str() })?;

        let status = rsp.status();
        ensure!(status.is_success(), IndexStatusSnafu { status });

        let body = rsp
            .bytes()
            .await
            .context(UnreachableSnafu { url: url.as_str() })?;
        let entries: Vec<Value> = serde_json::from_slice(&body).context(MalformedIndexSnafu)?;
        let listed = entries.len();

        let index = PrefixIndex::from_entries(entries.into_iter().filter_map(IndexEntry::from_value));
        if index.len() < listed {
            debug!(listed, kept = index.len(), "Skipped duplicate or malformed index entries");
        }
        info!(count = index.len(), "Loaded student index");
        Ok(index)
    }

    pub async fn fetch_student(&self, prefix: &str) -> RollcallResult<Student> {
        let prefix = prefix.trim();
        ensure!(!prefix.is_empty(), EmptyPrefixSnafu);

        let url = self.student_url(prefix);
        debug!(%url, ?prefix, "Fetching student");

        let rsp = self
            .http
            .get(url.clone())
            .send()
            .await
            .context(UnreachableSnafu { url: url.as_str() })?;

        let status = rsp.status();
        if !status.is_success() {
            debug!(?prefix, %status, "Student fetch was not successful");
            return NoRecordSnafu { prefix }.fail();
        }

        let body = rsp
            .bytes()
            .await
            .context(UnreachableSnafu { url: url.as_str() })?;
        let raw = decode_record(&body).context(NoRecordSnafu { prefix })?;

        Ok(Student::normalize(raw, &self.origin))
    }

    /// Fetches every prefix at once. Failures are logged and left out, the
    /// rest keep index order.
    pub async fn fetch_students(&self, index: &PrefixIndex) -> Vec<Student> {
        let fetches = index
            .iter()
            .map(|prefix| async move { (prefix, self.fetch_student(prefix).await) });

        let settled = join_all(fetches).await;
        let attempted = settled.len();

        let students: Vec<Student> = settled
            .into_iter()
            .filter_map(|(prefix, result)| match result {
                Ok(student) => Some(student),
                Err(e) => {
                    warn!(?prefix, %e, "Dropping student that failed to load");
                    None
                }
            })
            .collect();

        info!(attempted, loaded = students.len(), "Preloaded students");
        students
    }
}

/// A record is either a bare object or a one-element array holding it.
fn decode_record(body: &[u8]) -> Option<RawStudent> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    let value: Value = serde_json::from_slice(body)
        .inspect_err(|e| warn!(?e, "Student body was not JSON"))
        .ok()?;

    let record = match value {
        Value::Object(_) => value,
        Value::Array(mut items) if items.len() == 1 => items.pop()?,
        _ => return None,
    };
    if !record.is_object() {
        return None;
    }

    serde_json::from_value(record)
        .inspect_err(|e| warn!(?e, "Student record had an unexpected shape"))
        .ok()
}


#[cfg(test)]
mod tests {
    use super::{fake_api::*, *};
    use crate::error::RollcallError;
    use axum::{Router, http::StatusCode, routing::get};
    use serde_json::json;

    async fn client_for(router: Router) -> DirectoryClient {
        DirectoryClient::new(Arc::new(serve(router).await)).unwrap()
    }

    #[tokio::test]
    async fn index_is_deduplicated() {
        let client = client_for(directory_api(
            json!([{"prefix": "ab12"}, {"prefix": "cd34"}, {"prefix": "ab12"}]),
            vec![],
        ))
        .await;

        let index = client.fetch_index().await.unwrap();
        assert_eq!(index.as_slice(), ["ab12", "cd34"]);
    }

    #[tokio::test]
    async fn malformed_index_entries_do_not_fail_the_index() {
        let client = client_for(directory_api(
            json!([null, {"prefix": 123}, {"prefix": "ab12"}]),
            vec![],
        ))
        .await;

        let index = client.fetch_index().await.unwrap();
        assert_eq!(index.as_slice(), ["ab12"]);
    }

    #[test]
    fn off_type_fields_keep_the_record() {
        let raw = decode_record(
            br#"{"name":{"first":"Ada"},"media":{"src":"/a.jpg","hasImage":"true"},"mascot":7,"links":[]}"#,
        )
        .unwrap();
        assert_eq!(raw.name.unwrap().display_name(), "Ada");
        assert!(raw.mascot.is_none());
        assert!(raw.links.is_none());
    }

    #[tokio::test]
    async fn non_array_index_is_unavailable() {
        let client = client_for(directory_api(json!({"prefix": "ab12"}), vec![])).await;
        let err = client.fetch_index().await.unwrap_err();
        assert!(matches!(err, RollcallError::MalformedIndex { .. }));
    }

    #[tokio::test]
    async fn failing_index_status_is_unavailable() {
        let router = Router::new().route(BASE_PATH, get(|| async { StatusCode::BAD_GATEWAY }));
        let client = client_for(router).await;
        let err = client.fetch_index().await.unwrap_err();
        assert!(matches!(
            err,
            RollcallError::IndexStatus { status } if status == StatusCode::BAD_GATEWAY
        ));
    }

    #[tokio::test]
    async fn object_and_single_element_array_are_equivalent() {
        let client = client_for(directory_api(
            json!([]),
            vec![
                ("obj", StatusCode::OK, json!({"name": {"first": "Ada"}})),
                ("arr", StatusCode::OK, json!([{"name": {"first": "Ada"}}])),
            ],
        ))
        .await;

        let from_object = client.fetch_student("obj").await.unwrap();
        let from_array = client.fetch_student("arr").await.unwrap();
        assert_eq!(from_object, from_array);
        assert_eq!(from_object.display_name, "Ada");
    }

    #[tokio::test]
    async fn empty_bodies_and_other_shapes_are_not_found() {
        let client = client_for(directory_api(
            json!([]),
            vec![
                ("empty", StatusCode::OK, Value::Null),
                ("none", StatusCode::OK, json!([])),
                ("many", StatusCode::OK, json!([{}, {}])),
                ("text", StatusCode::OK, json!("hello")),
                ("gone", StatusCode::INTERNAL_SERVER_ERROR, json!({})),
            ],
        ))
        .await;

        for prefix in ["empty", "none", "many", "text", "gone", "missing"] {
            let err = client.fetch_student(prefix).await.unwrap_err();
            assert!(
                matches!(&err, RollcallError::NoRecord { prefix: p } if p == prefix),
                "{prefix}: {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn blank_prefix_is_rejected_without_a_request() {
        let client = DirectoryClient::new(Arc::new(dead_api().await)).unwrap();
        let err = client.fetch_student("   ").await.unwrap_err();
        assert!(matches!(err, RollcallError::EmptyPrefix));
    }

    #[tokio::test]
    async fn network_failure_is_unreachable() {
        let client = DirectoryClient::new(Arc::new(dead_api().await)).unwrap();
        let err = client.fetch_student("ab12").await.unwrap_err();
        assert!(matches!(err, RollcallError::Unreachable { .. }));
    }

    #[tokio::test]
    async fn prefixes_are_percent_encoded() {
        let client = client_for(directory_api(
            json!([]),
            vec![("a b", StatusCode::OK, json!({"name": {"first": "Spaced"}}))],
        ))
        .await;

        assert!(client.student_url("a b/c").as_str().ends_with("/students/a%20b%2Fc"));
        assert_eq!(
            client.fetch_student("a b").await.unwrap().display_name,
            "Spaced"
        );
    }

    #[tokio::test]
    async fn fan_out_drops_failures_and_keeps_order() {
        let client = client_for(directory_api(
            json!([]),
            vec![
                ("one", StatusCode::OK, json!({"name": {"first": "One"}})),
                ("two", StatusCode::NOT_FOUND, Value::Null),
                ("three", StatusCode::OK, json!([{"name": {"first": "Three"}}])),
            ],
        ))
        .await;

        let index = PrefixIndex::from_prefixes(["one", "two", "three"].map(String::from));
        let names: Vec<_> = client
            .fetch_students(&index)
            .await
            .into_iter()
            .map(|s| s.display_name)
            .collect();
        assert_eq!(names, ["One", "Three"]);
    }
}
