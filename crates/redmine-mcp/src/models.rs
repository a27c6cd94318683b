//! MCP tool parameter models.
//!
//! Each struct is deserialized from the tool call arguments and also provides
//! the JSON Schema advertised to clients (via `schemars`). The query-building
//! helpers turn a parameter set into the `key=value` pairs sent to Redmine.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default page size for `getIssues`.
pub const DEFAULT_ISSUE_LIMIT: u32 = 25;

/// Default page size for `getProjects`.
pub const DEFAULT_PROJECT_LIMIT: u32 = 100;

fn default_issue_limit() -> u32 {
    DEFAULT_ISSUE_LIMIT
}

fn default_project_limit() -> u32 {
    DEFAULT_PROJECT_LIMIT
}

/// Query pairs in the order they are sent.
pub type QueryPairs = Vec<(&'static str, String)>;

/// Parameters for the `getIssues` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListIssuesParams {
    /// Project ID or identifier to filter by.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Status ID, or `open`, `closed`, `*`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_id: Option<String>,

    /// Tracker ID to filter by.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker_id: Option<String>,

    /// Assignee user ID, or `me`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<String>,

    /// Maximum number of issues to return. Must be a whole number.
    #[serde(default = "default_issue_limit")]
    pub limit: u32,

    /// Number of issues to skip. Must be a whole number.
    #[serde(default)]
    pub offset: u32,

    /// Sort expression, e.g. `updated_on:desc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl Default for ListIssuesParams {
    fn default() -> Self {
        Self {
            project_id: None,
            status_id: None,
            tracker_id: None,
            assigned_to_id: None,
            limit: DEFAULT_ISSUE_LIMIT,
            offset: 0,
            sort: None,
        }
    }
}

impl ListIssuesParams {
    /// Build the query string pairs. Absent filters are omitted.
    #[must_use]
    pub fn query(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "project_id", self.project_id.as_ref());
        push_opt(&mut pairs, "status_id", self.status_id.as_ref());
        push_opt(&mut pairs, "tracker_id", self.tracker_id.as_ref());
        push_opt(&mut pairs, "assigned_to_id", self.assigned_to_id.as_ref());
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("offset", self.offset.to_string()));
        push_opt(&mut pairs, "sort", self.sort.as_ref());
        pairs
    }
}

/// Parameters for the `getIssue` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetIssueParams {
    /// Issue ID, as a whole number.
    pub id: u64,

    /// Comma-separated related data to include: journals, attachments,
    /// relations, changesets, watchers, children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
}

impl GetIssueParams {
    /// Resource path for this issue.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/issues/{}.json", self.id)
    }

    /// Build the query string pairs.
    #[must_use]
    pub fn query(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_opt(
            &mut pairs,
            "include",
            self.include.as_ref().filter(|s| !s.is_empty()),
        );
        pairs
    }
}

/// Parameters for the `getProjects` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListProjectsParams {
    /// Maximum number of projects to return. Must be a whole number.
    #[serde(default = "default_project_limit")]
    pub limit: u32,

    /// Number of projects to skip. Must be a whole number.
    #[serde(default)]
    pub offset: u32,
}

impl Default for ListProjectsParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PROJECT_LIMIT,
            offset: 0,
        }
    }
}

impl ListProjectsParams {
    /// Build the query string pairs.
    #[must_use]
    pub fn query(&self) -> QueryPairs {
        vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ]
    }
}

/// Parameters for the `initialize` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Redmine base URL including scheme, e.g. `https://redmine.example.com`.
    pub base_url: String,

    /// Redmine REST API key.
    pub api_key: String,
}

fn push_opt(pairs: &mut QueryPairs, key: &'static str, value: Option<&String>) {
    if let Some(value) = value {
        pairs.push((key, value.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    fn keys(pairs: &QueryPairs) -> Vec<&'static str> {
        pairs.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_list_issues_defaults_from_empty_arguments() {
        let params: ListIssuesParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(params.limit, DEFAULT_ISSUE_LIMIT);
        assert_eq!(params.offset, 0);
        assert_eq!(
            params.query(),
            vec![("limit", "25".to_string()), ("offset", "0".to_string())]
        );
    }

    #[test]
    fn test_list_issues_project_and_limit() {
        let params: ListIssuesParams =
            serde_json::from_value(json!({"project_id": "3", "limit": 10})).unwrap();
        assert_eq!(keys(&params.query()), vec!["project_id", "limit", "offset"]);
        assert_eq!(
            params.query(),
            vec![
                ("project_id", "3".to_string()),
                ("limit", "10".to_string()),
                ("offset", "0".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_issues_all_filters() {
        let params = ListIssuesParams {
            project_id: Some("web".to_string()),
            status_id: Some("open".to_string()),
            tracker_id: Some("1".to_string()),
            assigned_to_id: Some("me".to_string()),
            limit: 5,
            offset: 10,
            sort: Some("updated_on:desc".to_string()),
        };
        assert_eq!(
            keys(&params.query()),
            vec![
                "project_id",
                "status_id",
                "tracker_id",
                "assigned_to_id",
                "limit",
                "offset",
                "sort"
            ]
        );
    }

    #[test]
    fn test_get_issue_path_and_include() {
        let params: GetIssueParams =
            serde_json::from_value(json!({"id": 42, "include": "journals,watchers"})).unwrap();
        assert_eq!(params.path(), "/issues/42.json");
        assert_eq!(
            params.query(),
            vec![("include", "journals,watchers".to_string())]
        );
    }

    #[test]
    fn test_get_issue_without_include_has_no_query() {
        let params: GetIssueParams = serde_json::from_value(json!({"id": 7})).unwrap();
        assert!(params.query().is_empty());

        let params: GetIssueParams =
            serde_json::from_value(json!({"id": 7, "include": ""})).unwrap();
        assert!(params.query().is_empty());
    }

    #[test]
    fn test_get_issue_requires_id() {
        let result: Result<GetIssueParams, _> = serde_json::from_value(json!({}));
        assert!(result.is_err());
    }

    #[test]
    fn test_list_projects_defaults() {
        let params: ListProjectsParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(
            params.query(),
            vec![("limit", "100".to_string()), ("offset", "0".to_string())]
        );
    }

    #[test]
    fn test_initialize_params_use_camel_case() {
        let params: InitializeParams =
            serde_json::from_value(json!({"baseUrl": "https://example.com", "apiKey": "k1"}))
                .unwrap();
        assert_eq!(params.base_url, "https://example.com");
        assert_eq!(params.api_key, "k1");
    }

    #[test]
    fn test_list_issues_schema_has_no_required_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(ListIssuesParams)).unwrap();
        let required = schema.get("required").and_then(|r| r.as_array());
        assert!(required.is_none_or(Vec::is_empty));
    }

    #[rstest]
    #[case::issue_limit(schemars::schema_for!(ListIssuesParams), "limit")]
    #[case::issue_offset(schemars::schema_for!(ListIssuesParams), "offset")]
    #[case::issue_id(schemars::schema_for!(GetIssueParams), "id")]
    #[case::project_limit(schemars::schema_for!(ListProjectsParams), "limit")]
    fn test_numeric_fields_are_advertised_as_integers(
        #[case] schema: schemars::Schema,
        #[case] field: &str,
    ) {
        let schema = serde_json::to_value(schema).unwrap();
        let property = &schema["properties"][field];
        assert_eq!(property["type"], "integer");
        assert!(property["description"]
            .as_str()
            .unwrap()
            .contains("whole number"));
    }

    #[test]
    fn test_fractional_numbers_are_rejected() {
        assert!(serde_json::from_value::<ListIssuesParams>(json!({"limit": 10.0})).is_err());
        assert!(serde_json::from_value::<ListProjectsParams>(json!({"offset": 2.5})).is_err());
        assert!(serde_json::from_value::<GetIssueParams>(json!({"id": 42.0})).is_err());
    }

    proptest! {
        #[test]
        fn prop_list_issues_query_has_only_supplied_keys(
            project_id in proptest::option::of("[a-z0-9]{1,8}"),
            status_id in proptest::option::of("[a-z0-9*]{1,6}"),
            tracker_id in proptest::option::of("[0-9]{1,3}"),
            assigned_to_id in proptest::option::of("[a-z0-9]{1,6}"),
            sort in proptest::option::of("[a-z_:]{1,12}"),
            limit in proptest::option::of(0u32..1000),
            offset in proptest::option::of(0u32..1000),
        ) {
            let mut args = serde_json::Map::new();
            let mut expected = vec!["limit", "offset"];
            for (key, value) in [
                ("project_id", &project_id),
                ("status_id", &status_id),
                ("tracker_id", &tracker_id),
                ("assigned_to_id", &assigned_to_id),
                ("sort", &sort),
            ] {
                if let Some(value) = value {
                    args.insert(key.to_string(), json!(value));
                    expected.push(key);
                }
            }
            if let Some(limit) = limit {
                args.insert("limit".to_string(), json!(limit));
            }
            if let Some(offset) = offset {
                args.insert("offset".to_string(), json!(offset));
            }

            let params: ListIssuesParams =
                serde_json::from_value(serde_json::Value::Object(args)).unwrap();
            let pairs = params.query();

            let mut actual = keys(&pairs);
            actual.sort_unstable();
            expected.sort_unstable();
            prop_assert_eq!(actual, expected);

            let find = |key: &str| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone());
            prop_assert_eq!(find("limit"), Some(limit.unwrap_or(DEFAULT_ISSUE_LIMIT).to_string()));
            prop_assert_eq!(find("offset"), Some(offset.unwrap_or(0).to_string()));
        }
    }
}
