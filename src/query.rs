use serde::{Deserialize, Serialize};

use crate::client::HttpRequest;
use crate::error::FetchError;
use crate::relay::Relay;
use crate::stats::Difficulty;
use crate::username::Username;

pub const USER_PROGRESS_QUERY: &str = r#"
query userSessionProgress($username: String!) {
  allQuestionsCount { difficulty count }
  matchedUser(username: $username) {
    submitStats {
      acSubmissionNum { difficulty count submissions }
      totalSubmissionNum { difficulty count submissions }
    }
  }
}"#;

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'static str,
    variables: Variables<'a>,
}

#[derive(Debug, Serialize)]
struct Variables<'a> {
    username: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlResponse {
    pub data: Option<ProfileData>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    #[serde(default)]
    pub all_questions_count: Vec<QuestionCountEntry>,
    pub matched_user: Option<MatchedUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedUser {
    pub submit_stats: SubmitStats,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStats {
    pub ac_submission_num: Vec<SubmissionStat>,
    pub total_submission_num: Vec<SubmissionStat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct QuestionCountEntry {
    pub difficulty: Difficulty,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SubmissionStat {
    pub difficulty: Difficulty,
    pub count: u64,
    pub submissions: u64,
}

/// Builds the progress query for `username`, addressed through `relay`.
pub fn build_request(
    relay: &Relay,
    endpoint: &str,
    username: &Username,
) -> Result<HttpRequest, FetchError> {
    let body = serde_json::to_vec(&GraphqlRequest {
        query: USER_PROGRESS_QUERY,
        variables: Variables {
            username: username.as_str(),
        },
    })
    .map_err(|e| FetchError::Transport(format!("Failed to encode request: {}", e)))?;

    let mut request = relay.route(endpoint);
    request
        .headers
        .push(("content-type".to_string(), "application/json".to_string()));
    request.body = body;
    Ok(request)
}

pub fn decode_response(body: &[u8]) -> Result<GraphqlResponse, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))
}
