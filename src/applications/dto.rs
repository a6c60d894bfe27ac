use serde::{Deserialize, Serialize};

use super::repo_types::Application;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationRequest {
    pub job_id: Option<String>,
    pub cover_letter: Option<String>,
    #[serde(alias = "resumeLink")]
    pub resume: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

/// `{msg, application}` as returned by submit and status update.
#[derive(Debug, Serialize)]
pub struct ApplicationReceipt {
    pub msg: &'static str,
    pub application: Application,
}
