use serde::Deserialize;

use crate::validate::ListInput;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    #[serde(alias = "linkedin_url")]
    pub linkedin_url: Option<String>,
    pub skills: Option<ListInput>,
    #[serde(alias = "public_wallet_address", alias = "publicWalletAddress")]
    pub wallet_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExtractSkillsRequest {
    pub text: Option<String>,
}
