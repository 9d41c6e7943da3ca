//! Account model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::GerritClient;
use crate::error::Result;
use crate::pagination::Collected;
use crate::traits::Get;

/// Lists the minimal entries of every active account.
pub const ACTIVE_ACCOUNTS_PATH: &str = "/accounts/?q=is:active";

/// Key Gerrit uses for numeric account ids.
pub const ACCOUNT_ID_FIELD: &str = "_account_id";

/// Account details as returned by `/accounts/{id}/detail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetail {
    #[serde(rename = "_account_id")]
    pub account_id: u64,

    /// Full name.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    /// Registration timestamp as reported by Gerrit.
    #[serde(default)]
    pub registered_on: Option<String>,
}

impl AccountDetail {
    /// An entry that only knows its id, used when the lookup failed.
    pub fn unresolved(account_id: u64) -> Self {
        Self {
            account_id,
            name: None,
            email: None,
            username: None,
            registered_on: None,
        }
    }

    /// Path of this account's detail endpoint.
    pub fn detail_path(account_id: u64) -> String {
        format!("/accounts/{account_id}/detail")
    }
}

#[async_trait]
impl Get for AccountDetail {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &GerritClient, account_id: u64) -> Result<Self> {
        let value = client
            .fetch(&Self::detail_path(account_id))
            .await
            .into_json()?;
        Ok(serde_json::from_value(value)?)
    }
}

/// The numeric account id carried by a reference such as `{"_account_id": 7}`.
pub fn account_id_of(reference: &Value) -> Option<u64> {
    reference.get(ACCOUNT_ID_FIELD).and_then(Value::as_u64)
}

/// Get full details for every active account.
///
/// Lists the active accounts page by page, then looks up each one.
#[tracing::instrument(skip(client))]
pub async fn get_active_accounts(client: &GerritClient) -> Collected<Vec<AccountDetail>> {
    let (entries, mut warnings) = client.fetch_all(ACTIVE_ACCOUNTS_PATH).await.into_parts();
    tracing::info!("Number of active user accounts: {}", entries.len());

    let details = client.account_details(&entries).await;
    warnings.extend(details.warnings);
    Collected::with_warnings(details.items, warnings)
}
