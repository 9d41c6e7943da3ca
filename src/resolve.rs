//! Account reference resolution.
//!
//! Change records refer to people as `{"_account_id": 1000096}`. These
//! helpers look each reference up and substitute the account's name.

use serde_json::Value;

use crate::client::GerritClient;
use crate::error::{FetchWarning, GerritError, Result};
use crate::models::{account_id_of, AccountDetail, ACCOUNT_ID_FIELD};
use crate::pagination::{Collected, Record};
use crate::traits::Get;

/// Fields of a change record that hold account references.
pub const ACCOUNT_REFERENCE_FIELDS: [&str; 2] = ["owner", "submitter"];

impl GerritClient {
    /// Look up an account's display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails or the detail has no name.
    pub async fn account_name(&self, account_id: u64) -> Result<String> {
        AccountDetail::get(self, account_id)
            .await?
            .name
            .ok_or(GerritError::MissingField { field: "name" })
    }

    /// Replace `owner` and `submitter` references with account names.
    ///
    /// Records are processed in order, one lookup per reference. A failed
    /// lookup sets the field to `null` and yields a warning; fields that are
    /// absent or do not carry an account id are left untouched.
    pub async fn resolve_references(&self, records: &mut [Record]) -> Vec<FetchWarning> {
        let mut warnings = Vec::new();

        for record in records.iter_mut() {
            for field in ACCOUNT_REFERENCE_FIELDS {
                let Some(account_id) = record.get(field).and_then(account_id_of) else {
                    continue;
                };

                let resolved = match self.account_name(account_id).await {
                    Ok(name) => Value::String(name),
                    Err(err) => {
                        warnings.push(FetchWarning::new(
                            self.url_for(&AccountDetail::detail_path(account_id)),
                            err,
                        ));
                        Value::Null
                    }
                };
                record.insert(field.to_string(), resolved);
            }
        }

        warnings
    }

    /// Fetch the full detail of every account entry.
    ///
    /// The result has one detail per entry that carries an id; a failed
    /// lookup contributes [`AccountDetail::unresolved`] and a warning.
    pub async fn account_details(&self, entries: &[Record]) -> Collected<Vec<AccountDetail>> {
        let mut details = Vec::with_capacity(entries.len());
        let mut warnings = Vec::new();

        for entry in entries {
            let Some(account_id) = entry.get(ACCOUNT_ID_FIELD).and_then(Value::as_u64) else {
                warnings.push(FetchWarning::new(
                    self.url_for("/accounts/"),
                    GerritError::MissingField {
                        field: ACCOUNT_ID_FIELD,
                    },
                ));
                continue;
            };

            match AccountDetail::get(self, account_id).await {
                Ok(detail) => details.push(detail),
                Err(err) => {
                    warnings.push(FetchWarning::new(
                        self.url_for(&AccountDetail::detail_path(account_id)),
                        err,
                    ));
                    details.push(AccountDetail::unresolved(account_id));
                }
            }
        }

        Collected::with_warnings(details, warnings)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::transport::stub::{envelope, StubTransport};
    use crate::transport::RawResponse;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    /// Accounts 1..=9 exist and are named "User <id>"; others are 404.
    fn accounts_client() -> (GerritClient, Arc<StubTransport>) {
        let stub = Arc::new(StubTransport::new(|url| {
            let id: u64 = url
                .trim_end_matches("/detail")
                .rsplit('/')
                .next()
                .and_then(|id| id.parse().ok())
                .unwrap_or(0);
            if (1..=9).contains(&id) {
                Ok(envelope(&json!({"_account_id": id, "name": format!("User {id}")})))
            } else {
                Ok(RawResponse::text(404, format!("Account '{id}' not found")))
            }
        }));
        let client = GerritClient::with_transport(
            Url::parse("https://gerrit.example.com").unwrap(),
            stub.clone(),
        );
        (client, stub)
    }

    #[tokio::test]
    async fn test_owner_is_replaced_by_name() {
        let (client, _) = accounts_client();
        let mut records = vec![record(json!({"id": "c1", "owner": {"_account_id": 7}}))];

        let warnings = client.resolve_references(&mut records).await;

        assert!(warnings.is_empty());
        assert_eq!(records[0]["owner"], json!("User 7"));
        assert!(!records[0].contains_key("submitter"));
    }

    #[tokio::test]
    async fn test_owner_and_submitter_resolved_in_order() {
        let (client, stub) = accounts_client();
        let mut records = vec![
            record(json!({"owner": {"_account_id": 1}, "submitter": {"_account_id": 2}})),
            record(json!({"owner": {"_account_id": 3}})),
        ];

        client.resolve_references(&mut records).await;

        assert_eq!(records[0]["owner"], json!("User 1"));
        assert_eq!(records[0]["submitter"], json!("User 2"));
        assert_eq!(records[1]["owner"], json!("User 3"));
        assert_eq!(
            stub.requested(),
            vec![
                "https://gerrit.example.com/accounts/1/detail",
                "https://gerrit.example.com/accounts/2/detail",
                "https://gerrit.example.com/accounts/3/detail",
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_lookup_sets_null_and_warns() {
        let (client, _) = accounts_client();
        let mut records = vec![record(json!({"owner": {"_account_id": 404}}))];

        let warnings = client.resolve_references(&mut records).await;

        assert_eq!(records[0]["owner"], Value::Null);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].url.ends_with("/accounts/404/detail"));
    }

    #[tokio::test]
    async fn test_detail_without_name_sets_null() {
        let stub = Arc::new(StubTransport::new(|_| Ok(envelope(&json!({"_account_id": 5})))));
        let client =
            GerritClient::with_transport(Url::parse("https://gerrit.example.com").unwrap(), stub);
        let mut records = vec![record(json!({"owner": {"_account_id": 5}}))];

        let warnings = client.resolve_references(&mut records).await;

        assert_eq!(records[0]["owner"], Value::Null);
        assert!(matches!(
            warnings[0].error,
            GerritError::MissingField { field: "name" }
        ));
    }

    #[tokio::test]
    async fn test_missing_or_plain_references_untouched() {
        let (client, stub) = accounts_client();
        let mut records = vec![
            record(json!({"id": "c1"})),
            record(json!({"owner": "already resolved"})),
        ];

        let warnings = client.resolve_references(&mut records).await;

        assert!(warnings.is_empty());
        assert_eq!(records[1]["owner"], json!("already resolved"));
        assert!(stub.requested().is_empty());
    }

    #[tokio::test]
    async fn test_account_details_keep_cardinality() {
        let (client, _) = accounts_client();
        let entries = vec![
            record(json!({"_account_id": 1})),
            record(json!({"_account_id": 42})),
            record(json!({"_account_id": 2})),
        ];

        let details = client.account_details(&entries).await;

        assert_eq!(details.items.len(), 3);
        assert_eq!(details.items[0].name.as_deref(), Some("User 1"));
        assert_eq!(details.items[1], AccountDetail::unresolved(42));
        assert_eq!(details.items[2].name.as_deref(), Some("User 2"));
        assert_eq!(details.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_account_entry_without_id_is_skipped() {
        let (client, _) = accounts_client();
        let entries = vec![record(json!({"name": "anonymous"}))];

        let details = client.account_details(&entries).await;

        assert!(details.items.is_empty());
        assert!(matches!(
            details.warnings[0].error,
            GerritError::MissingField { field: "_account_id" }
        ));
    }
}
