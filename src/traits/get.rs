//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::GerritClient;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// Implement this trait for entity types that Gerrit exposes at a
/// per-entity URL (a project by name, an account by numeric id).
///
/// # Example
///
/// ```ignore
/// use gerritapi::{AccountDetail, GerritClient, Get};
///
/// let client = GerritClient::from_env()?;
/// let account = AccountDetail::get(&client, 1000096).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity.
    type Id: Send;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the body does not describe this entity.
    async fn get(client: &GerritClient, id: Self::Id) -> Result<Self>;
}
