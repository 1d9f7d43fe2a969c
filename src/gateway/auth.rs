use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId, endpoints, gateway::Gateway};

/// The account the session's credentials belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The ID of the account.
    pub id: DatabaseId,
    /// The name the user logs in with.
    pub username: String,
    /// The user's email address.
    pub email: String,
    /// The user's role, e.g. "USER" or "ADMIN".
    pub role: String,
}

impl Gateway {
    /// Fetch the profile of the logged in user.
    ///
    /// Logging in never contacts the backend, so this is how the client finds
    /// out whether the credentials are accepted. A rejection clears the
    /// session like any other request.
    pub async fn current_user(&self) -> Result<UserProfile, Error> {
        let url = self.endpoint_url(endpoints::CURRENT_USER)?;

        self.get_json(url).await
    }
}
