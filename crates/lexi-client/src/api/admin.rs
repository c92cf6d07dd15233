//! Administration endpoints (admin role only)

use serde_json::{json, Value};

use crate::endpoints;
use crate::error::ClientResult;
use crate::http::ApiClient;

use super::item_path;

pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// GET /admin/users
    pub async fn users(&self) -> ClientResult<Value> {
        self.client.get(&users_path()).await
    }

    /// PUT /admin/users/{id}/role
    pub async fn set_user_role(&self, user_id: &str, role: &str) -> ClientResult<Value> {
        let path = format!("{}/role", item_path(&users_path(), user_id));
        self.client.put(&path, &json!({ "role": role })).await
    }

    /// DELETE /admin/users/{id}
    pub async fn delete_user(&self, user_id: &str) -> ClientResult<Value> {
        self.client.delete(&item_path(&users_path(), user_id)).await
    }

    /// GET /admin/stats
    pub async fn stats(&self) -> ClientResult<Value> {
        self.client
            .get(&format!("{}/stats", endpoints::ADMIN))
            .await
    }
}

fn users_path() -> String {
    format!("{}/users", endpoints::ADMIN)
}
