use super::{fallback_cookie, ApiClient, ApiError, ApiResult};
use crate::backend::AccountBackend;
use crate::models::AccountInfo;

impl AccountBackend for ApiClient {
    async fn get_account(&self) -> ApiResult<AccountInfo> {
        self.request_json(reqwest::Method::GET, "/account", None)
            .await
    }

    async fn create_email_session(&mut self, email: &str, password: &str) -> ApiResult<()> {
        let client = reqwest::Client::new();
        let req = client
            .post(self.url("/account/sessions/email"))
            .json(&serde_json::json!({ "email": email, "password": password }));

        let res = self.send(req).await?;
        match fallback_cookie(&res) {
            Some(cookie) => self.set_session(cookie),
            None => log::debug!("session created without fallback cookie"),
        }
        Ok(())
    }

    async fn delete_current_session(&mut self) -> ApiResult<()> {
        self.request_empty(reqwest::Method::DELETE, "/account/sessions/current")
            .await?;
        self.clear_session();
        Ok(())
    }

    async fn create_account(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> ApiResult<AccountInfo> {
        let body = serde_json::json!({
            "userId": "unique()",
            "email": email,
            "password": password,
            "name": name,
        });
        let data: serde_json::Value = self
            .request_json(reqwest::Method::POST, "/account", Some(&body))
            .await?;
        serde_json::from_value(data).map_err(ApiError::parse)
    }
}
