use reqwest::Client;
use serde_json::json;
use sqlx::PgPool;

pub struct PushService {
    pub client: Client,
    pub fcm_api_key: Option<String>,
}

impl PushService {
    pub fn new(fcm_api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            fcm_api_key,
        }
    }

    /// Send a push to an owner's registered devices. Best-effort: every
    /// failure is logged and swallowed so it can never fail the operation
    /// that triggered it.
    pub async fn notify_owner(
        &self,
        pool: &PgPool,
        owner_id: i64,
        title: &str,
        body: &str,
        data: Option<serde_json::Value>,
    ) {
        let tokens: Vec<(String, String)> = match sqlx::query_as(
            "SELECT platform, token FROM push_tokens WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
        {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("Failed to load push tokens for owner {owner_id}: {e}");
                return;
            }
        };

        for (_, token) in tokens {
            if let Err(e) = self.send_fcm(&token, title, body, data.clone()).await {
                tracing::warn!("Push send failed: {e}");
            }
        }
    }

    async fn send_fcm(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: Option<serde_json::Value>,
    ) -> anyhow::Result<()> {
        let api_key = match &self.fcm_api_key {
            Some(k) => k,
            None => {
                tracing::debug!("FCM not configured, skipping push notification");
                return Ok(());
            }
        };

        let mut payload = json!({
            "to": token,
            "notification": {
                "title": title,
                "body": body,
            }
        });

        if let Some(d) = data {
            payload["data"] = d;
        }

        let response = self
            .client
            .post("https://fcm.googleapis.com/fcm/send")
            .header("Authorization", format!("key={}", api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::warn!("FCM error {}: {}", status, text);
        }

        Ok(())
    }

    pub async fn register_token(
        pool: &PgPool,
        owner_id: i64,
        platform: &str,
        token: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO push_tokens (owner_id, platform, token)
             VALUES ($1, $2, $3)
             ON CONFLICT (owner_id, token) DO NOTHING",
        )
        .bind(owner_id)
        .bind(platform)
        .bind(token)
        .execute(pool)
        .await?;
        Ok(())
    }
}
