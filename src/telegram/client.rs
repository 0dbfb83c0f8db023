//! Bot API HTTP client

use super::types::{
    AnswerCallbackQuery, ApiResponse, File, GetFile, GetUpdates, InlineKeyboardMarkup, SendMessage,
    Update, User,
};
use super::TelegramError;
use crate::exercises::Menu;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

const ALLOWED_UPDATES: [&str; 2] = ["message", "callback_query"];

/// Timeout for ordinary calls; long polls add their own poll timeout on top
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base: String,
    token: String,
}

impl TelegramClient {
    pub fn new(base: impl Into<String>, token: impl Into<String>) -> Result<Self, TelegramError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.base, self.token)
    }

    async fn call<P, T>(&self, method: &str, params: &P, timeout: Duration) -> Result<T, TelegramError>
    where
        P: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(params)
            .send()
            .await
            // The URL carries the bot token
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;

        let envelope: ApiResponse<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
            Err(e) => return Err(TelegramError::Decode(format!("{method}: {e}"))),
        };

        if !envelope.ok {
            return Err(TelegramError::Api {
                status: status.as_u16(),
                description: envelope
                    .description
                    .unwrap_or_else(|| format!("{method} failed with HTTP {status}")),
            });
        }
        envelope
            .result
            .ok_or_else(|| TelegramError::Decode(format!("{method}: missing result")))
    }

    /// Identity of the bot behind the token
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({}), REQUEST_TIMEOUT).await
    }

    /// Long-poll for updates with id >= `offset`
    pub async fn get_updates(&self, offset: i64, poll_timeout: Duration) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdates {
            offset,
            timeout: poll_timeout.as_secs(),
            allowed_updates: &ALLOWED_UPDATES,
        };
        self.call("getUpdates", &params, REQUEST_TIMEOUT + poll_timeout)
            .await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str, menu: Option<&Menu>) -> Result<(), TelegramError> {
        let params = SendMessage {
            chat_id,
            text,
            reply_markup: menu.map(InlineKeyboardMarkup::from),
        };
        let _: serde_json::Value = self.call("sendMessage", &params, REQUEST_TIMEOUT).await?;
        Ok(())
    }

    /// Resolve a file id to its download path
    pub async fn get_file(&self, file_id: &str) -> Result<String, TelegramError> {
        let file: File = self
            .call("getFile", &GetFile { file_id }, REQUEST_TIMEOUT)
            .await?;
        file.file_path
            .ok_or_else(|| TelegramError::Decode(format!("getFile: no file_path for {file_id}")))
    }

    pub async fn download(&self, file_path: &str) -> Result<Vec<u8>, TelegramError> {
        let url = format!("{}/file/bot{}/{file_path}", self.base, self.token);
        let response = self
            .client
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TelegramError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await.map_err(reqwest::Error::without_url)?;
        Ok(bytes.to_vec())
    }

    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TelegramError> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &AnswerCallbackQuery { callback_query_id },
                REQUEST_TIMEOUT,
            )
            .await?;
        Ok(())
    }
}
