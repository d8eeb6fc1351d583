//! 計測イベントを HTTP POST する Sink
//!
//! レコードを JSON のままエンドポイントへ送る。送信失敗は呼び出し側
//! （AnalyticsHub）が警告ログにするだけで、ツアーの進行は止めない。

use crate::domain::event::TourEventRecord;
use crate::error::Error;
use crate::ports::outbound::analytics::AnalyticsSink;
use anyhow::Result;
use std::env;
use std::time::Duration;

const ANALYTICS_URL_ENV: &str = "TOUR_ANALYTICS_URL";
const REQUEST_TIMEOUT_SECS: u64 = 5;

/// 計測エンドポイントへ 1 レコードずつ POST する Sink
pub struct HttpAnalyticsSink {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpAnalyticsSink {
    /// エンドポイント URL を指定して作成
    ///
    /// track が呼び出し元スレッドを塞ぎ続けないよう、送信タイムアウトを
    /// 付けた client を組む。client を組めない環境ではエラー。
    pub fn new(endpoint: impl Into<String>) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::io_msg(format!("analytics http client init failed: {}", e)))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// TOUR_ANALYTICS_URL 環境変数からエンドポイントを読む
    pub fn from_env() -> Result<Self, Error> {
        let endpoint = env::var(ANALYTICS_URL_ENV)
            .map_err(|_| Error::env(format!("{} environment variable is not set", ANALYTICS_URL_ENV)))?;
        Self::new(endpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl AnalyticsSink for HttpAnalyticsSink {
    fn track(&mut self, rec: &TourEventRecord) -> Result<()> {
        let response = self.client.post(&self.endpoint).json(rec).send()?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("analytics endpoint returned {}", status);
        }
        Ok(())
    }
}
