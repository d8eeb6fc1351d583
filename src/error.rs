//! クレート共通のエラー型
//!
//! adapter 層の配管エラー（I/O・JSON・引数不正）を表す。ドメインの
//! 事前条件違反は `domain::state::TourError` が別に担う。

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Json(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Env(String),
}

impl Error {
    /// I/O エラーをメッセージから作る
    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    /// JSON 変換エラー
    pub fn json(msg: impl Into<String>) -> Self {
        Error::Json(msg.into())
    }

    /// 引数不正
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// 環境変数まわりのエラー
    pub fn env(msg: impl Into<String>) -> Self {
        Error::Env(msg.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
