//! 支払いフォームのクライアント側検証（カード番号と有効期限）
//!
//! チェックアウト画面のツアーが案内する入力検証と同じ規則をヘッドレスに
//! 提供する。番号は Luhn チェック、期限は MM/YY または MM/YYYY 形式。

use chrono::{Datelike, TimeZone, Utc};
use regex::Regex;
use thiserror::Error;

/// カード番号として受け付ける最小桁数
pub const CARD_NUMBER_MIN_DIGITS: usize = 13;
/// カード番号として受け付ける最大桁数
pub const CARD_NUMBER_MAX_DIGITS: usize = 19;

const EXPIRY_PATTERN: &str = r"^(0[1-9]|1[0-2])/([0-9]{2}|[0-9]{4})$";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    /// MM/YY・MM/YYYY のどちらにも一致しない
    #[error("invalid expiry format: {0}")]
    InvalidExpiry(String),
}

/// Luhn チェック
///
/// 空白とハイフンは区切りとして無視する。それ以外の非数字、桁数が
/// 13〜19 の範囲外の入力は不正として false を返す。
pub fn luhn_valid(number: &str) -> bool {
    let mut digits: Vec<u32> = Vec::with_capacity(number.len());
    for ch in number.chars() {
        if ch == ' ' || ch == '-' {
            continue;
        }
        match ch.to_digit(10) {
            Some(d) => digits.push(d),
            None => return false,
        }
    }
    if digits.len() < CARD_NUMBER_MIN_DIGITS || digits.len() > CARD_NUMBER_MAX_DIGITS {
        return false;
    }
    let mut sum = 0u32;
    for (i, d) in digits.iter().rev().enumerate() {
        let mut d = *d;
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

/// カードの有効期限（月末まで有効）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardExpiry {
    pub month: u32,
    /// 4 桁の西暦年（2 桁入力は 2000 年代に正規化済み）
    pub year: i32,
}

impl CardExpiry {
    /// 期限月の末日を過ぎていたら true
    pub fn is_expired(&self, now_year: i32, now_month: u32) -> bool {
        (self.year, self.month) < (now_year, now_month)
    }

    /// epoch ミリ秒の現在時刻で判定する
    pub fn is_expired_at_ms(&self, now_ms: u64) -> bool {
        match Utc.timestamp_millis_opt(now_ms as i64).single() {
            Some(t) => self.is_expired(t.year(), t.month()),
            None => false,
        }
    }
}

/// "MM/YY" または "MM/YYYY" を解析する
pub fn parse_expiry(s: &str) -> Result<CardExpiry, CardError> {
    let re = match Regex::new(EXPIRY_PATTERN) {
        Ok(re) => re,
        Err(_) => return Err(CardError::InvalidExpiry(s.to_string())),
    };
    let caps = re
        .captures(s.trim())
        .ok_or_else(|| CardError::InvalidExpiry(s.to_string()))?;
    let month: u32 = caps[1]
        .parse()
        .map_err(|_| CardError::InvalidExpiry(s.to_string()))?;
    let year_str = &caps[2];
    let year: i32 = year_str
        .parse()
        .map_err(|_| CardError::InvalidExpiry(s.to_string()))?;
    let year = if year_str.len() == 2 { 2000 + year } else { year };
    Ok(CardExpiry { month, year })
}
