//! Value Object 定義
//!
//! ルーム名・プレイヤー名・接続 ID など、検証済みの値を表す型。

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// ルーム名・プレイヤー名の最大文字数
pub const MAX_NAME_LENGTH: usize = 64;

fn validate_name(value: &str) -> Result<(), ValueObjectError> {
    if value.trim().is_empty() {
        return Err(ValueObjectError::Empty);
    }
    let length = value.chars().count();
    if length > MAX_NAME_LENGTH {
        return Err(ValueObjectError::TooLong {
            max: MAX_NAME_LENGTH,
            actual: length,
        });
    }
    Ok(())
}

/// ルーム名（大文字小文字を区別する正規名）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_name(&value)?;
        if value.contains('/') {
            return Err(ValueObjectError::InvalidCharacter('/'));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// 大文字小文字を無視すると同じだが、表記が異なる名前か
    pub fn is_case_variant_of(&self, other: &str) -> bool {
        self.0 != other && self.0.to_lowercase() == other.to_lowercase()
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// プレイヤーの表示名（ルーム内で一意）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_name(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// WebSocket 接続 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// ランダムな接続 ID を生成（UUID v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
