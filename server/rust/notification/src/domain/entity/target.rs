use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// TargetKind は通知の配信対象を絞り込む軸を表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// 所属店舗の完全一致
    Store,
    /// 職種の部分一致（大文字小文字を区別しない）
    Occupation,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Store => "store",
            TargetKind::Occupation => "occupation",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid target type: {0}")]
pub struct UnknownTargetKind(pub String);

impl FromStr for TargetKind {
    type Err = UnknownTargetKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "store" => Ok(TargetKind::Store),
            "occupation" => Ok(TargetKind::Occupation),
            other => Err(UnknownTargetKind(other.to_string())),
        }
    }
}

/// TargetSpecification は 1 回の配信で対象とする会員の集合を指定する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpecification {
    pub kind: TargetKind,
    pub value: String,
}

impl TargetSpecification {
    pub fn new(kind: TargetKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
