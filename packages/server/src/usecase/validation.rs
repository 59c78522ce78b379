//! UseCase: イベントルーターでの前提条件チェック

use crate::domain::GameError;

use super::error::RouterError;

/// Validation policy
///
/// 前提条件（メンバーであること、フェーズ、回答者本人であること）を満たさない
/// イベントの扱い。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// 警告を記録した上でそのまま適用する
    #[default]
    Permissive,
    /// イベントを拒否する。存在しないルームへのラウンドイベントも
    /// ルームを作らずに拒否する
    Strict,
}

impl ValidationPolicy {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Permissive }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }

    pub fn enforce(&self, event: &str, check: Result<(), GameError>) -> Result<(), RouterError> {
        match (self, check) {
            (_, Ok(())) => Ok(()),
            (Self::Permissive, Err(e)) => {
                tracing::warn!("Applying '{}' despite failed precondition: {}", event, e);
                Ok(())
            }
            (Self::Strict, Err(e)) => Err(RouterError::InvalidTransition(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlayerName;

    fn violation() -> Result<(), GameError> {
        Err(GameError::NotAMember(
            PlayerName::new("ghost".to_string()).unwrap(),
        ))
    }

    #[test]
    fn test_permissive_policy_lets_violations_through() {
        // テスト項目: Permissive では前提条件違反でも処理を続行する
        let policy = ValidationPolicy::Permissive;

        assert_eq!(policy.enforce("start", violation()), Ok(()));
    }

    #[test]
    fn test_strict_policy_rejects_violations() {
        // テスト項目: Strict では前提条件違反を型付きエラーとして返す
        let policy = ValidationPolicy::Strict;

        assert!(matches!(
            policy.enforce("start", violation()),
            Err(RouterError::InvalidTransition(GameError::NotAMember(_)))
        ));
        assert_eq!(policy.enforce("start", Ok(())), Ok(()));
    }

    #[test]
    fn test_from_strict_flag() {
        assert_eq!(ValidationPolicy::from_strict_flag(false), ValidationPolicy::Permissive);
        assert!(ValidationPolicy::from_strict_flag(true).is_strict());
    }
}
