//! UseCase: ルーム参照（HTTP API 用、読み取り専用）

use std::sync::Arc;

use crate::domain::{Game, RoomName, RoomRepository};

use super::error::RoomQueryError;

/// ルーム参照のユースケース
pub struct RoomQueryUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl RoomQueryUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 全てのルームを名前順に取得
    pub async fn list_rooms(&self) -> Vec<Game> {
        self.repository.list().await
    }

    /// ルーム名（大文字小文字を区別）でルームを取得
    pub async fn get_room(&self, name: &str) -> Result<Game, RoomQueryError> {
        let name = RoomName::new(name.to_string()).map_err(|_| RoomQueryError::RoomNotFound)?;
        self.repository
            .find(&name)
            .await
            .ok_or(RoomQueryError::RoomNotFound)
    }

    /// 表記違いでアクセスされた場合の正規のルーム名
    pub async fn canonical_redirect(&self, requested: &str) -> Option<RoomName> {
        self.repository.find_case_variant(requested).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::Timestamp, infrastructure::repository::InMemoryRoomRepository};

    async fn create_usecase_with_room(name: &str) -> RoomQueryUseCase {
        let repository = Arc::new(InMemoryRoomRepository::new());
        repository
            .save(Game::new(
                RoomName::new(name.to_string()).unwrap(),
                "word".to_string(),
                Timestamp::new(0),
            ))
            .await;
        RoomQueryUseCase::new(repository)
    }

    #[tokio::test]
    async fn test_get_room() {
        // テスト項目: 存在するルームは取得でき、存在しないルームはエラーになる
        let usecase = create_usecase_with_room("Foo").await;

        assert!(usecase.get_room("Foo").await.is_ok());
        assert_eq!(
            usecase.get_room("foo").await.err(),
            Some(RoomQueryError::RoomNotFound)
        );
        assert_eq!(
            usecase.get_room("").await.err(),
            Some(RoomQueryError::RoomNotFound)
        );
    }

    #[tokio::test]
    async fn test_canonical_redirect() {
        // テスト項目: 表記違いのアクセスには正規のルーム名が返される
        let usecase = create_usecase_with_room("Foo").await;

        assert_eq!(
            usecase.canonical_redirect("FOO").await,
            Some(RoomName::new("Foo".to_string()).unwrap())
        );
        assert_eq!(usecase.canonical_redirect("Foo").await, None);
        assert_eq!(usecase.list_rooms().await.len(), 1);
    }
}
