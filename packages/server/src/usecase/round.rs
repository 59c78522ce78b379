//! UseCase: ラウンド進行イベント（開始・ヒント・承認・回答・終了）

use crate::domain::{Phase, PlayerName, RoomName};

use super::{error::RouterError, router::EventRouter};

impl EventRouter {
    pub(super) async fn start(
        &self,
        room: RoomName,
        guesser: PlayerName,
    ) -> Result<(), RouterError> {
        let mut game = self.resolve_room(&room).await?;
        self.policy.enforce(
            "start",
            game.check_member(&guesser)
                .and_then(|_| game.check_phase(&[Phase::Lobby], "start")),
        )?;

        let notifications = game.start(guesser.clone(), &mut rand::thread_rng());
        self.registry.save(game).await;
        tracing::info!("Round started in room '{}' with guesser '{}'", room, guesser);

        for notification in &notifications {
            self.to_room(&room, notification).await;
        }
        Ok(())
    }

    pub(super) async fn end(&self, room: RoomName) -> Result<(), RouterError> {
        let mut game = self.resolve_room(&room).await?;
        let ended = game.end();
        self.registry.save(game).await;
        // 同名で作り直されたルームに古い接続の切断が及ばないよう切り離す
        let detached = self.sessions.remove_room(&room).await;
        tracing::info!(
            "Room '{}' ended, {} session(s) detached",
            room,
            detached.len()
        );

        self.to_room(&room, &ended).await;
        self.registry.garbage_collect().await;
        Ok(())
    }

    pub(super) async fn submit_clue(
        &self,
        room: RoomName,
        cluer: PlayerName,
        clue: String,
    ) -> Result<(), RouterError> {
        let mut game = self.resolve_room(&room).await?;
        self.policy.enforce(
            "submit_clue",
            game.check_member(&cluer).and_then(|_| {
                game.check_phase(&[Phase::Cluing, Phase::Revealing], "submit a clue")
            }),
        )?;

        let clue_state = game.submit_clue(cluer.clone(), clue, &mut rand::thread_rng())?;
        self.registry.save(game).await;
        tracing::debug!("'{}' submitted a clue in room '{}'", cluer, room);

        if let Some(clue_state) = clue_state {
            self.to_room(&room, &clue_state).await;
        }
        Ok(())
    }

    pub(super) async fn withdraw_clue(
        &self,
        room: RoomName,
        cluer: PlayerName,
    ) -> Result<(), RouterError> {
        let mut game = self.resolve_room(&room).await?;
        self.policy.enforce(
            "unsubmit_clue",
            game.check_member(&cluer).and_then(|_| {
                game.check_phase(&[Phase::Cluing, Phase::Revealing], "withdraw a clue")
            }),
        )?;

        let clue_state = game.withdraw_clue(&cluer, &mut rand::thread_rng());
        self.registry.save(game).await;
        tracing::debug!("'{}' withdrew their clue in room '{}'", cluer, room);

        if let Some(clue_state) = clue_state {
            self.to_room(&room, &clue_state).await;
        }
        Ok(())
    }

    pub(super) async fn approve_clues(
        &self,
        room: RoomName,
        clues: Vec<String>,
    ) -> Result<(), RouterError> {
        let mut game = self.resolve_room(&room).await?;
        self.policy.enforce(
            "clues_approved",
            game.check_phase(&[Phase::Revealing], "approve clues"),
        )?;

        let guessing = game.approve(clues);
        self.registry.save(game).await;
        tracing::info!("Clues approved in room '{}'", room);

        self.to_room(&room, &guessing).await;
        Ok(())
    }

    pub(super) async fn submit_guess(
        &self,
        room: RoomName,
        guess: String,
        guesser: PlayerName,
    ) -> Result<(), RouterError> {
        let game = self.resolve_room(&room).await?;
        self.policy.enforce(
            "submit_guess",
            game.check_phase(&[Phase::Guessing], "guess")
                .and_then(|_| game.check_guesser(&guesser)),
        )?;

        let resolved = game.resolve_guess(guess, guesser.clone());
        tracing::info!("'{}' submitted a guess in room '{}'", guesser, room);

        self.to_room(&room, &resolved).await;
        Ok(())
    }
}
