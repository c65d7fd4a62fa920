use diesel::SqliteConnection;
use tower_sessions::Session;
use crate::data::models::{ApiError, LoginError, Mission};
use crate::data::repositories::MissionRepository;

const USER_ID_KEY: &str = "user_id";
const USER_EMAIL_KEY: &str = "user_email";
const ACTIVE_MISSION_KEY: &str = "active_mission_id";

pub async fn set_user_session(
    session: &Session,
    user_id: i32,
    email: &str,
) -> Result<(), LoginError> {
    // New id on login so a pre-login cookie cannot be reused
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user_id).await?;
    session.insert(USER_EMAIL_KEY, email).await?;
    Ok(())
}

pub async fn is_logged_in(session: &Session) -> bool {
    get_current_user_id(session).await.is_some()
}

pub async fn get_current_user_id(session: &Session) -> Option<i32> {
    match session.get::<i32>(USER_ID_KEY).await {
        Ok(user_id) => user_id,
        Err(e) => {
            log::error!("Failed to get user_id from session: {}", e);
            None
        }
    }
}

pub async fn get_current_user_email(session: &Session) -> Option<String> {
    session.get::<String>(USER_EMAIL_KEY).await.unwrap_or(None)
}

/// Per-request view of who is calling and which mission they are working on.
///
/// Built from the cookie session at the top of each handler and passed down
/// explicitly, so nothing below the handler reads session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyContext {
    pub user_id: i32,
    pub mission_id: Option<i32>,
}

impl StudyContext {
    pub async fn from_session(session: &Session) -> Result<Self, ApiError> {
        let user_id = get_current_user_id(session)
            .await
            .ok_or(ApiError::NotLoggedIn)?;
        let mission_id = session
            .get::<i32>(ACTIVE_MISSION_KEY)
            .await
            .map_err(|e| ApiError::SessionError(e.to_string()))?;

        Ok(Self { user_id, mission_id })
    }

    pub fn require_mission(&self) -> Result<i32, ApiError> {
        self.mission_id.ok_or(ApiError::NoActiveMission)
    }

    /// Loads the selected mission, checking it still exists and is owned by
    /// the caller. A stale selection is removed from the session.
    pub async fn active_mission(
        &self,
        session: &Session,
        conn: &mut SqliteConnection,
    ) -> Result<Mission, ApiError> {
        let mission_id = self.require_mission()?;

        match MissionRepository::find_owned(conn, self.user_id, mission_id)? {
            Some(mission) => Ok(mission),
            None => {
                log::warn!(
                    "Active mission {} of user {} no longer exists, clearing it",
                    mission_id,
                    self.user_id
                );
                clear_active_mission(session).await?;
                Err(ApiError::NoActiveMission)
            }
        }
    }
}

pub async fn set_active_mission(session: &Session, mission_id: i32) -> Result<(), ApiError> {
    session
        .insert(ACTIVE_MISSION_KEY, mission_id)
        .await
        .map_err(|e| ApiError::SessionError(e.to_string()))
}

pub async fn clear_active_mission(session: &Session) -> Result<(), ApiError> {
    session
        .remove::<i32>(ACTIVE_MISSION_KEY)
        .await
        .map(|_| ())
        .map_err(|e| ApiError::SessionError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_mission_fails_without_selection() {
        let ctx = StudyContext { user_id: 1, mission_id: None };
        assert!(matches!(ctx.require_mission(), Err(ApiError::NoActiveMission)));

        let ctx = StudyContext { user_id: 1, mission_id: Some(7) };
        assert_eq!(ctx.require_mission().unwrap(), 7);
    }
}
