//! REST API endpoints

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::scene::{AvatarView, Command, PopupView};
use crate::AppState;

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }

    pub fn error(message: impl ToString) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            error: Some(message.to_string()),
        })
    }

    /// Wrap a result, reporting the error message on failure
    pub fn from_result<E: ToString>(result: Result<T, E>) -> Json<Self> {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::error(e),
        }
    }
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub frame: u64,
    pub avatars: usize,
    pub points_loaded: bool,
    pub popup_open: bool,
}

/// Get current status
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let frame = state.current_frame().await;
    let points_loaded = state.points().await.is_some();

    ApiResponse::success(StatusResponse {
        version: crate::VERSION.to_string(),
        frame: frame.seq,
        avatars: frame.avatars.len(),
        points_loaded,
        popup_open: frame.popup.is_some(),
    })
}

/// Get current configuration
pub async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.config.read().await;
    Json(config.clone())
}

/// List avatars as of the latest frame
pub async fn list_avatars(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let frame = state.current_frame().await;
    ApiResponse::<Vec<AvatarView>>::success(frame.avatars)
}

/// Avatar count change request
#[derive(Debug, Deserialize)]
pub struct SetAvatarCountRequest {
    pub count: usize,
}

/// Recreate the avatars with a new count
pub async fn set_avatar_count(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetAvatarCountRequest>,
) -> impl IntoResponse {
    let result = state
        .request(|reply| Command::SetAvatarCount {
            count: request.count,
            reply,
        })
        .await
        .and_then(|r| r);

    if result.is_ok() {
        state.config.write().await.avatars.count = request.count;
        state.assets.scan(request.count).await;
    }

    ApiResponse::from_result(result)
}

/// Open the popup for an avatar
pub async fn activate_avatar(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> impl IntoResponse {
    let result = state
        .request(|reply| Command::Activate { index, reply })
        .await
        .and_then(|r| r);

    ApiResponse::<PopupView>::from_result(result)
}

/// Get the open popup, if any
pub async fn get_popup(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let frame = state.current_frame().await;
    ApiResponse::<Option<PopupView>>::success(frame.popup)
}

/// Close the popup
pub async fn close_popup(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let result = state
        .request(|reply| Command::ClosePopup { reply })
        .await;

    ApiResponse::from_result(result.map(|closed| serde_json::json!({ "closed": closed })))
}

/// Click position in map pixels
#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub x: f32,
    pub y: f32,
}

/// Route a click on the map
pub async fn click(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ClickRequest>,
) -> impl IntoResponse {
    let point = Vec2::new(request.x, request.y);
    let result = state
        .request(|reply| Command::Click { point, reply })
        .await;

    ApiResponse::from_result(result)
}

/// New map element dimensions
#[derive(Debug, Deserialize)]
pub struct ResizeRequest {
    pub width: f32,
    pub height: f32,
}

/// Rescale avatars to a new map size
pub async fn resize_map(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResizeRequest>,
) -> impl IntoResponse {
    let size = Vec2::new(request.width, request.height);
    let result = state
        .request(|reply| Command::Resize { size, reply })
        .await
        .and_then(|r| r);

    ApiResponse::from_result(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;

    #[test]
    fn test_response_wrapper() {
        let ok = ApiResponse::from_result::<SceneError>(Ok(3usize));
        let json = serde_json::to_value(&ok.0).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 3);
        assert!(json.get("error").is_none());

        let err = ApiResponse::<usize>::from_result(Err(SceneError::UnknownAvatar(9)));
        let json = serde_json::to_value(&err.0).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Unknown avatar: 9");
        assert!(json.get("data").is_none());
    }
}
