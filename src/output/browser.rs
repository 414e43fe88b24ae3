//! Map page HTTP server

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeFile;

use crate::avatar::AvatarAssets;
use crate::config::Config;
use crate::output::sse;
use crate::AppState;

/// Map page server state
pub struct BrowserServer {
    app_state: Arc<AppState>,
    map_image: PathBuf,
    avatar_size: f32,
}

impl BrowserServer {
    /// Create a new browser server
    pub fn new(app_state: Arc<AppState>, config: &Config) -> Self {
        Self {
            app_state,
            map_image: config.map.image_path.clone(),
            avatar_size: config.avatars.size,
        }
    }

    /// Create the router for page endpoints
    pub fn router(self) -> Router {
        let map_image = self.map_image.clone();
        let shared_state = Arc::new(self);

        Router::new()
            .route("/", get(map_page))
            .route("/map", get(map_page))
            .route("/map/stream", get(map_stream))
            .route("/map/frame", get(map_frame))
            .route("/points.json", get(points_document))
            .route("/avatars/:index", get(avatar_image))
            .route_service("/map/image", ServeFile::new(map_image))
            .with_state(shared_state)
    }
}

/// Browser server state (shared)
type BrowserState = Arc<BrowserServer>;

/// Render the map page
async fn map_page(State(state): State<BrowserState>) -> Html<String> {
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Wanderers</title>
    <style>
        * {{
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }}
        body {{
            font-family: sans-serif;
            background: #1d2228;
        }}
        .map-container {{
            position: relative;
            width: 100%;
            overflow: hidden;
        }}
        .map {{
            display: block;
            width: 100%;
            height: auto;
        }}
        .avatar {{
            position: absolute;
            width: {size}px;
            height: {size}px;
            transform: translate(-50%, -50%);
            pointer-events: none;
        }}
        .popup {{
            position: absolute;
            background: #fffdf5;
            border: 1px solid #444;
            border-radius: 6px;
            padding: 8px 28px 8px 10px;
            font-size: 14px;
            box-shadow: 0 2px 8px rgba(0, 0, 0, 0.35);
        }}
        .popup-close {{
            position: absolute;
            top: 4px;
            right: 6px;
            border: none;
            background: none;
            font-size: 16px;
            cursor: pointer;
        }}
    </style>
</head>
<body>
    <div class="map-container" id="map-container">
        <img class="map" id="map" src="/map/image" alt="Map">
    </div>

    <script>
        const container = document.getElementById('map-container');
        const map = document.getElementById('map');
        const avatars = new Map();
        let popup = null;

        function post(url, body) {{
            return fetch(url, {{
                method: 'POST',
                headers: {{ 'Content-Type': 'application/json' }},
                body: JSON.stringify(body),
            }});
        }}

        function reportSize() {{
            if (map.offsetWidth > 0 && map.offsetHeight > 0) {{
                post('/api/map/resize', {{ width: map.offsetWidth, height: map.offsetHeight }});
            }}
        }}

        function renderFrame(frame) {{
            const seen = new Set();
            for (const a of frame.avatars) {{
                let el = avatars.get(a.id);
                if (!el) {{
                    el = document.createElement('img');
                    el.className = 'avatar';
                    el.id = a.id;
                    el.src = a.image;
                    container.appendChild(el);
                    avatars.set(a.id, el);
                }}
                el.style.left = a.x + 'px';
                el.style.top = a.y + 'px';
                seen.add(a.id);
            }}
            for (const [id, el] of avatars) {{
                if (!seen.has(id)) {{
                    el.remove();
                    avatars.delete(id);
                }}
            }}

            const p = frame.popup;
            if (!p) {{
                if (popup) {{ popup.remove(); popup = null; }}
                return;
            }}
            if (!popup || popup.dataset.id !== String(p.id)) {{
                if (popup) popup.remove();
                popup = document.createElement('div');
                popup.className = 'popup';
                popup.dataset.id = String(p.id);
                const text = document.createElement('span');
                text.textContent = p.text;
                const close = document.createElement('button');
                close.className = 'popup-close';
                close.textContent = '×';
                close.addEventListener('click', function(event) {{
                    event.stopPropagation();
                    fetch('/api/popup', {{ method: 'DELETE' }});
                }});
                popup.appendChild(text);
                popup.appendChild(close);
                container.appendChild(popup);
            }}
            popup.style.left = p.bounds.x + 'px';
            popup.style.top = p.bounds.y + 'px';
            popup.style.width = p.bounds.width + 'px';
            popup.style.height = p.bounds.height + 'px';
        }}

        container.addEventListener('click', function(event) {{
            const rect = map.getBoundingClientRect();
            post('/api/click', {{ x: event.clientX - rect.left, y: event.clientY - rect.top }});
        }});

        map.addEventListener('load', reportSize);
        window.addEventListener('resize', reportSize);
        reportSize();

        const evtSource = new EventSource('/map/stream');
        evtSource.addEventListener('frame', function(event) {{
            renderFrame(JSON.parse(event.data));
        }});

        evtSource.onerror = function(err) {{
            console.error('SSE error:', err);
            setTimeout(function() {{
                window.location.reload();
            }}, 5000);
        }};
    </script>
</body>
</html>"#,
        size = state.avatar_size,
    );

    Html(html)
}

/// SSE endpoint for rendered frames
async fn map_stream(State(state): State<BrowserState>) -> impl IntoResponse {
    sse::create_frame_stream(Arc::clone(&state.app_state))
}

/// Latest frame as JSON
async fn map_frame(State(state): State<BrowserState>) -> impl IntoResponse {
    Json(state.app_state.current_frame().await)
}

/// The loaded points document
async fn points_document(State(state): State<BrowserState>) -> Response {
    match state.app_state.points().await {
        Some(points) => Json(points).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Image for one avatar
async fn avatar_image(State(state): State<BrowserState>, Path(index): Path<usize>) -> Response {
    let assets = &state.app_state.assets;
    match assets.get_data(index).await {
        Ok(data) => {
            let mime = AvatarAssets::mime_type(&assets.path(index));

            (StatusCode::OK, [(header::CONTENT_TYPE, mime)], data).into_response()
        }
        Err(e) => {
            tracing::debug!("Avatar image {} unavailable: {}", index, e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
