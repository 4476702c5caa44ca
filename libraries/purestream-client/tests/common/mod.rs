//! JSON fixtures shaped like the server's responses

#![allow(dead_code)]

use purestream_client::{ClientConfig, PureStreamClient};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

pub fn user_json(id: &str, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@test.local"),
        "followers": 0,
        "following": 0,
        "favoriteGenres": ["Jazz"],
        "isOnline": true,
        "lastSeen": "2024-01-01T00:00:00Z",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}

pub fn song_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "artist": "Miles Davis",
        "album": "Kind of Blue",
        "genre": "Jazz",
        "duration": 337.0,
        "filePath": format!("uploads/songs/audio-{id}.mp3"),
        "playCount": 3,
        "likes": 1,
        "isPublic": true,
        "tags": ["modal"],
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}

pub fn playlist_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "owner": { "id": "u1", "username": "ada" },
        "songs": [],
        "isPublic": true,
        "isCollaborative": false,
        "collaborators": [],
        "followers": 0,
        "tags": [],
        "totalDuration": 0.0,
        "playCount": 0,
        "songCount": 0,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}

pub fn pagination_json(page: u32, limit: u32, total: i64) -> Value {
    let pages = (total + i64::from(limit) - 1) / i64::from(limit);
    json!({ "page": page, "limit": limit, "total": total, "pages": pages })
}

/// Client pointed at `server` holding [`TOKEN`]
pub fn client_for(server: &MockServer) -> PureStreamClient {
    PureStreamClient::new(ClientConfig::with_token(server.uri(), TOKEN)).unwrap()
}

/// Client pointed at `server` without a token
pub fn anonymous_client(server: &MockServer) -> PureStreamClient {
    PureStreamClient::new(ClientConfig::new(server.uri())).unwrap()
}
