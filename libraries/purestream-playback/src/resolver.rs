//! Audio location resolution
//!
//! Songs carry their audio location in one of three fields depending on
//! where the record came from. This is the only place that knows the
//! priority order.

use purestream_core::Song;

const UPLOADS_PREFIX: &str = "uploads/";

/// Resolve a playable location for `song`
///
/// Takes the first non-empty of `file_path`, `audio_url` and `url`, in that
/// order. Backslashes become forward slashes, and server-relative `uploads/`
/// paths are joined onto `media_base`. Returns `None` when all three fields
/// are empty.
pub fn resolve_audio_location(song: &Song, media_base: &str) -> Option<String> {
    let raw = [&song.file_path, &song.audio_url, &song.url]
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())?;

    let normalized = raw.replace('\\', "/");

    if normalized.starts_with(UPLOADS_PREFIX) {
        Some(format!("{}/{}", media_base.trim_end_matches('/'), normalized))
    } else {
        Some(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use purestream_core::SongId;

    const BASE: &str = "http://localhost:3000";

    fn song() -> Song {
        Song::new(SongId::new("s1"), "Title", "Artist")
    }

    #[test]
    fn test_no_location() {
        assert_eq!(resolve_audio_location(&song(), BASE), None);

        let mut blank = song();
        blank.file_path = Some(String::new());
        blank.url = Some("   ".to_string());
        assert_eq!(resolve_audio_location(&blank, BASE), None);
    }

    #[test]
    fn test_priority_order() {
        let mut s = song();
        s.url = Some("https://c/url.mp3".to_string());
        assert_eq!(
            resolve_audio_location(&s, BASE).as_deref(),
            Some("https://c/url.mp3")
        );

        s.audio_url = Some("https://c/audio.mp3".to_string());
        assert_eq!(
            resolve_audio_location(&s, BASE).as_deref(),
            Some("https://c/audio.mp3")
        );

        s.file_path = Some("uploads/songs/a.mp3".to_string());
        assert_eq!(
            resolve_audio_location(&s, BASE).as_deref(),
            Some("http://localhost:3000/uploads/songs/a.mp3")
        );
    }

    #[test]
    fn test_empty_file_path_falls_through() {
        let mut s = song();
        s.file_path = Some(String::new());
        s.audio_url = Some("https://c/audio.mp3".to_string());
        assert_eq!(
            resolve_audio_location(&s, BASE).as_deref(),
            Some("https://c/audio.mp3")
        );
    }

    #[test]
    fn test_backslashes_normalized() {
        let s = song().with_file_path("uploads\\songs\\a.mp3");
        assert_eq!(
            resolve_audio_location(&s, "http://host:3000/").as_deref(),
            Some("http://host:3000/uploads/songs/a.mp3")
        );
    }

    #[test]
    fn test_absolute_url_untouched() {
        let s = song().with_file_path("https://cdn.example.com/uploads/x.mp3");
        assert_eq!(
            resolve_audio_location(&s, BASE).as_deref(),
            Some("https://cdn.example.com/uploads/x.mp3")
        );
    }
}
