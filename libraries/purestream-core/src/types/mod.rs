mod ids;
mod playlist;
mod song;
mod stats;
mod user;

pub use ids::{PlaylistId, SongId, UserId};
pub use playlist::{
    parse_tags, NewPlaylist, Playlist, PlaylistSong, UpdatePlaylist, MAX_PLAYLIST_DESCRIPTION_LEN,
    MAX_PLAYLIST_NAME_LEN,
};
pub use song::{NewSong, Song, DEFAULT_SONG_DURATION, UNKNOWN_ALBUM};
pub use stats::{Pagination, Stats};
pub use user::{NewUser, UpdateProfile, User, UserSummary};
