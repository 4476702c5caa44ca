//! Wrap-around queue navigation
//!
//! The queue itself is a plain `Vec<Song>` inside
//! [`PlaybackState`](crate::PlaybackState); these helpers compute where
//! forward and backward steps land. `None` stands for "no active entry".

/// Index after `current` in a queue of `len` songs
///
/// Wraps from the last entry to the first. With no active entry the first
/// song is next. Returns `None` for an empty queue.
pub fn next_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(i) => (i + 1) % len,
        None => 0,
    })
}

/// Index before `current` in a queue of `len` songs
///
/// From the first entry, or with no active entry, wraps to the last song.
/// Returns `None` for an empty queue.
pub fn previous_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(i) if i > 0 => (i - 1).min(len - 1),
        _ => len - 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_wraps() {
        assert_eq!(next_index(Some(0), 3), Some(1));
        assert_eq!(next_index(Some(2), 3), Some(0));
        assert_eq!(next_index(None, 3), Some(0));
        assert_eq!(next_index(None, 0), None);
    }

    #[test]
    fn test_previous_wraps() {
        assert_eq!(previous_index(Some(2), 3), Some(1));
        assert_eq!(previous_index(Some(0), 3), Some(2));
        assert_eq!(previous_index(None, 3), Some(2));
        assert_eq!(previous_index(Some(1), 0), None);
    }

    #[test]
    fn test_single_entry_queue() {
        assert_eq!(next_index(Some(0), 1), Some(0));
        assert_eq!(previous_index(Some(0), 1), Some(0));
    }
}
