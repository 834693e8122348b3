use keyfall_ports::storage::StoragePort;
use std::path::Path;

pub const DEFAULT_RECENTS_LIMIT: usize = 10;

/// Most-recently-opened files, newest first, without duplicates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentFiles {
    paths: Vec<String>,
    limit: usize,
}

impl RecentFiles {
    pub fn new(limit: usize) -> Self {
        Self {
            paths: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn from_paths(paths: Vec<String>, limit: usize) -> Self {
        let mut recents = Self::new(limit);
        for path in paths {
            if !recents.paths.contains(&path) {
                recents.paths.push(path);
            }
        }
        recents.paths.truncate(recents.limit);
        recents
    }

    /// Reads the stored list. Unreadable or corrupt storage is an empty list.
    pub fn load(storage: &dyn StoragePort, limit: usize) -> Self {
        match storage.load_recents() {
            Ok(paths) => Self::from_paths(paths, limit),
            Err(err) => {
                log::warn!("ignoring unreadable recent files: {err}");
                Self::new(limit)
            }
        }
    }

    pub fn touch(&mut self, path: &str) {
        self.paths.retain(|p| p != path);
        self.paths.insert(0, path.to_string());
        self.paths.truncate(self.limit);
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Default for RecentFiles {
    fn default() -> Self {
        Self::new(DEFAULT_RECENTS_LIMIT)
    }
}

/// File name shown in the menu for a stored path.
pub fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_moves_existing_entry_to_front() {
        let mut recents = RecentFiles::from_paths(vec!["a".into(), "b".into(), "c".into()], 10);
        recents.touch("c");
        assert_eq!(recents.paths(), &["c", "a", "b"]);
        recents.touch("d");
        assert_eq!(recents.paths(), &["d", "c", "a", "b"]);
    }

    #[test]
    fn list_is_capped() {
        let mut recents = RecentFiles::new(10);
        for i in 0..15 {
            recents.touch(&format!("song-{i}.mid"));
        }
        assert_eq!(recents.len(), 10);
        assert_eq!(recents.paths()[0], "song-14.mid");
        assert_eq!(recents.paths()[9], "song-5.mid");
    }

    #[test]
    fn stored_duplicates_are_collapsed() {
        let recents =
            RecentFiles::from_paths(vec!["a".into(), "b".into(), "a".into(), "c".into()], 10);
        assert_eq!(recents.paths(), &["a", "b", "c"]);
    }

    #[test]
    fn stored_lists_only_enter_through_the_cap() {
        let stored: Vec<String> = (0..14).map(|i| format!("song{}.mid", i % 12)).collect();
        let recents = RecentFiles::from_paths(stored, DEFAULT_RECENTS_LIMIT);
        assert_eq!(recents.len(), DEFAULT_RECENTS_LIMIT);
        assert_eq!(recents.paths()[0], "song0.mid");
        assert_eq!(recents.paths()[9], "song9.mid");
    }

    #[test]
    fn display_name_is_the_file_name() {
        assert_eq!(display_name("/music/etude.mid"), "etude.mid");
        assert_eq!(display_name("etude.mid"), "etude.mid");
    }
}
