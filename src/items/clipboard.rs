use std::path::{Path, PathBuf};

use super::{Action, Query, QueryHistory, ResultItem};
use crate::{conf::normalize_lexically, Result};


/// Alternative menu entry of a file browser result that copies the file's absolute path.
#[derive(Debug, Clone)]
pub struct CopyPathToClipboardItem {
    path: PathBuf,
}

impl CopyPathToClipboardItem {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ResultItem for CopyPathToClipboardItem {
    fn name(&self) -> String {
        "Copy Path to Clipboard".to_string()
    }

    fn icon(&self) -> Option<String> {
        Some("edit-copy".to_string())
    }

    fn on_enter(&self, _query: &Query, _history: &mut dyn QueryHistory) -> Result<Action> {
        // Symbolic links are kept as they are; only `.` and `..` are resolved.
        let absolute_path = if self.path.is_absolute() {
            normalize_lexically(&self.path)
        } else {
            match std::env::current_dir() {
                Ok(current_directory) => normalize_lexically(&current_directory.join(&self.path)),
                Err(_) => self.path.clone(),
            }
        };

        Ok(Action::CopyToClipboard(
            absolute_path.to_string_lossy().into_owned(),
        ))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::QueryHistoryConf;
    use crate::JsonConf;

    #[test]
    fn copies_the_absolute_path() {
        let directory = tempfile::tempdir().unwrap();
        let file = directory.path().join("notes.txt");

        let item = CopyPathToClipboardItem::new(directory.path().join("./sub/../notes.txt"));
        let mut history = JsonConf::<QueryHistoryConf>::new().unwrap();

        let action = item.on_enter(&Query::new(""), &mut history).unwrap();

        assert_eq!(
            action,
            Action::CopyToClipboard(file.to_string_lossy().into_owned())
        );
        assert_eq!(item.name(), "Copy Path to Clipboard");
        assert_eq!(item.icon().as_deref(), Some("edit-copy"));
    }

    #[test]
    fn relative_path_is_made_absolute_without_touching_the_file_system() {
        let item = CopyPathToClipboardItem::new("missing-directory/notes.txt");
        let mut history = JsonConf::<QueryHistoryConf>::new().unwrap();

        let Action::CopyToClipboard(copied) =
            item.on_enter(&Query::new(""), &mut history).unwrap()
        else {
            panic!("expected a clipboard action");
        };

        let copied = PathBuf::from(copied);
        assert!(copied.is_absolute());
        assert!(copied.ends_with("missing-directory/notes.txt"));
    }
}
