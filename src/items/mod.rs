//! Search result items and the collaborators they talk to.
//!
//! Items describe themselves to a launcher UI and produce an [`Action`] when
//! activated. The configuration engine never constructs or interprets actions,
//! it only backs the items that need persistent settings (see [`ShortcutResult`]
//! and [`QueryHistoryConf`]).

pub use self::action::Action;
pub use self::clipboard::CopyPathToClipboardItem;
pub use self::history::{QueryHistory, QueryHistoryConf};
pub use self::query::Query;
pub use self::shortcut::{ShortcutRecord, ShortcutResult};

mod action;
mod clipboard;
mod history;
mod query;
mod shortcut;


/// A selectable search result.
pub trait ResultItem {
    /// The keyword that activates this item, empty if the item has none.
    fn keyword(&self) -> String {
        String::new()
    }

    fn name(&self) -> String;

    fn description(&self, _query: &Query) -> String {
        String::new()
    }

    /// Icon name or path, if the item has one.
    fn icon(&self) -> Option<String>;

    /// Activate the item. Items may record the activation in `history`.
    fn on_enter(&self, query: &Query, history: &mut dyn QueryHistory) -> crate::Result<Action>;
}
