use serde::{Deserialize, Serialize};


/// A command for the host application, returned when a result item is activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Action {
    /// Open a URL in the default browser.
    OpenUrl(String),

    /// Run the script or executable at this path.
    RunScript(String),

    /// Replace the text of the active query.
    SetUserQuery(String),

    CopyToClipboard(String),
}
