use std::fmt;


/// The text typed into the launcher.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    text: String,
}

impl Query {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The first space-separated word.
    pub fn keyword(&self) -> &str {
        self.text
            .split_once(' ')
            .map_or(self.text.as_str(), |(keyword, _)| keyword)
    }

    /// Everything after the first space, or `None` if that is empty.
    pub fn argument(&self) -> Option<&str> {
        self.text
            .split_once(' ')
            .map(|(_, argument)| argument)
            .filter(|argument| !argument.is_empty())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
