use url::Url;

/// Number of content words used in a synthesized title
const PLACEHOLDER_WORDS: usize = 8;

/// Title and body text extracted from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub content: String,
}

impl Article {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Makes the article storable, or returns `None` if it never can be
    ///
    /// Blank content is rejected. A blank title is replaced with one built
    /// from the source host and the first words of the content, so the
    /// article still gets a stable file name.
    pub fn into_storable(self, source_url: &Url) -> Option<Self> {
        if self.content.trim().is_empty() {
            return None;
        }

        if !self.title.trim().is_empty() {
            return Some(self);
        }

        let preview: Vec<&str> = self
            .content
            .split_whitespace()
            .take(PLACEHOLDER_WORDS)
            .collect();
        let host = source_url.host_str().unwrap_or("untitled");
        let title = format!("{} {}", host, preview.join(" "));

        Some(Self {
            title,
            content: self.content,
        })
    }
}
