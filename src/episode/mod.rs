//! Episode model and the date conventions of the broadcast
//!
//! An episode is identified by its audio URL. Publication dates are kept as
//! the formatted RFC-822-like string that ends up verbatim in the feed.

pub mod dates;

pub use dates::{
    broadcast_now, daily_title, format_pub_date, human_date, human_date_from_pub_date,
    parse_special_title, SpecialTitle, DUTCH_MONTHS, PUB_DATE_FORMAT,
};

/// A stored episode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub pub_date: String,
    pub notes: Option<String>,
}

/// An episode discovered by a scrape, not yet stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEpisode {
    pub url: String,
    pub title: String,
    pub pub_date: String,
    pub notes: Option<String>,
}

impl NewEpisode {
    pub fn new(url: impl Into<String>, title: impl Into<String>, pub_date: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            pub_date: pub_date.into(),
            notes: None,
        }
    }

    /// Attaches notes, dropping them when blank
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        };
        self
    }
}

impl Episode {
    /// Notes text if present and not blank
    pub fn notes_text(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_notes_are_dropped() {
        let episode = NewEpisode::new("https://a/x.mp3", "t", "d").with_notes("  \n ");
        assert_eq!(episode.notes, None);

        let episode = NewEpisode::new("https://a/x.mp3", "t", "d").with_notes("12° / 15°");
        assert_eq!(episode.notes.as_deref(), Some("12° / 15°"));
    }

    #[test]
    fn test_notes_text_trims() {
        let episode = Episode {
            id: 1,
            url: "https://a/x.mp3".to_string(),
            title: "t".to_string(),
            pub_date: "d".to_string(),
            notes: Some("  droog weer ".to_string()),
        };
        assert_eq!(episode.notes_text(), Some("droog weer"));
    }
}
