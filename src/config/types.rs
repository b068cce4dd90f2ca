use serde::Deserialize;

/// Main configuration structure for Meer-Weer
///
/// Every section is optional in the TOML file; missing sections and keys fall
/// back to the built-in defaults for the Frank Deboosere site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub notes: NotesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Addresses on the scraped site
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site root; relative audio paths are appended to it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Page carrying the daily broadcast player
    #[serde(rename = "page-url")]
    pub page_url: String,

    /// Page embedding the special broadcasts
    #[serde(rename = "special-page-url")]
    pub special_page_url: String,

    /// Cover image used for the channel and every item
    #[serde(rename = "image-url")]
    pub image_url: String,

    /// Path of the cache-busted daily audio file, the token is appended
    #[serde(rename = "dynamic-audio-path")]
    pub dynamic_audio_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.frankdeboosere.be".to_string(),
            page_url: "https://www.frankdeboosere.be/home.php".to_string(),
            special_page_url: "https://www.frankdeboosere.be/specials.php".to_string(),
            image_url: "https://www.frankdeboosere.be/images/emoji.png".to_string(),
            dynamic_audio_path: "/alert/Alert.mp3?cachekill=".to_string(),
        }
    }
}

/// Request headers and timeouts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    pub accept: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/111.0.0.0 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .to_string(),
            timeout_secs: 30,
        }
    }
}

/// Channel metadata of the rendered feed
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub title: String,

    pub description: String,

    /// What each item's `<link>` points at
    #[serde(rename = "item-link")]
    pub item_link: ItemLink,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: "Meer Weer Podcast met Frank Deboosere".to_string(),
            description: "Dagelijkse weer-update met Frank Deboosere".to_string(),
            item_link: ItemLink::Site,
        }
    }
}

/// Target of the per-item `<link>` element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemLink {
    /// The site base URL, identical for every item
    #[default]
    Site,

    /// The episode's own audio URL
    Episode,
}

/// Optional parts of the pipeline
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Attach temperature readings and remarks to the daily episode
    #[serde(rename = "include-notes")]
    pub include_notes: bool,

    /// Scrape the special broadcasts page
    #[serde(rename = "include-special-episodes")]
    pub include_special_episodes: bool,

    /// Emit `<itunes:image>` on the channel and on every item
    #[serde(rename = "include-itunes-image")]
    pub include_itunes_image: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            include_notes: true,
            include_special_episodes: true,
            include_itunes_image: true,
        }
    }
}

/// Where the notes text lives in the page markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Substring of the `href` identifying the notes anchor
    #[serde(rename = "anchor-fragment")]
    pub anchor_fragment: String,

    /// Tag name of the elements holding the paired readings
    #[serde(rename = "value-tag")]
    pub value_tag: String,

    /// Joins the two readings
    pub separator: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            anchor_fragment: "temperaturen".to_string(),
            value_tag: "span".to_string(),
            separator: " / ".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path of the RSS document, overwritten on every run
    #[serde(rename = "feed-path")]
    pub feed_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "episodes.db".to_string(),
            feed_path: "podcast.xml".to_string(),
        }
    }
}
