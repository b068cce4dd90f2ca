//! RSS 2.0 feed rendering
//!
//! The feed is a pure projection of the store: every run rebuilds the whole
//! document from the episode list and replaces the file.

use crate::config::{Config, ItemLink};
use crate::episode::{human_date_from_pub_date, Episode};
use crate::output::{OutputError, OutputResult};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs;
use std::io::{Cursor, Write as _};
use std::path::Path;

/// Namespace of the iTunes podcast extension
pub const ITUNES_NAMESPACE: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";

/// MIME type announced in every enclosure
pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Renders the complete feed document
///
/// # Arguments
///
/// * `episodes` - Episodes in the order they should appear
/// * `config` - Channel metadata, site addresses and feature flags
///
/// # Returns
///
/// The XML document, starting with its declaration
pub fn render_feed(episodes: &[Episode], config: &Config) -> OutputResult<String> {
    let site = &config.site;
    let feed = &config.feed;
    let itunes_image = config.features.include_itunes_image;

    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:itunes", ITUNES_NAMESPACE));
    write(&mut writer, Event::Start(rss))?;
    write(&mut writer, Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &feed.title)?;
    write_text_element(&mut writer, "link", &site.base_url)?;
    write_text_element(&mut writer, "description", &feed.description)?;

    write(&mut writer, Event::Start(BytesStart::new("image")))?;
    write_text_element(&mut writer, "url", &site.image_url)?;
    write_text_element(&mut writer, "title", &feed.title)?;
    write_text_element(&mut writer, "link", &site.base_url)?;
    write(&mut writer, Event::End(BytesEnd::new("image")))?;

    if itunes_image {
        write_itunes_image(&mut writer, &site.image_url)?;
    }

    for episode in episodes {
        let link = match feed.item_link {
            ItemLink::Site => site.base_url.as_str(),
            ItemLink::Episode => episode.url.as_str(),
        };

        write(&mut writer, Event::Start(BytesStart::new("item")))?;
        write_text_element(&mut writer, "title", &episode.title)?;
        write_text_element(&mut writer, "link", link)?;
        write_text_element(&mut writer, "guid", &episode.url)?;
        write_text_element(&mut writer, "pubDate", &episode.pub_date)?;
        write_text_element(&mut writer, "description", &item_description(episode))?;

        let mut enclosure = BytesStart::new("enclosure");
        enclosure.push_attribute(("url", episode.url.as_str()));
        enclosure.push_attribute(("type", AUDIO_MIME_TYPE));
        write(&mut writer, Event::Empty(enclosure))?;

        if itunes_image {
            write_itunes_image(&mut writer, &site.image_url)?;
        }
        write(&mut writer, Event::End(BytesEnd::new("item")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("channel")))?;
    write(&mut writer, Event::End(BytesEnd::new("rss")))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| OutputError::Format(e.to_string()))
}

/// `Aflevering uitgezonden op 3 Juli 2023`, then the notes after a blank line
pub fn item_description(episode: &Episode) -> String {
    let mut description = format!(
        "Aflevering uitgezonden op {}",
        human_date_from_pub_date(&episode.pub_date)
    );
    if let Some(notes) = episode.notes_text() {
        description.push_str("\n\n");
        description.push_str(notes);
    }
    description
}

/// Replaces the file at `path` with `xml`
///
/// The document is written to a sibling temporary file first and renamed
/// over the target, so readers never see a half-written feed.
pub fn write_feed(path: &Path, xml: &str) -> OutputResult<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| OutputError::Write(format!("not a file path: {}", path.display())))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(xml.as_bytes())?;
    file.sync_all()?;
    drop(file);

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}

fn write(writer: &mut XmlWriter, event: Event<'_>) -> OutputResult<()> {
    writer
        .write_event(event)
        .map_err(|e| OutputError::Format(e.to_string()))
}

fn write_text_element(writer: &mut XmlWriter, name: &str, text: &str) -> OutputResult<()> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write_itunes_image(writer: &mut XmlWriter, href: &str) -> OutputResult<()> {
    let mut image = BytesStart::new("itunes:image");
    image.push_attribute(("href", href));
    write(writer, Event::Empty(image))
}
