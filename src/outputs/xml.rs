//! Sitemap XML serialization and parsing.
//!
//! The serializer emits the fixed document shape the sitemap protocol
//! expects: an XML declaration, a `<urlset>` root carrying the protocol
//! namespace, and one `<url>` child per entry with `<loc>`, `<lastmod>`,
//! and (only when the entry has one) `<changefreq>`. Indentation is two
//! spaces so consecutive runs produce diffable output.
//!
//! The reader walks the same shape with a `quick_xml` event loop and
//! tolerates unknown elements. Entries without a `<loc>` are skipped;
//! structurally broken XML is an error the caller downgrades to an empty
//! prior-entry list.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

use crate::models::SitemapUrl;

/// The sitemap protocol namespace declared on the root element.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Render merged entries as a complete sitemap document.
///
/// # Errors
///
/// Returns an error only when the underlying writer fails, which cannot
/// happen with the in-memory buffer used here but is still propagated
/// rather than swallowed.
pub fn render_sitemap(entries: &[SitemapUrl]) -> Result<String, Box<dyn Error>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    writer.write_event(Event::Start(urlset))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", &entry.loc)?;
        write_text_element(&mut writer, "lastmod", &entry.lastmod)?;
        if let Some(freq) = entry.changefreq {
            write_text_element(&mut writer, "changefreq", freq.as_str())?;
        }
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}

/// Write one `<tag>text</tag>` element, escaping the text.
fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    text: &str,
) -> Result<(), Box<dyn Error>> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Parse a sitemap document into its flat entry list.
///
/// # Errors
///
/// Returns an error when the XML is structurally malformed. Unknown
/// elements are ignored; a `<url>` without a `<loc>` is skipped; an
/// unrecognized `<changefreq>` value is treated as absent.
pub fn parse_sitemap(xml: &str) -> Result<Vec<SitemapUrl>, Box<dyn Error>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();

    let mut in_url = false;
    let mut current_element: Option<String> = None;
    let mut loc: Option<String> = None;
    let mut lastmod: Option<String> = None;
    let mut changefreq = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match name.as_str() {
                    "url" => {
                        in_url = true;
                        loc = None;
                        lastmod = None;
                        changefreq = None;
                    }
                    "loc" | "lastmod" | "changefreq" if in_url => {
                        current_element = Some(name);
                    }
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "url" && in_url {
                    if let Some(loc) = loc.take() {
                        entries.push(SitemapUrl {
                            loc,
                            lastmod: lastmod.take().unwrap_or_default(),
                            changefreq: changefreq.take(),
                        });
                    }
                    in_url = false;
                }
                current_element = None;
            }
            Ok(Event::Text(e)) => {
                if let Some(ref element) = current_element {
                    let text = e.decode()?;
                    let text = quick_xml::escape::unescape(&text)?;
                    let text = text.trim();
                    match element.as_str() {
                        "loc" => loc = Some(text.to_string()),
                        "lastmod" => lastmod = Some(text.to_string()),
                        "changefreq" => changefreq = text.parse().ok(),
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("sitemap XML parse error: {e}").into()),
            _ => {}
        }
    }

    Ok(entries)
}

/// Load the previously generated sitemap from disk.
///
/// A missing file is the normal first-run case and yields an empty list.
/// Read and parse failures are returned so the caller can log them and
/// fall back to an empty prior-entry list.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn load_sitemap(path: &str) -> Result<Vec<SitemapUrl>, Box<dyn Error>> {
    if !Path::new(path).exists() {
        info!("No existing sitemap found");
        return Ok(Vec::new());
    }
    let xml = fs::read_to_string(path).await?;
    let entries = parse_sitemap(&xml)?;
    info!(count = entries.len(), "Loaded existing sitemap entries");
    Ok(entries)
}
