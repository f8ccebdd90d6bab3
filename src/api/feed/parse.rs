use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_xml_rs::SerdeXml;

use crate::{
    ArcStr,
    model::{Article, Feed, Image},
};

/// Parses an RSS 2.0 or Atom document into a [`Feed`].
///
/// The format is picked from the root element. Dates that cannot be parsed
/// leave the article undated instead of failing the whole feed.
///
/// # Errors
/// If the document is not well-formed XML, or if its root is neither `<rss>`
/// nor `<feed>`.
pub fn parse_feed(xml: &str) -> anyhow::Result<Feed> {
    let root = root_element(xml).context("Document has no root element")?;
    match local_name(root) {
        "rss" => parse_rss(xml),
        "feed" => parse_atom(xml),
        other => bail!("unsupported feed format: <{}>", other),
    }
}

/// Name of the first element of the document, skipping the prolog.
fn root_element(xml: &str) -> Option<&str> {
    let mut rest = xml;
    loop {
        let start = rest.find('<')?;
        rest = &rest[start..];
        if let Some(comment) = rest.strip_prefix("<!--") {
            let end = comment.find("-->")?;
            rest = &comment[end + 3..];
        } else if rest.starts_with("<?") || rest.starts_with("<!") {
            let end = rest.find('>')?;
            rest = &rest[end + 1..];
        } else {
            let name = &rest[1..];
            let end = name
                .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
                .unwrap_or(name.len());
            return Some(&name[..end]);
        }
    }
}

/// Deserializes `xml`, collecting repeated elements into one `Vec` even
/// when other elements sit between them.
fn from_str<T: for<'de> Deserialize<'de>>(xml: &str) -> Result<T, serde_xml_rs::Error> {
    SerdeXml::new().overlapping_sequences(true).from_str(xml)
}

fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// RFC 2822 first, as RSS mandates, then RFC 3339 which some feeds use.
fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

fn is_image(kind: Option<&str>) -> bool {
    kind.is_some_and(|kind| kind.trim().starts_with("image/"))
}

fn text(value: Option<String>) -> ArcStr {
    value.map(|v| ArcStr::from(v.trim())).unwrap_or_default()
}

fn parse_rss(xml: &str) -> anyhow::Result<Feed> {
    #[derive(Debug, Deserialize)]
    struct Rss {
        channel: Channel,
    }

    #[derive(Debug, Deserialize)]
    struct Channel {
        title: Option<String>,
        description: Option<String>,
        #[serde(rename = "item", default)]
        items: Vec<Item>,
    }

    #[derive(Debug, Deserialize)]
    struct Item {
        title: Option<String>,
        description: Option<String>,
        #[serde(rename = "content:encoded", alias = "encoded")]
        content: Option<String>,
        link: Option<String>,
        #[serde(rename = "pubDate")]
        pub_date: Option<String>,
        #[serde(rename = "enclosure", default)]
        enclosures: Vec<Enclosure>,
    }

    #[derive(Debug, Deserialize)]
    struct Enclosure {
        #[serde(rename = "@url")]
        url: Option<String>,
        #[serde(rename = "@type")]
        kind: Option<String>,
    }

    let rss: Rss = from_str(xml).context("Failed to parse RSS document")?;

    let articles = rss
        .channel
        .items
        .into_iter()
        .map(|item| {
            let image = item
                .enclosures
                .into_iter()
                .find(|enclosure| is_image(enclosure.kind.as_deref()))
                .map(|enclosure| Image {
                    url: text(enclosure.url),
                    title: ArcStr::default(),
                })
                .unwrap_or_default();
            Article {
                title: text(item.title),
                description: text(item.description),
                content: text(item.content),
                image,
                url: text(item.link),
                published: item.pub_date.as_deref().and_then(parse_date),
            }
        })
        .collect();

    Ok(Feed {
        title: text(rss.channel.title),
        description: text(rss.channel.description),
        articles,
    })
}

fn parse_atom(xml: &str) -> anyhow::Result<Feed> {
    #[derive(Debug, Deserialize)]
    struct AtomFeed {
        title: Option<String>,
        subtitle: Option<String>,
        #[serde(rename = "entry", default)]
        entries: Vec<Entry>,
    }

    #[derive(Debug, Deserialize)]
    struct Entry {
        title: Option<String>,
        summary: Option<String>,
        content: Option<String>,
        published: Option<String>,
        updated: Option<String>,
        #[serde(rename = "link", default)]
        links: Vec<Link>,
    }

    #[derive(Debug, Deserialize)]
    struct Link {
        #[serde(rename = "@href")]
        href: Option<String>,
        #[serde(rename = "@rel")]
        rel: Option<String>,
        #[serde(rename = "@type")]
        kind: Option<String>,
        #[serde(rename = "@title")]
        title: Option<String>,
    }

    let feed: AtomFeed = from_str(xml).context("Failed to parse Atom document")?;

    let articles = feed
        .entries
        .into_iter()
        .map(|entry| {
            let url = entry
                .links
                .iter()
                .find(|link| matches!(link.rel.as_deref(), None | Some("alternate")))
                .and_then(|link| link.href.clone());
            let image = entry
                .links
                .iter()
                .find(|link| {
                    link.rel.as_deref() == Some("enclosure") && is_image(link.kind.as_deref())
                })
                .map(|link| Image {
                    url: text(link.href.clone()),
                    title: text(link.title.clone()),
                })
                .unwrap_or_default();
            let published = entry
                .published
                .as_deref()
                .and_then(parse_date)
                .or_else(|| entry.updated.as_deref().and_then(parse_date));
            Article {
                title: text(entry.title),
                description: text(entry.summary),
                content: text(entry.content),
                image,
                url: text(url),
                published,
            }
        })
        .collect();

    Ok(Feed {
        title: text(feed.title),
        description: text(feed.subtitle),
        articles,
    })
}
