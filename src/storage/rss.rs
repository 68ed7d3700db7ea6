// src/storage/rss.rs

//! RSS 2.0 rendering of a [`FeedDocument`].

use std::collections::BTreeMap;

use rss::extension::{Extension, ExtensionMap};
use rss::{Channel, ChannelBuilder, EnclosureBuilder, GuidBuilder, Item, ItemBuilder};

use crate::error::Result;
use crate::models::{ArticleRecord, FeedDocument};

/// Media RSS namespace, used for `media:content` and `media:thumbnail`.
pub const MEDIA_NAMESPACE: &str = "http://search.yahoo.com/mrss/";

/// Build the RSS channel for a feed document.
pub fn build_channel(doc: &FeedDocument) -> Channel {
    let mut namespaces = BTreeMap::new();
    namespaces.insert("media".to_string(), MEDIA_NAMESPACE.to_string());

    ChannelBuilder::default()
        .title(doc.meta.title.clone())
        .link(doc.meta.link.clone())
        .description(doc.meta.description.clone())
        .last_build_date(Some(doc.last_build.to_rfc2822()))
        .ttl(Some(doc.meta.ttl_minutes.to_string()))
        .namespaces(namespaces)
        .items(doc.items.iter().map(build_item).collect::<Vec<_>>())
        .build()
}

/// Render a feed document to an RSS 2.0 XML string.
pub fn render(doc: &FeedDocument) -> Result<String> {
    let channel = build_channel(doc);
    let mut buffer = Vec::new();
    channel.pretty_write_to(&mut buffer, b' ', 2)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn build_item(record: &ArticleRecord) -> Item {
    let guid = GuidBuilder::default()
        .value(record.guid())
        .permalink(false)
        .build();

    let mut item = ItemBuilder::default();
    item.title(Some(record.title.clone()))
        .link(Some(record.url.clone()))
        .guid(Some(guid))
        .pub_date(record.published_at.map(|date| date.to_rfc2822()))
        .description(Some(item_description(record)));

    if let Some(thumbnail) = &record.thumbnail_url {
        let mime = record.thumbnail_mime().unwrap_or("image/*");
        item.enclosure(Some(
            EnclosureBuilder::default()
                .url(thumbnail.clone())
                .length("0".to_string())
                .mime_type(mime.to_string())
                .build(),
        ));
        item.extensions(media_extensions(thumbnail));
    }

    item.build()
}

/// HTML body of an item: optional thumbnail paragraph, then lead or title.
fn item_description(record: &ArticleRecord) -> String {
    let mut html = String::new();
    if let Some(thumbnail) = &record.thumbnail_url {
        html.push_str(&format!(
            "<p><img src=\"{}\" alt=\"miniatura\"/></p>",
            html_escape::encode_double_quoted_attribute(thumbnail)
        ));
    }
    let text = record.lead.as_deref().unwrap_or(&record.title);
    html.push_str(&format!("<p>{}</p>", html_escape::encode_text(text)));
    html
}

fn media_extensions(thumbnail: &str) -> ExtensionMap {
    let element = |name: &str, attrs: &[(&str, &str)]| Extension {
        name: format!("media:{name}"),
        value: None,
        attrs: attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        children: BTreeMap::new(),
    };

    let mut media = BTreeMap::new();
    media.insert(
        "content".to_string(),
        vec![element("content", &[("url", thumbnail), ("medium", "image")])],
    );
    media.insert(
        "thumbnail".to_string(),
        vec![element("thumbnail", &[("url", thumbnail)])],
    );

    let mut extensions = ExtensionMap::new();
    extensions.insert("media".to_string(), media);
    extensions
}
