//! WordPress eXtended RSS (WXR) parsing.
//!
//! A WXR file is an RSS channel whose `<item>` elements carry the post
//! fields under the `wp:`, `dc:`, and `content:` namespaces. Post bodies
//! live in `<content:encoded>` CDATA sections and are captured verbatim.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{Error, Result};
use crate::post::Post;

use super::resolve_entity;

/// The item child currently being accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Date,
    Creator,
    Content,
    Status,
    Category { is_category: bool },
}

impl Field {
    /// The element name that closes this field. Prefixed names are
    /// matched in full: `excerpt:encoded` shares a local name with
    /// `content:encoded`.
    fn element(self) -> &'static [u8] {
        match self {
            Self::Title => b"title",
            Self::Date => b"wp:post_date",
            Self::Creator => b"dc:creator",
            Self::Content => b"content:encoded",
            Self::Status => b"wp:status",
            Self::Category { .. } => b"category",
        }
    }
}

pub(crate) fn parse(content: &str) -> Result<Vec<Post>> {
    let mut reader = Reader::from_str(content);

    let mut posts = Vec::new();
    let mut post: Option<Post> = None;
    let mut field: Option<Field> = None;
    let mut buf = String::new();
    let mut saw_channel = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"channel" {
                    saw_channel = true;
                    continue;
                }
                if e.name().as_ref() == b"item" {
                    post = Some(Post::default());
                    field = None;
                    continue;
                }
                if post.is_none() {
                    // channel-level <title> and friends are not post fields
                    continue;
                }

                let next = match e.name().as_ref() {
                    b"title" => Some(Field::Title),
                    b"wp:post_date" => Some(Field::Date),
                    b"dc:creator" => Some(Field::Creator),
                    b"content:encoded" => Some(Field::Content),
                    b"wp:status" => Some(Field::Status),
                    b"category" => {
                        let mut is_category = false;
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"domain" {
                                is_category = attr.value.as_ref() == b"category";
                            }
                        }
                        Some(Field::Category { is_category })
                    }
                    _ => None,
                };
                if next.is_some() {
                    field = next;
                    buf.clear();
                }
            }
            Ok(Event::Text(e)) => {
                if field.is_some() {
                    buf.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::CData(e)) => {
                if field.is_some() {
                    buf.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if field.is_some()
                    && let Some(c) = resolve_entity(&String::from_utf8_lossy(e.as_ref()))
                {
                    buf.push(c);
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"item" {
                    if let Some(post) = post.take() {
                        posts.push(post);
                    }
                    field = None;
                    continue;
                }

                let Some(current) = field else { continue };
                if e.name().as_ref() != current.element() {
                    continue;
                }
                let Some(post) = post.as_mut() else { continue };

                match current {
                    Field::Title => post.title = buf.trim().to_string(),
                    Field::Date => post.date = buf.trim().to_string(),
                    Field::Creator => post.author = buf.trim().to_string(),
                    Field::Status => post.status = buf.trim().to_string(),
                    Field::Content => {
                        // bodies keep their whitespace; empty means no content
                        post.content = if buf.is_empty() {
                            None
                        } else {
                            Some(std::mem::take(&mut buf))
                        };
                    }
                    Field::Category { is_category } => {
                        let value = buf.trim().to_string();
                        if !value.is_empty() {
                            if is_category {
                                post.categories.push(value);
                            } else {
                                // tags are the most general classifier WXR gives us
                                post.tags.push(value);
                            }
                        }
                    }
                }
                field = None;
                buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    if !saw_channel {
        return Err(Error::MissingElement("channel".to_string()));
    }

    Ok(posts)
}
