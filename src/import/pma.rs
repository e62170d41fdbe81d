//! PHPMyAdmin XML dump parsing.
//!
//! A PMA export is one `<table name="...">` element per database row,
//! each holding `<column name="...">` values. Reassembling posts means
//! re-implementing the WordPress joins: terms resolve through
//! `wp_term_taxonomy` and `wp_term_relationships`, author ids through
//! `wp_users`, and revisions collapse onto their parent post.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{Error, Result};
use crate::post::Post;

use super::resolve_entity;

/// One `<table>` element: a single row of the named database table.
#[derive(Debug, Default)]
struct Row {
    table: String,
    columns: HashMap<String, String>,
}

impl Row {
    fn get(&self, column: &str) -> &str {
        self.columns.get(column).map(String::as_str).unwrap_or("")
    }
}

pub(crate) fn parse(content: &str) -> Result<Vec<Post>> {
    let rows = read_rows(content)?;
    Ok(join_rows(&rows))
}

fn read_rows(content: &str) -> Result<Vec<Row>> {
    let mut reader = Reader::from_str(content);

    let mut rows = Vec::new();
    let mut row: Option<Row> = None;
    let mut column: Option<String> = None;
    let mut buf = String::new();
    let mut saw_database = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"database" => saw_database = true,
                b"table" => {
                    let mut next = Row::default();
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"name" {
                            next.table = String::from_utf8_lossy(attr.value.as_ref()).into_owned();
                        }
                    }
                    row = Some(next);
                }
                b"column" if row.is_some() => {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"name" {
                            column =
                                Some(String::from_utf8_lossy(attr.value.as_ref()).into_owned());
                        }
                    }
                    buf.clear();
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"column"
                    && let Some(row) = row.as_mut()
                {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"name" {
                            let name = String::from_utf8_lossy(attr.value.as_ref()).into_owned();
                            row.columns.insert(name, String::new());
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if column.is_some() {
                    buf.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::CData(e)) => {
                if column.is_some() {
                    buf.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if column.is_some()
                    && let Some(c) = resolve_entity(&String::from_utf8_lossy(e.as_ref()))
                {
                    buf.push(c);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"column" => {
                    if let (Some(row), Some(name)) = (row.as_mut(), column.take()) {
                        row.columns.insert(name, std::mem::take(&mut buf));
                    }
                }
                b"table" => {
                    if let Some(row) = row.take()
                        && !row.table.is_empty()
                    {
                        rows.push(row);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    if !saw_database {
        return Err(Error::MissingElement("database".to_string()));
    }

    Ok(rows)
}

/// The database joins, in document order.
fn join_rows(rows: &[Row]) -> Vec<Post> {
    // term_id -> slug
    let mut terms: HashMap<&str, &str> = HashMap::new();
    for row in rows.iter().filter(|r| r.table == "wp_terms") {
        terms.insert(row.get("term_id"), row.get("slug"));
    }

    // term_taxonomy_id -> slug, split by taxonomy kind; link taxonomies
    // and anything else are ignored
    let mut tag_terms: HashMap<&str, &str> = HashMap::new();
    let mut category_terms: HashMap<&str, &str> = HashMap::new();
    for row in rows.iter().filter(|r| r.table == "wp_term_taxonomy") {
        let Some(&slug) = terms.get(row.get("term_id")) else {
            continue;
        };
        match row.get("taxonomy") {
            "post_tag" => {
                tag_terms.insert(row.get("term_taxonomy_id"), slug);
            }
            "category" => {
                category_terms.insert(row.get("term_taxonomy_id"), slug);
            }
            _ => {}
        }
    }

    // user id -> display name
    let mut users: HashMap<&str, &str> = HashMap::new();
    for row in rows.iter().filter(|r| r.table == "wp_users") {
        users.insert(row.get("ID"), row.get("display_name"));
    }

    // post id -> classifier lists
    let mut post_tags: HashMap<&str, Vec<String>> = HashMap::new();
    let mut post_categories: HashMap<&str, Vec<String>> = HashMap::new();
    for row in rows.iter().filter(|r| r.table == "wp_term_relationships") {
        let object_id = row.get("object_id");
        let ttid = row.get("term_taxonomy_id");
        if let Some(&slug) = tag_terms.get(ttid) {
            post_tags
                .entry(object_id)
                .or_default()
                .push(slug.to_string());
        }
        if let Some(&slug) = category_terms.get(ttid) {
            post_categories
                .entry(object_id)
                .or_default()
                .push(slug.to_string());
        }
    }

    // posts in document order; revisions overwrite their parent
    let mut order: Vec<&str> = Vec::new();
    let mut posts: HashMap<&str, Post> = HashMap::new();

    for row in rows.iter().filter(|r| r.table == "wp_posts") {
        let mut id = row.get("ID");
        let mut status = row.get("post_status").to_string();

        if row.get("post_type") == "revision" {
            id = row.get("post_parent");
            if status == "inherit"
                && let Some(parent) = posts.get(id)
            {
                status = parent.status.clone();
            }
        }

        let author_id = row.get("post_author");
        let author = users.get(author_id).copied().unwrap_or(author_id);
        let content = row.get("post_content");

        let post = Post {
            title: row.get("post_title").to_string(),
            date: row.get("post_date").to_string(),
            author: author.to_string(),
            status,
            content: (!content.is_empty()).then(|| content.to_string()),
            tags: post_tags.get(id).cloned().unwrap_or_default(),
            categories: post_categories.get(id).cloned().unwrap_or_default(),
        };

        if !posts.contains_key(id) {
            order.push(id);
        }
        posts.insert(id, post);
    }

    order
        .into_iter()
        .filter_map(|id| posts.remove(id))
        .collect()
}
