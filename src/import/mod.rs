//! Importers for WordPress export formats.
//!
//! Both supported exports are XML: the WordPress eXtended RSS file from
//! Tools → Export, and a PHPMyAdmin dump of the raw database tables.
//! Either way the result is a flat list of [`Post`] records; bodies are
//! passed through untouched so whitespace inside code survives.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::post::Post;

mod pma;
mod wxr;

/// Supported export flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// WordPress eXtended RSS (the Tools → Export download).
    WpRss,
    /// PHPMyAdmin XML dump of the WordPress database.
    PmaXml,
}

impl FromStr for SourceFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "wp_rss" | "wxr" => Ok(Self::WpRss),
            "pma_xml" | "pma" => Ok(Self::PmaXml),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Read every post from an export file.
pub fn read_posts(path: impl AsRef<Path>, format: SourceFormat) -> Result<Vec<Post>> {
    let bytes = fs::read(path)?;
    let content = String::from_utf8(strip_bom(&bytes).to_vec())?;
    match format {
        SourceFormat::WpRss => wxr::parse(&content),
        SourceFormat::PmaXml => pma::parse(&content),
    }
}

/// Strip UTF-8 BOM if present.
fn strip_bom(data: &[u8]) -> &[u8] {
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    }
}

/// Resolve XML entity references the reader reports as general refs.
///
/// The predefined five plus numeric character references; anything else
/// is dropped.
pub(crate) fn resolve_entity(entity: &str) -> Option<char> {
    let c = match entity {
        "apos" => '\'',
        "quot" => '"',
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)?
        }
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bom() {
        let with_bom = &[0xEF, 0xBB, 0xBF, b'h', b'i'];
        assert_eq!(strip_bom(with_bom), b"hi");
        assert_eq!(strip_bom(b"hello"), b"hello");
        assert_eq!(strip_bom(&[]), &[] as &[u8]);
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("amp"), Some('&'));
        assert_eq!(resolve_entity("lt"), Some('<'));
        assert_eq!(resolve_entity("#65"), Some('A'));
        assert_eq!(resolve_entity("#x2019"), Some('\u{2019}'));
        assert_eq!(resolve_entity("nbsp"), None);
    }

    #[test]
    fn test_source_format_from_str() {
        assert_eq!("wp_rss".parse::<SourceFormat>().unwrap(), SourceFormat::WpRss);
        assert_eq!("pma_xml".parse::<SourceFormat>().unwrap(), SourceFormat::PmaXml);
        assert!("mysql".parse::<SourceFormat>().is_err());
    }
}
