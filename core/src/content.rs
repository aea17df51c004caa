//! CMS content model.
//!
//! Mirrors the JSON the CMS REST API returns (camelCase keys, `null` for
//! empty fields). Everything here is a read-only snapshot of one response.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// Key carrying a block's component tag in dynamic-zone payloads.
pub const COMPONENT_KEY: &str = "__component";

const DEFAULT_THEME: &str = "turquoise";

/// Treat an explicit `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

fn theme<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(default_theme))
}

// ─── Shared fields ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default)]
    pub alternative_text: Option<String>,
}

impl Image {
    pub fn alt(&self) -> &str {
        self.alternative_text
            .as_deref()
            .filter(|alt| !alt.trim().is_empty())
            .unwrap_or("No alternative text provided")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(default, deserialize_with = "nullable")]
    pub href: String,
    #[serde(default, deserialize_with = "nullable")]
    pub text: String,
    #[serde(default, deserialize_with = "nullable")]
    pub is_external: bool,
}

impl Link {
    /// Anchor `target` attribute for this link.
    pub fn target(&self) -> &'static str {
        if self.is_external { "_blank" } else { "_self" }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logo {
    #[serde(default)]
    pub logo_text: Option<String>,
    #[serde(default)]
    pub image: Option<Image>,
}

/// A price as the CMS sends it: a JSON number or a preformatted string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price(pub String);

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Price(n.to_string()),
            Raw::Text(s) => Price(s),
        })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Blocks ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSection {
    #[serde(default = "default_theme", deserialize_with = "theme")]
    pub theme: String,
    #[serde(default, deserialize_with = "nullable")]
    pub heading: String,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub cta: Option<Link>,
    #[serde(default)]
    pub logo: Option<Logo>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub darken: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoBlock {
    #[serde(default = "default_theme", deserialize_with = "theme")]
    pub theme: String,
    #[serde(default, deserialize_with = "nullable")]
    pub reversed: bool,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default, deserialize_with = "nullable")]
    pub headline: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(default)]
    pub cta: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphWithImage {
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default, deserialize_with = "nullable")]
    pub reversed: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub image_landscape: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heading {
    #[serde(default, deserialize_with = "nullable")]
    pub heading: String,
    #[serde(default)]
    pub link_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullImage {
    #[serde(default)]
    pub image: Option<Image>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscribe {
    #[serde(default, deserialize_with = "nullable")]
    pub headline: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(default, deserialize_with = "nullable")]
    pub placeholder: String,
    #[serde(default, deserialize_with = "nullable")]
    pub button_text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedArticle {
    #[serde(default, deserialize_with = "nullable")]
    pub headline: String,
    #[serde(default)]
    pub link: Option<Link>,
    #[serde(default, deserialize_with = "nullable")]
    pub excerpt: String,
    #[serde(default)]
    pub image: Option<Image>,
}

/// Every block type the renderer knows, keyed by its CMS component tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    HeroSection,
    InfoBlock,
    Paragraph,
    ParagraphWithImage,
    Heading,
    FullImage,
    Subscribe,
    FeaturedArticle,
}

impl BlockKind {
    pub const ALL: [BlockKind; 8] = [
        BlockKind::HeroSection,
        BlockKind::InfoBlock,
        BlockKind::Paragraph,
        BlockKind::ParagraphWithImage,
        BlockKind::Heading,
        BlockKind::FullImage,
        BlockKind::Subscribe,
        BlockKind::FeaturedArticle,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            BlockKind::HeroSection => "blocks.hero-section",
            BlockKind::InfoBlock => "blocks.info-block",
            BlockKind::Paragraph => "blocks.paragraph",
            BlockKind::ParagraphWithImage => "blocks.paragraph-with-image",
            BlockKind::Heading => "blocks.heading",
            BlockKind::FullImage => "blocks.full-image",
            BlockKind::Subscribe => "blocks.subscribe",
            BlockKind::FeaturedArticle => "blocks.featured-article",
        }
    }

    pub fn from_tag(tag: &str) -> Option<BlockKind> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// One tagged unit of page content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    HeroSection(HeroSection),
    InfoBlock(InfoBlock),
    Paragraph(Paragraph),
    ParagraphWithImage(ParagraphWithImage),
    Heading(Heading),
    FullImage(FullImage),
    Subscribe(Subscribe),
    FeaturedArticle(FeaturedArticle),
    /// A component this build has no renderer for. Renders nothing.
    Unknown { component: String },
}

impl Block {
    pub fn kind(&self) -> Option<BlockKind> {
        Some(match self {
            Block::HeroSection(_) => BlockKind::HeroSection,
            Block::InfoBlock(_) => BlockKind::InfoBlock,
            Block::Paragraph(_) => BlockKind::Paragraph,
            Block::ParagraphWithImage(_) => BlockKind::ParagraphWithImage,
            Block::Heading(_) => BlockKind::Heading,
            Block::FullImage(_) => BlockKind::FullImage,
            Block::Subscribe(_) => BlockKind::Subscribe,
            Block::FeaturedArticle(_) => BlockKind::FeaturedArticle,
            Block::Unknown { .. } => return None,
        })
    }

    pub fn tag(&self) -> &str {
        match self {
            Block::Unknown { component } => component,
            other => other.kind().map(BlockKind::tag).unwrap_or_default(),
        }
    }

    /// Decode one dynamic-zone entry.
    ///
    /// Unrecognised tags and known tags with undecodable payloads both become
    /// [`Block::Unknown`], so one bad block never takes the page down.
    pub fn from_value(value: Value) -> Block {
        let component = value
            .get(COMPONENT_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let Some(kind) = BlockKind::from_tag(&component) else {
            tracing::debug!(component = %component, "skipping block with unrecognised component");
            return Block::Unknown { component };
        };

        let decoded = match kind {
            BlockKind::HeroSection => serde_json::from_value(value).map(Block::HeroSection),
            BlockKind::InfoBlock => serde_json::from_value(value).map(Block::InfoBlock),
            BlockKind::Paragraph => serde_json::from_value(value).map(Block::Paragraph),
            BlockKind::ParagraphWithImage => {
                serde_json::from_value(value).map(Block::ParagraphWithImage)
            }
            BlockKind::Heading => serde_json::from_value(value).map(Block::Heading),
            BlockKind::FullImage => serde_json::from_value(value).map(Block::FullImage),
            BlockKind::Subscribe => serde_json::from_value(value).map(Block::Subscribe),
            BlockKind::FeaturedArticle => {
                serde_json::from_value(value).map(Block::FeaturedArticle)
            }
        };

        decoded.unwrap_or_else(|err| {
            tracing::warn!(component = %component, error = %err, "dropping malformed block");
            Block::Unknown { component }
        })
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Block::from_value)
    }
}

// ─── Entries ─────────────────────────────────────────────────────────────────

/// A page, article or event.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Entry {
    pub id: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub document_id: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub slug: String,
    pub author: Option<String>,
    pub published_at: Option<String>,
    pub created_at: Option<String>,
    pub start_date: Option<String>,
    pub price: Option<Price>,
    #[serde(deserialize_with = "nullable")]
    pub featured: bool,
    pub image: Option<Image>,
    #[serde(deserialize_with = "nullable")]
    pub blocks: Vec<Block>,
}

impl Entry {
    /// Heading blocks in document order, for a table of contents.
    pub fn headings(&self) -> impl Iterator<Item = &Heading> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Heading(heading) => Some(heading),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u64,
}

impl Pagination {
    /// Previous-page control is enabled iff the current page is past the first.
    pub fn has_previous(page: u32) -> bool {
        page > 1
    }

    /// Next-page control is enabled iff the current page is before the last.
    pub fn has_next(&self, page: u32) -> bool {
        page < self.page_count
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub pagination: Option<Pagination>,
}

/// `{ data: [...], meta: { pagination } }` as returned by collection endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ListResponse {
    #[serde(deserialize_with = "nullable")]
    pub data: Vec<Entry>,
    pub meta: Meta,
}

impl ListResponse {
    pub fn page_count(&self) -> u32 {
        self.meta.pagination.map(|p| p.page_count).unwrap_or(1)
    }
}

/// `{ data: {...} | null }` as returned by single-type endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SingleResponse<T> {
    pub data: Option<T>,
}

// ─── Global settings ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Header {
    pub logo: Option<Logo>,
    #[serde(deserialize_with = "nullable")]
    pub navigation: Vec<Link>,
    pub cta: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Footer {
    pub logo: Option<Logo>,
    #[serde(deserialize_with = "nullable")]
    pub navigation: Vec<Link>,
    #[serde(deserialize_with = "nullable")]
    pub policies: Vec<Link>,
    #[serde(deserialize_with = "nullable")]
    pub copy: String,
}

/// Site-wide header and footer content.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalSettings {
    pub title: Option<String>,
    pub description: Option<String>,
    pub header: Option<Header>,
    pub footer: Option<Footer>,
}
