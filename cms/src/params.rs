//! Strapi query parameters.
//!
//! Strapi reads nested filters, pagination and populate directives from
//! bracketed query keys (`filters[slug][$eq]=surf-camp`). [`ListParams`]
//! describes a read; [`ListParams::to_pairs`] spells it out.

use crate::resource::SingleType;
use tideline_core::content::BlockKind;

/// What to expand alongside the entry's own fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Populate {
    /// Cover image only, for cards.
    #[default]
    Listing,
    /// Cover image and every block with its media and links.
    Blocks,
}

/// A collection read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListParams {
    pub slug: Option<String>,
    pub query: Option<String>,
    pub featured: bool,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub populate: Populate,
}

impl ListParams {
    /// Newest entries first, one page.
    pub fn listing(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    /// Full entry with blocks, matched by slug.
    pub fn by_slug(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            populate: Populate::Blocks,
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: Option<&str>) -> Self {
        self.query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(slug) = &self.slug {
            push(&mut pairs, "filters[slug][$eq]", slug);
        }
        if let Some(query) = &self.query {
            push(&mut pairs, "filters[$or][0][title][$containsi]", query);
            push(&mut pairs, "filters[$or][1][description][$containsi]", query);
        }
        if self.featured {
            push(&mut pairs, "filters[featured][$eq]", "true");
        }

        if self.slug.is_none() {
            push(&mut pairs, "sort[0]", "createdAt:desc");
        }

        if let Some(page) = self.page {
            push(&mut pairs, "pagination[page]", &page.to_string());
        }
        if let Some(size) = self.page_size {
            push(&mut pairs, "pagination[pageSize]", &size.to_string());
        }

        image_fields(&mut pairs, "populate[image]");
        if self.populate == Populate::Blocks {
            block_populate(&mut pairs, "populate[blocks]");
        }
        pairs
    }
}

/// Populate directives for a single type.
pub fn single_pairs(single: SingleType) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    match single {
        SingleType::HomePage => block_populate(&mut pairs, "populate[blocks]"),
        SingleType::Global => {
            for section in ["header", "footer"] {
                let prefix = format!("populate[{section}][populate]");
                image_fields(&mut pairs, &format!("{prefix}[logo][populate][image]"));
                push(&mut pairs, &format!("{prefix}[navigation]"), "true");
            }
            push(&mut pairs, "populate[header][populate][cta]", "true");
            push(&mut pairs, "populate[footer][populate][policies]", "true");
        }
    }
    pairs
}

fn push(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    pairs.push((key.to_string(), value.to_string()));
}

fn image_fields(pairs: &mut Vec<(String, String)>, prefix: &str) {
    push(pairs, &format!("{prefix}[fields][0]"), "url");
    push(pairs, &format!("{prefix}[fields][1]"), "alternativeText");
}

/// Relations each block type needs expanded.
fn block_relations(kind: BlockKind) -> &'static [&'static str] {
    match kind {
        BlockKind::HeroSection => &["image", "cta", "logo"],
        BlockKind::InfoBlock => &["image", "cta"],
        BlockKind::ParagraphWithImage | BlockKind::FullImage => &["image"],
        BlockKind::FeaturedArticle => &["image", "link"],
        BlockKind::Paragraph | BlockKind::Heading | BlockKind::Subscribe => &[],
    }
}

fn block_populate(pairs: &mut Vec<(String, String)>, prefix: &str) {
    for kind in BlockKind::ALL {
        let base = format!("{prefix}[on][{}]", kind.tag());
        let relations = block_relations(kind);
        if relations.is_empty() {
            push(pairs, &format!("{base}[populate]"), "*");
            continue;
        }
        for relation in relations {
            let key = format!("{base}[populate][{relation}]");
            match *relation {
                "image" => image_fields(pairs, &key),
                "logo" => image_fields(pairs, &format!("{key}[populate][image]")),
                _ => push(pairs, &key, "true"),
            }
        }
    }
}
