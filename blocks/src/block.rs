//! Block registry: CMS component tag to markup.

use crate::components::{cta_button, image, link, submit_button};
use crate::context::RenderContext;
use crate::date::format_date;
use crate::markdown::{render_markdown, slugify};
use maud::{Markup, html};
use std::collections::HashSet;
use tideline_core::content::{
    Block, FeaturedArticle, FullImage, Heading, HeroSection, InfoBlock, Paragraph,
    ParagraphWithImage, Subscribe,
};
use tideline_core::form::{FORM_FIELD, FormKind};

/// Render blocks in order. Unknown blocks leave no trace.
pub fn render_blocks(blocks: &[Block], ctx: &RenderContext) -> Markup {
    let mut anchors = heading_anchors(blocks).into_iter().peekable();
    let rendered: Vec<Markup> = blocks
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let anchor = anchors.next_if(|(at, _)| *at == index).map(|(_, anchor)| anchor);
            wrap_block(block, index, anchor.as_deref(), ctx)
        })
        .collect();
    html! {
        @for markup in rendered {
            (markup)
        }
    }
}

/// Render one block, wrapped with its tag and position.
pub fn render_block(block: &Block, index: usize, ctx: &RenderContext) -> Markup {
    wrap_block(block, index, None, ctx)
}

fn wrap_block(block: &Block, index: usize, anchor: Option<&str>, ctx: &RenderContext) -> Markup {
    let inner = match block {
        Block::HeroSection(hero) => hero_section(hero, ctx),
        Block::InfoBlock(info) => info_block(info, ctx),
        Block::Paragraph(paragraph) => paragraph_block(paragraph),
        Block::ParagraphWithImage(p) => paragraph_with_image(p, ctx),
        Block::Heading(heading) => match anchor {
            Some(anchor) => heading_block(heading, anchor),
            None => heading_block(heading, &heading_anchor(heading)),
        },
        Block::FullImage(full) => full_image(full, ctx),
        Block::Subscribe(subscribe) => subscribe_block(subscribe, ctx),
        Block::FeaturedArticle(featured) => featured_article(featured, ctx),
        Block::Unknown { .. } => return html! {},
    };

    html! {
        div.block data-block=(block.tag()) data-block-index=(index) {
            (inner)
        }
    }
}

pub fn hero_section(hero: &HeroSection, ctx: &RenderContext) -> Markup {
    let theme = hero.theme.as_str();
    html! {
        section.hero {
            div.hero__background {
                (image(ctx, hero.image.as_ref(), "hero__background-image", 1920, 1080))
                @if hero.darken {
                    div.hero__background__overlay {}
                }
            }
            div class=(format!("hero__headline hero__headline--{theme}")) {
                h1 { (hero.heading) }
                @if let Some(author) = hero.author.as_deref().filter(|a| !a.is_empty()) {
                    p.hero__author { (author) }
                }
                @if let Some(published) = hero.published_at.as_deref() {
                    p.hero__published-at { (format_date(published)) }
                }
            }
            @if let Some(cta) = &hero.cta {
                (cta_button(cta, theme))
            }
            @if let Some(logo) = &hero.logo {
                (image(ctx, logo.image.as_ref(), &format!("hero__logo hero__logo--{theme}"), 120, 120))
            }
        }
    }
}

pub fn info_block(info: &InfoBlock, ctx: &RenderContext) -> Markup {
    let theme = info.theme.as_str();
    let mut class = format!("info info--{theme}");
    if info.reversed {
        class.push_str(" info--reversed");
    }

    html! {
        section class=(class) {
            (image(ctx, info.image.as_ref(), "info__image", 600, 500))
            div.info__text {
                h2 class=(format!("info__headline info__headline--{theme}")) { (info.headline) }
                div.copy { (render_markdown(&info.content)) }
                @if let Some(cta) = &info.cta {
                    (cta_button(cta, theme))
                }
            }
        }
    }
}

pub fn paragraph_block(paragraph: &Paragraph) -> Markup {
    html! {
        div.copy.article-paragraph { (render_markdown(&paragraph.content)) }
    }
}

pub fn paragraph_with_image(block: &ParagraphWithImage, ctx: &RenderContext) -> Markup {
    let mut class = String::from("article-text-image");
    if block.reversed {
        class.push_str(" article-text-image--reversed");
    }
    if !block.image_landscape {
        class.push_str(" article-text-image--portrait");
    }

    html! {
        div class=(class) {
            div.copy.article-text-image__text.article-paragraph {
                (render_markdown(&block.content))
            }
            div.article-text-image__container {
                (image(ctx, block.image.as_ref(), "article-text-image__image", 1920, 1080))
            }
        }
    }
}

/// Anchor id of a heading block: its `linkId`, else a slug of its text.
pub fn heading_anchor(heading: &Heading) -> String {
    heading
        .link_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| slugify(&heading.heading))
}

/// Anchors of every heading block in `blocks`, keyed by block index. A repeated
/// anchor gets the first free `-2`, `-3`, ... suffix so ids stay unique.
fn heading_anchors(blocks: &[Block]) -> Vec<(usize, String)> {
    let mut taken = HashSet::new();
    blocks
        .iter()
        .enumerate()
        .filter_map(|(index, block)| match block {
            Block::Heading(heading) => Some((index, heading_anchor(heading))),
            _ => None,
        })
        .map(|(index, base)| {
            let mut anchor = base.clone();
            let mut n = 2;
            while !taken.insert(anchor.clone()) {
                anchor = format!("{base}-{n}");
                n += 1;
            }
            (index, anchor)
        })
        .collect()
}

pub fn heading_block(heading: &Heading, anchor: &str) -> Markup {
    html! {
        h3.article-headline id=(anchor) { (heading.heading) }
    }
}

pub fn full_image(block: &FullImage, ctx: &RenderContext) -> Markup {
    html! {
        div.article-image {
            (image(ctx, block.image.as_ref(), "article-image__image", 1920, 1080))
        }
    }
}

/// Newsletter signup. Messages replace the placeholder so the visitor
/// sees them inside the field.
pub fn subscribe_block(block: &Subscribe, ctx: &RenderContext) -> Markup {
    let state = ctx.form(FormKind::Newsletter);
    let error = state
        .field_error("email")
        .or_else(|| state.error_message());
    let placeholder = error
        .or_else(|| state.success_message())
        .unwrap_or(block.placeholder.as_str());
    let input_class = if error.is_some() {
        "newsletter__email newsletter__email--error"
    } else {
        "newsletter__email"
    };

    html! {
        section.newsletter.container {
            div.newsletter__info {
                h4 { (block.headline) }
                p.copy { (block.content) }
            }
            form.newsletter__form method="post" data-form-phase=(state.phase()) {
                input type="hidden" name=(FORM_FIELD) value=(FormKind::Newsletter.as_str());
                input name="email" type="text" placeholder=(placeholder) class=(input_class)
                    aria-label="Email" aria-invalid=[error.map(|_| "true")];
                (submit_button(&block.button_text, "newsletter__subscribe btn btn--turquoise btn--medium", state.is_pending()))
            }
        }
    }
}

pub fn featured_article(block: &FeaturedArticle, ctx: &RenderContext) -> Markup {
    let picture = image(ctx, block.image.as_ref(), "featured-article__image", 300, 200);
    html! {
        article.featured-article.container {
            div.featured-article__info {
                h3 { (block.headline) }
                div.copy { (render_markdown(&block.excerpt)) }
                @if let Some(target) = &block.link {
                    (link(target, "btn btn--turquoise btn--medium", html! { (target.text) }))
                }
            }
            @match &block.link {
                Some(target) => {
                    (link(target, "featured-article__image-link", picture))
                }
                None => {
                    (picture)
                }
            }
        }
    }
}

/// One line of an article's table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub anchor: String,
    pub heading: String,
}

/// Heading blocks, in order, as anchor/text pairs. Anchors match the ids
/// `render_blocks` gives the headings.
pub fn table_of_contents(blocks: &[Block]) -> Vec<TocEntry> {
    heading_anchors(blocks)
        .into_iter()
        .filter_map(|(index, anchor)| match &blocks[index] {
            Block::Heading(heading) => Some(TocEntry { anchor, heading: heading.heading.clone() }),
            _ => None,
        })
        .collect()
}

pub fn article_overview(headline: &str, description: &str, toc: &[TocEntry]) -> Markup {
    html! {
        div.article-overview {
            div.article-overview__info {
                h3.article-overview__headline { (headline) }
                p.article-overview__description { (description) }
            }
            @if !toc.is_empty() {
                ul.article-overview__contents {
                    @for (index, entry) in toc.iter().enumerate() {
                        li {
                            a.article-overview__link href=(format!("#{}", entry.anchor)) {
                                (index + 1) ". " (entry.heading)
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tideline_core::content::BlockKind;
    use tideline_core::form::{FieldErrors, FormSlots, FormState, FormValues};
    use tideline_core::media::MediaResolver;

    fn ctx() -> RenderContext {
        RenderContext::new(MediaResolver::new("https://cms.example.com"))
    }

    fn image_json() -> serde_json::Value {
        json!({ "url": "/uploads/swell.jpg", "alternativeText": "A clean swell" })
    }

    /// A payload for each kind, with a field whose value shows up in the markup.
    fn sample(kind: BlockKind) -> (Block, &'static str) {
        let (payload, marker) = match kind {
            BlockKind::HeroSection => (json!({ "heading": "Hero Marker", "image": image_json() }), "Hero Marker"),
            BlockKind::InfoBlock => (json!({ "headline": "Info Marker", "content": "copy", "image": image_json() }), "Info Marker"),
            BlockKind::Paragraph => (json!({ "content": "Paragraph Marker" }), "Paragraph Marker"),
            BlockKind::ParagraphWithImage => (json!({ "content": "Side Marker", "image": image_json() }), "Side Marker"),
            BlockKind::Heading => (json!({ "heading": "Heading Marker" }), "Heading Marker"),
            BlockKind::FullImage => (json!({ "image": image_json() }), "/uploads/swell.jpg"),
            BlockKind::Subscribe => (json!({ "headline": "Subscribe Marker", "placeholder": "you@example.com", "buttonText": "Join" }), "Subscribe Marker"),
            BlockKind::FeaturedArticle => (json!({ "headline": "Featured Marker", "excerpt": "x", "link": { "href": "/blog/x", "text": "Read" } }), "Featured Marker"),
        };
        let mut payload = payload;
        payload["__component"] = json!(kind.tag());
        (Block::from_value(payload), marker)
    }

    #[test]
    fn test_every_block_kind_renders_its_fields() {
        for kind in BlockKind::ALL {
            let (block, marker) = sample(kind);
            assert_eq!(block.kind(), Some(kind));
            let html = render_block(&block, 0, &ctx()).into_string();
            assert!(html.contains(marker), "{} did not render {marker}: {html}", kind.tag());
            assert!(html.contains(&format!(r#"data-block="{}""#, kind.tag())));
        }
    }

    #[test]
    fn test_unknown_blocks_render_nothing_and_order_is_kept() {
        let blocks = vec![
            sample(BlockKind::Heading).0,
            Block::Unknown { component: "blocks.carousel".into() },
            sample(BlockKind::Paragraph).0,
        ];
        let html = render_blocks(&blocks, &ctx()).into_string();

        assert!(!html.contains("carousel"));
        let heading = html.find("Heading Marker").unwrap();
        let paragraph = html.find("Paragraph Marker").unwrap();
        assert!(heading < paragraph);
        assert!(html.contains(r#"data-block-index="2""#));
    }

    #[test]
    fn test_subscribe_shows_error_then_success_in_placeholder() {
        let (block, _) = sample(BlockKind::Subscribe);

        let mut errors = FieldErrors::new();
        errors.insert("email".into(), vec!["Please enter a valid email address".into()]);
        let mut slots = FormSlots::default();
        slots.set(
            FormKind::Newsletter,
            FormState::Invalid { errors, values: FormValues::new() },
        );
        let html = render_block(&block, 0, &ctx().with_forms(slots)).into_string();
        assert!(html.contains(r#"placeholder="Please enter a valid email address""#));
        assert!(html.contains("newsletter__email--error"));

        let mut slots = FormSlots::default();
        slots.set(
            FormKind::Newsletter,
            FormState::Accepted { message: "Successfully Subscribed!".into() },
        );
        let html = render_block(&block, 0, &ctx().with_forms(slots)).into_string();
        assert!(html.contains(r#"placeholder="Successfully Subscribed!""#));
        assert!(!html.contains("newsletter__email--error"));

        let html = render_block(&block, 0, &ctx()).into_string();
        assert!(html.contains(r#"placeholder="you@example.com""#));
        assert!(html.contains(r#"name="form" value="subscribe""#));
    }

    #[test]
    fn test_table_of_contents_uses_link_id_or_slug() {
        let blocks = vec![
            Block::Heading(Heading { heading: "Getting There".into(), link_id: Some("travel".into()) }),
            sample(BlockKind::Paragraph).0,
            Block::Heading(Heading { heading: "What to Pack".into(), link_id: None }),
        ];
        let toc = table_of_contents(&blocks);
        assert_eq!(
            toc,
            [
                TocEntry { anchor: "travel".into(), heading: "Getting There".into() },
                TocEntry { anchor: "what-to-pack".into(), heading: "What to Pack".into() },
            ]
        );

        let html = article_overview("Trip", "Notes", &toc).into_string();
        assert!(html.contains(r##"href="#travel""##));
        assert!(html.contains("2. What to Pack"));
    }

    #[test]
    fn test_repeated_headings_get_numbered_anchors() {
        let gear = || Block::Heading(Heading { heading: "Gear".into(), link_id: None });
        let blocks = vec![
            gear(),
            sample(BlockKind::Paragraph).0,
            gear(),
            Block::Heading(Heading { heading: "Other".into(), link_id: Some("gear-3".into()) }),
            gear(),
        ];

        let anchors: Vec<_> = table_of_contents(&blocks).into_iter().map(|e| e.anchor).collect();
        assert_eq!(anchors, ["gear", "gear-2", "gear-3", "gear-4"]);

        let html = render_blocks(&blocks, &ctx()).into_string();
        for anchor in &anchors {
            assert_eq!(html.matches(&format!(r#"id="{anchor}""#)).count(), 1, "{html}");
        }
    }

    #[test]
    fn test_hero_formats_published_date_and_darkens() {
        let hero = HeroSection {
            theme: "orange".into(),
            heading: "Dawn Patrol".into(),
            image: None,
            cta: None,
            logo: None,
            author: Some("Kai".into()),
            published_at: Some("2024-05-01T10:00:00.000Z".into()),
            darken: true,
        };
        let html = hero_section(&hero, &ctx()).into_string();
        assert!(html.contains("hero__headline--orange"));
        assert!(html.contains("Wednesday, May 1, 2024"));
        assert!(html.contains("hero__background__overlay"));
    }
}
