//! Built-in starter cards.

use super::{CardColors, CardDraft, CardId, ColorOverrides};
use serde::Serialize;

/// A read-only catalog entry users can instantiate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCard {
    pub id: CardId,
    pub title: String,
    pub content: String,
    pub is_template: bool,
    pub colors: Option<CardColors>,
}

impl TemplateCard {
    /// Draft for a new, independent card; absent colors fall back to `defaults`.
    pub fn to_draft(&self, defaults: &CardColors) -> CardDraft {
        let colors = self.colors.as_ref().unwrap_or(defaults);
        CardDraft::new(self.title.clone(), self.content.clone())
            .with_colors(ColorOverrides::from(colors))
    }
}

fn template(id: &str, title: &str, content: &str, colors: (&str, &str, &str)) -> TemplateCard {
    TemplateCard {
        id: CardId::from(id),
        title: title.to_string(),
        content: content.to_string(),
        is_template: true,
        colors: Some(CardColors {
            background: colors.0.to_string(),
            title: colors.1.to_string(),
            content: colors.2.to_string(),
        }),
    }
}

const SLATE: (&str, &str, &str) = ("#555b6e", "#6be1c7", "#ffffff");
const NIGHT: (&str, &str, &str) = ("#1a1a1a", "#ff6b6b", "#e0e0e0");
const PAPER: (&str, &str, &str) = ("#f8f9fa", "#495057", "#6c757d");
const OCEAN: (&str, &str, &str) = ("#0f3460", "#16d9e3", "#adb5bd");

/// The fixed starter catalog, in display order.
pub fn template_cards() -> Vec<TemplateCard> {
    vec![
        template(
            "template-1",
            "Welcome Card",
            "Welcome to your portfolio! Edit this card to make it your own.",
            SLATE,
        ),
        template(
            "template-2",
            "About Me",
            "Tell visitors about yourself, your background, and what makes you unique.",
            NIGHT,
        ),
        template(
            "template-3",
            "My Skills",
            "List your key skills, technologies, and areas of expertise here.",
            PAPER,
        ),
        template(
            "template-4",
            "Recent Projects",
            "Showcase your latest work and projects that demonstrate your abilities.",
            OCEAN,
        ),
        template(
            "template-5",
            "Contact Info",
            "Share your contact information and how people can reach you.",
            SLATE,
        ),
        template(
            "template-6",
            "Experience",
            "Highlight your work experience, achievements, and career milestones.",
            NIGHT,
        ),
        template(
            "template-7",
            "Education",
            "Share your educational background, certifications, and learning journey.",
            PAPER,
        ),
    ]
}

/// Look up a catalog entry by id (`template-4`) or by 1-based position (`4`).
pub fn find_template(key: &str) -> Option<TemplateCard> {
    let key = key.trim();
    let by_id = format!("template-{}", key);
    template_cards().into_iter().find(|t| {
        let id = t.id.to_string();
        id == key || id == by_id
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_seven_named_templates() {
        let templates = template_cards();
        assert_eq!(templates.len(), 7);
        for (i, t) in templates.iter().enumerate() {
            assert_eq!(t.id, CardId::Named(format!("template-{}", i + 1)));
            assert!(t.is_template);
            assert!(t.colors.is_some());
        }
    }

    #[test]
    fn test_catalog_literals() {
        let templates = template_cards();
        assert_eq!(templates[3].title, "Recent Projects");
        assert_eq!(templates[3].colors.as_ref().unwrap().title, "#16d9e3");
        assert_eq!(templates[6].title, "Education");
    }

    #[test]
    fn test_find_template() {
        assert_eq!(find_template("template-2").unwrap().title, "About Me");
        assert_eq!(find_template("5").unwrap().title, "Contact Info");
        assert!(find_template("template-8").is_none());
    }

    #[test]
    fn test_to_draft_without_colors_uses_defaults() {
        let mut t = template_cards().remove(1);
        t.colors = None;
        let draft = t.to_draft(&CardColors::default());
        assert_eq!(
            draft.colors.unwrap().resolve(&CardColors::default()),
            CardColors::default()
        );
    }
}
