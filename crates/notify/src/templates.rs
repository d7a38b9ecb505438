//! Message templates with a single `[PRODUCT]` placeholder.

use {serde::Serialize, std::fmt};

/// Placeholder replaced by the lead's product.
pub const PRODUCT_TOKEN: &str = "[PRODUCT]";

/// Stand-in when a lead has no product.
pub const DEFAULT_PRODUCT_PHRASE: &str = "our products";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Welcome,
    Product,
    FollowUp,
    Closing,
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Welcome => "welcome",
            Self::Product => "product",
            Self::FollowUp => "follow_up",
            Self::Closing => "closing",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageTemplate {
    pub id: String,
    pub name: String,
    /// Situation the template is meant for, e.g. `product_viewed`.
    pub trigger: String,
    pub body: String,
    pub category: TemplateCategory,
}

impl MessageTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        trigger: impl Into<String>,
        body: impl Into<String>,
        category: TemplateCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trigger: trigger.into(),
            body: body.into(),
            category,
        }
    }

    #[must_use]
    pub fn render(&self, product: Option<&str>) -> String {
        substitute_product(&self.body, product)
    }
}

/// Replace every [`PRODUCT_TOKEN`] in `body`. Blank products count as absent.
#[must_use]
pub fn substitute_product(body: &str, product: Option<&str>) -> String {
    let product = product
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PRODUCT_PHRASE);
    body.replace(PRODUCT_TOKEN, product)
}

/// Ordered template set, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<MessageTemplate>,
}

impl TemplateCatalog {
    /// The four stock templates: welcome, product interest, 24h follow-up and
    /// closing.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            templates: vec![
                MessageTemplate::new(
                    "1",
                    "General welcome",
                    "new_visitor",
                    "Hi! 👋 Welcome to HairyPetShop. I see you're looking for something for your pet. How can I help? We have special offers today 🐾",
                    TemplateCategory::Welcome,
                ),
                MessageTemplate::new(
                    "2",
                    "Product interest",
                    "product_viewed",
                    "Hi! 😊 I noticed you're interested in [PRODUCT]. It's one of our most popular items. Would you like more details, or do you have a specific question?",
                    TemplateCategory::Product,
                ),
                MessageTemplate::new(
                    "3",
                    "24h follow-up",
                    "follow_up_24h",
                    "Hi again! 🐕 Did you get a chance to look at the information I sent yesterday? If you have any questions about [PRODUCT], I'm here to help.",
                    TemplateCategory::FollowUp,
                ),
                MessageTemplate::new(
                    "4",
                    "Closing the sale",
                    "close_sale",
                    "Perfect! 🎉 To go ahead with your order of [PRODUCT] I just need to confirm: what's your shipping address? You can pay by bank transfer or cash on delivery.",
                    TemplateCategory::Closing,
                ),
            ],
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&MessageTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageTemplate> {
        self.templates.iter()
    }

    /// Add a template, replacing any existing one with the same id.
    pub fn insert(&mut self, template: MessageTemplate) {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case(Some("Collar Premium"), "About Collar Premium.")]
    #[case(None, "About our products.")]
    #[case(Some("   "), "About our products.")]
    fn product_token_substitution(#[case] product: Option<&str>, #[case] expected: &str) {
        assert_eq!(substitute_product("About [PRODUCT].", product), expected);
    }

    #[test]
    fn body_without_token_is_unchanged() {
        assert_eq!(substitute_product("Hello!", Some("x")), "Hello!");
    }

    #[test]
    fn builtin_catalog_has_one_template_per_category() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(catalog.len(), 4);
        let categories: Vec<_> = catalog.iter().map(|t| t.category).collect();
        assert_eq!(categories, vec![
            TemplateCategory::Welcome,
            TemplateCategory::Product,
            TemplateCategory::FollowUp,
            TemplateCategory::Closing,
        ]);
        assert!(!catalog.get("1").unwrap().body.contains(PRODUCT_TOKEN));
        for id in ["2", "3", "4"] {
            let rendered = catalog.get(id).unwrap().render(Some("Pienso Premium"));
            assert!(rendered.contains("Pienso Premium"), "{id}: {rendered}");
            assert!(!rendered.contains(PRODUCT_TOKEN));
        }
    }

    #[test]
    fn insert_replaces_by_id() {
        let mut catalog = TemplateCatalog::builtin();
        catalog.insert(MessageTemplate::new("2", "Short", "product_viewed", "[PRODUCT]?", TemplateCategory::Product));
        catalog.insert(MessageTemplate::new("5", "Bye", "lost", "Bye!", TemplateCategory::Closing));
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.get("2").map(|t| t.render(None)), Some("our products?".to_owned()));
    }
}
