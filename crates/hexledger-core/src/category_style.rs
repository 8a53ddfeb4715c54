use hexledger_domain::Category;

/// Chart color used for labels outside the known categories.
pub const FALLBACK_COLOR: &str = "#8884d8";

/// Presentation attributes of a category label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStyle {
    pub label: String,
    pub color: &'static str,
    pub badge: &'static str,
}

impl CategoryStyle {
    pub fn of(category: Category) -> Self {
        let (color, badge) = match category {
            Category::Asset => ("#3B82F6", "blue"),
            Category::Liability => ("#EF4444", "red"),
            Category::Income => ("#10B981", "green"),
            Category::Expense => ("#F59E0B", "amber"),
            Category::Equity => ("#8B5CF6", "purple"),
        };
        Self {
            label: category.label().to_string(),
            color,
            badge,
        }
    }

    /// Looks up a free-form label. Unknown labels get the fallback color, a
    /// gray badge and their first letter capitalised.
    pub fn for_label(label: &str) -> Self {
        match label.parse::<Category>() {
            Ok(category) => Self::of(category),
            Err(_) => Self {
                label: capitalise(label.trim()),
                color: FALLBACK_COLOR,
                badge: "gray",
            },
        }
    }
}

fn capitalise(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
