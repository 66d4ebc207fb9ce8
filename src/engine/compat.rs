//! Property-category compatibility table.
//!
//! Each property category permits a fixed set of effect names. The table is
//! the single source of truth for valid `(property, effect)` pairs; the router
//! refuses any pair it does not list.
//!
//! ## Layout
//!
//! - [`TABLE`] lists categories with their permitted effects, in declaration order.
//! - [`BY_EFFECT`] is the inverted index built once on first use: effect name
//!   to the [`CategorySet`] of categories that accept it. Lookups on the fire
//!   path are a single hash probe plus a bit test.
//!
//! ## Invariants
//!
//! - Every [`Category`] appears exactly once in [`TABLE`].
//! - `CategorySet` has one bit per `Category` (see [`Category::flag`]).
//! - Property names compare case-insensitively, effect names case-sensitively.

use once_cell::sync::Lazy;
use std::collections::HashMap;

bitflags::bitflags! {
    /// Set of property categories, one bit per [`Category`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CategorySet: u8 {
        const TEXT             = 1 << 0;
        const COLOR            = 1 << 1;
        const BACKGROUND_COLOR = 1 << 2;
        const VALUE            = 1 << 3;
        const REQUEST          = 1 << 4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Text,
    Color,
    BackgroundColor,
    Value,
    Request,
}

const TEXT_EFFECTS: &[&str] =
    &["fall", "rise", "slideIn", "slideOut", "fadeIn", "fadeOut", "pop", "implode", "shake", "shiver"];
const COLOR_EFFECTS: &[&str] = &["paint", "fadeColor", "chameleonCamo", "octopusCamo"];

/// Category → permitted effect names.
pub const TABLE: &[(Category, &[&str])] = &[
    (Category::Text, TEXT_EFFECTS),
    (Category::Color, COLOR_EFFECTS),
    (Category::BackgroundColor, COLOR_EFFECTS),
    (Category::Value, &["searchValue"]),
    (Category::Request, &["callBack", "callDismiss"]),
];

/// Effect name → categories accepting it.
pub static BY_EFFECT: Lazy<HashMap<&'static str, CategorySet>> = Lazy::new(|| {
    let mut index: HashMap<&'static str, CategorySet> = HashMap::new();
    for (category, effects) in TABLE {
        for effect in *effects {
            *index.entry(*effect).or_insert(CategorySet::empty()) |= category.flag();
        }
    }
    index
});

impl Category {
    pub const ALL: [Category; 5] =
        [Category::Text, Category::Color, Category::BackgroundColor, Category::Value, Category::Request];

    /// Category for a property name, if the property names one.
    pub fn from_property(property: &str) -> Option<Category> {
        match property.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Category::Text),
            "color" => Some(Category::Color),
            "background-color" => Some(Category::BackgroundColor),
            "value" => Some(Category::Value),
            "request" => Some(Category::Request),
            _ => None,
        }
    }

    /// The property name this category is written as.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Text => "text",
            Category::Color => "color",
            Category::BackgroundColor => "background-color",
            Category::Value => "value",
            Category::Request => "request",
        }
    }

    pub fn flag(self) -> CategorySet {
        match self {
            Category::Text => CategorySet::TEXT,
            Category::Color => CategorySet::COLOR,
            Category::BackgroundColor => CategorySet::BACKGROUND_COLOR,
            Category::Value => CategorySet::VALUE,
            Category::Request => CategorySet::REQUEST,
        }
    }

    /// Effect names permitted for this category.
    pub fn effects(self) -> &'static [&'static str] {
        TABLE.iter().find(|(c, _)| *c == self).map(|(_, effects)| *effects).unwrap_or(&[])
    }

    pub fn permits(self, effect: &str) -> bool {
        categories_for(effect).contains(self.flag())
    }
}

/// Categories that accept `effect` (empty for names the table never lists).
pub fn categories_for(effect: &str) -> CategorySet {
    BY_EFFECT.get(effect).copied().unwrap_or(CategorySet::empty())
}

/// Whether `effect` may run for an action on `property`.
///
/// Properties outside every category accept nothing.
pub fn is_compatible(property: &str, effect: &str) -> bool {
    Category::from_property(property).is_some_and(|category| category.permits(effect))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_category_once() {
        for category in Category::ALL {
            assert_eq!(TABLE.iter().filter(|(c, _)| *c == category).count(), 1, "{category:?}");
            assert_eq!(Category::from_property(category.as_str()), Some(category));
        }
        assert_eq!(TABLE.len(), Category::ALL.len());
    }

    #[test]
    fn index_agrees_with_table() {
        for (category, effects) in TABLE {
            for effect in *effects {
                assert!(is_compatible(category.as_str(), effect), "{category:?} / {effect}");
            }
        }
        // Every (category, effect) pair not in the table is refused.
        for effect in BY_EFFECT.keys() {
            for category in Category::ALL {
                assert_eq!(category.permits(effect), category.effects().contains(effect));
            }
        }
    }

    #[test]
    fn shared_color_effects() {
        assert_eq!(categories_for("paint"), CategorySet::COLOR | CategorySet::BACKGROUND_COLOR);
        assert_eq!(categories_for("fall"), CategorySet::TEXT);
        assert!(categories_for("explode").is_empty());
    }

    #[test]
    fn property_case_is_ignored_but_effect_case_is_not() {
        assert!(is_compatible("TEXT", "fall"));
        assert!(is_compatible("Background-Color", "fadeColor"));
        assert!(!is_compatible("text", "Fall"));
        assert!(!is_compatible("color", "fall"));
        assert!(!is_compatible("border", "paint"));
    }
}
