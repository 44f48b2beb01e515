//! Herb catalog search and category grouping.
//!
//! The catalog does not ship plant data; callers load a herb list (for
//! example from a JSON export) and query it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Catalog category.
///
/// Ordering follows the catalog's display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Digestion aids
    #[serde(rename = "Digestive Health")]
    DigestiveHealth,
    /// Topical and cosmetic use
    #[serde(rename = "Skin Care & Beauty")]
    SkinCare,
    /// Immune support
    #[serde(rename = "Immunity Boosting Herbs")]
    Immunity,
    /// Respiratory support
    #[serde(rename = "Respiratory Support")]
    Respiratory,
    /// Calming herbs
    #[serde(rename = "Stress & Anxiety")]
    StressAnxiety,
    /// Rare and endemic species
    #[serde(rename = "Rare Botanical Treasure")]
    Rare,
    /// Fallback for herbs without a specific category
    #[serde(rename = "Medicinal Herbs")]
    Medicinal,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 7] = [
        Self::DigestiveHealth,
        Self::SkinCare,
        Self::Immunity,
        Self::Respiratory,
        Self::StressAnxiety,
        Self::Rare,
        Self::Medicinal,
    ];

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::DigestiveHealth => "Digestive Health",
            Self::SkinCare => "Skin Care & Beauty",
            Self::Immunity => "Immunity Boosting Herbs",
            Self::Respiratory => "Respiratory Support",
            Self::StressAnxiety => "Stress & Anxiety",
            Self::Rare => "Rare Botanical Treasure",
            Self::Medicinal => "Medicinal Herbs",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts the label ignoring case and punctuation, so
    /// `digestive-health` parses as well as `Digestive Health`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|c| normalize_label(c.label()) == wanted)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Herb {
    /// Slug identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Botanical name
    #[serde(default)]
    pub scientific_name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Image path
    #[serde(default)]
    pub image: String,
    /// Categories the herb is listed under
    #[serde(default, rename = "category")]
    pub categories: Vec<Category>,
}

impl Herb {
    /// Derive a catalog id from a herb name: lowercase, whitespace runs
    /// collapsed to `_`.
    pub fn slug(name: &str) -> String {
        name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("_")
    }

    /// Categories, with `Medicinal Herbs` standing in for an empty list.
    pub fn effective_categories(&self) -> Vec<Category> {
        if self.categories.is_empty() {
            vec![Category::Medicinal]
        } else {
            self.categories.clone()
        }
    }
}

/// Search text plus optional category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Case-insensitive substring of the herb name
    pub search: String,
    /// `None` means all categories
    pub category: Option<Category>,
}

impl CatalogQuery {
    /// Query matching everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Restrict to one category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Check whether `herb` satisfies the query.
    pub fn matches(&self, herb: &Herb) -> bool {
        let needle = self.search.trim().to_lowercase();
        let name_ok = needle.is_empty() || herb.name.to_lowercase().contains(&needle);
        let category_ok =
            self.category.map_or(true, |c| herb.effective_categories().contains(&c));
        name_ok && category_ok
    }
}

/// In-memory herb catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    herbs: Vec<Herb>,
}

impl Catalog {
    /// Build a catalog from a herb list.
    pub fn new(herbs: Vec<Herb>) -> Self {
        Self { herbs }
    }

    /// Parse a JSON array of herbs.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json).map(Self::new)
    }

    /// All herbs in load order.
    pub fn herbs(&self) -> &[Herb] {
        &self.herbs
    }

    /// Number of herbs.
    pub fn len(&self) -> usize {
        self.herbs.len()
    }

    /// Check whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.herbs.is_empty()
    }

    /// Herbs matching `query`, in load order.
    pub fn filter(&self, query: &CatalogQuery) -> Vec<&Herb> {
        self.herbs.iter().filter(|herb| query.matches(herb)).collect()
    }

    /// Matching herbs grouped by category.
    ///
    /// With a selected category only that group is returned (possibly
    /// empty). Otherwise a herb appears under each of its categories.
    pub fn group(&self, query: &CatalogQuery) -> BTreeMap<Category, Vec<&Herb>> {
        let matches = self.filter(query);
        let mut groups: BTreeMap<Category, Vec<&Herb>> = BTreeMap::new();

        if let Some(selected) = query.category {
            groups.insert(selected, matches);
            return groups;
        }

        for herb in matches {
            for category in herb.effective_categories() {
                groups.entry(category).or_default().push(herb);
            }
        }
        groups
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn herb(name: &str, categories: Vec<Category>) -> Herb {
        Herb {
            id: Herb::slug(name),
            name: name.to_string(),
            scientific_name: String::new(),
            description: String::new(),
            image: format!("/images/{}.jpg", Herb::slug(name)),
            categories,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            herb("Tulsi", vec![Category::Immunity, Category::Respiratory, Category::StressAnxiety]),
            herb("Turmeric", vec![Category::DigestiveHealth, Category::SkinCare]),
            herb("Aloe Vera", vec![]),
        ])
    }

    #[test]
    fn test_slug() {
        assert_eq!(Herb::slug("Aloe Vera"), "aloe_vera");
        assert_eq!(Herb::slug("  Geranium   Flower "), "geranium_flower");
    }

    #[test]
    fn test_filter_by_search_and_category() {
        let catalog = catalog();

        let names: Vec<_> =
            catalog.filter(&CatalogQuery::new().search("TU")).iter().map(|h| &h.name).collect();
        assert_eq!(names, ["Tulsi", "Turmeric"]);

        let query = CatalogQuery::new().search("tu").category(Category::SkinCare);
        let names: Vec<_> = catalog.filter(&query).iter().map(|h| &h.name).collect();
        assert_eq!(names, ["Turmeric"]);
    }

    #[test]
    fn test_group_spreads_across_categories() {
        let catalog = catalog();
        let groups = catalog.group(&CatalogQuery::new());

        assert_eq!(groups[&Category::Immunity].len(), 1);
        assert_eq!(groups[&Category::SkinCare][0].name, "Turmeric");
        assert_eq!(groups[&Category::Medicinal][0].name, "Aloe Vera");
        assert!(!groups.contains_key(&Category::Rare));
        assert_eq!(groups.keys().next(), Some(&Category::DigestiveHealth));
    }

    #[test]
    fn test_group_with_selected_category_keeps_empty_group() {
        let catalog = catalog();
        let groups = catalog.group(&CatalogQuery::new().category(Category::Rare));
        assert_eq!(groups.len(), 1);
        assert!(groups[&Category::Rare].is_empty());
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("digestive-health".parse::<Category>().unwrap(), Category::DigestiveHealth);
        assert_eq!("Stress & Anxiety".parse::<Category>().unwrap(), Category::StressAnxiety);
        assert!("succulents".parse::<Category>().is_err());
    }

    #[test]
    fn test_catalog_from_json() {
        let catalog = Catalog::from_json(
            r#"[{"id": "neem", "name": "Neem", "category": ["Skin Care & Beauty"]}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.herbs()[0].categories, vec![Category::SkinCare]);
    }
}
