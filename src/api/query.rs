use super::types::CategoryFilter;

/// Parameters of the package list request. Also the cache key of the list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PackageQuery {
    pub search: String,
    pub category: CategoryFilter,
}

impl PackageQuery {
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    /// Query-string parameters. An empty search and the "all" category are
    /// left out entirely.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.search.is_empty() {
            params.push(("search", self.search.clone()));
        }
        if let Some(category) = self.category.category() {
            params.push(("category", category.as_str().to_string()));
        }
        params
    }
}

impl std::fmt::Display for PackageQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "search={:?} category={}", self.search, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Category;

    #[test]
    fn test_params_search_with_all_categories() {
        let query = PackageQuery::new("auth", CategoryFilter::All);
        assert_eq!(query.params(), vec![("search", "auth".to_string())]);
    }

    #[test]
    fn test_params_category_only() {
        let query = PackageQuery::new("", CategoryFilter::Only(Category::Frontend));
        assert_eq!(query.params(), vec![("category", "frontend".to_string())]);
    }

    #[test]
    fn test_params_both() {
        let query = PackageQuery::new("cli", CategoryFilter::Only(Category::Utility));
        assert_eq!(
            query.params(),
            vec![
                ("search", "cli".to_string()),
                ("category", "utility".to_string())
            ]
        );
    }

    #[test]
    fn test_params_default_is_empty() {
        assert!(PackageQuery::default().params().is_empty());
    }
}
