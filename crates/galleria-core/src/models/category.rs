use serde::{Deserialize, Serialize};

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// A gallery category, as served by the category-lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Category {
    pub id: String,
    pub category_name: String,
}

/// The category an operator picked for a batch commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySelection {
    pub id: String,
    pub name: String,
}

impl From<&Category> for CategorySelection {
    fn from(c: &Category) -> Self {
        CategorySelection {
            id: c.id.clone(),
            name: c.category_name.clone(),
        }
    }
}
