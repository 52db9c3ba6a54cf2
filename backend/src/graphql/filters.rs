//! GraphQL ordering inputs for the link feed

use async_graphql::{Enum, InputObject};

use crate::db::{LinkOrder, LinkSortColumn};

/// Sort direction
#[derive(Enum, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Sort {
    /// Ascending order (A-Z, oldest-newest)
    #[default]
    Asc,
    /// Descending order (Z-A, newest-oldest)
    Desc,
}

/// Ordering for `feed`. Terms apply in the order createdAt, description, url;
/// creation order breaks any remaining ties.
#[derive(InputObject, Default, Clone, Debug)]
pub struct LinkOrderByInput {
    pub created_at: Option<Sort>,
    pub description: Option<Sort>,
    pub url: Option<Sort>,
}

impl LinkOrderByInput {
    /// Convert to store ordering terms
    pub fn to_order(&self) -> Vec<LinkOrder> {
        [
            (LinkSortColumn::CreatedAt, self.created_at),
            (LinkSortColumn::Description, self.description),
            (LinkSortColumn::Url, self.url),
        ]
        .into_iter()
        .filter_map(|(column, sort)| {
            sort.map(|sort| LinkOrder {
                column,
                descending: sort == Sort::Desc,
            })
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_order() {
        assert!(LinkOrderByInput::default().to_order().is_empty());
    }

    #[test]
    fn test_order_terms() {
        let input = LinkOrderByInput {
            created_at: None,
            description: Some(Sort::Desc),
            url: Some(Sort::Asc),
        };
        assert_eq!(
            input.to_order(),
            vec![
                LinkOrder {
                    column: LinkSortColumn::Description,
                    descending: true,
                },
                LinkOrder {
                    column: LinkSortColumn::Url,
                    descending: false,
                },
            ]
        );
    }
}
