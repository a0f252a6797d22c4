use crate::{time, CatalogFilter, Time};

id_type!(PriorityId);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Priority {
    pub id: PriorityId,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,

    /// Display order, smallest first; some server versions spell it `sortOder`
    #[serde(default, alias = "sortOder")]
    pub sort_order: i64,

    #[serde(default, with = "time::option")]
    pub created_at: Option<Time>,
}

impl Priority {
    pub fn matches(&self, filter: &CatalogFilter) -> bool {
        filter.matches(&self.name, &self.color, self.created_at)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPriority {
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
}

impl From<&Priority> for NewPriority {
    fn from(p: &Priority) -> NewPriority {
        NewPriority {
            name: p.name.clone(),
            color: p.color.clone(),
            description: p.description.clone(),
            sort_order: p.sort_order,
        }
    }
}
