use crate::{time, CatalogFilter, Time};

id_type!(LabelId);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: LabelId,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "time::option")]
    pub created_at: Option<Time>,
}

impl Label {
    pub fn matches(&self, filter: &CatalogFilter) -> bool {
        filter.matches(&self.name, &self.color, self.created_at)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLabel {
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Label> for NewLabel {
    fn from(l: &Label) -> NewLabel {
        NewLabel {
            name: l.name.clone(),
            color: l.color.clone(),
            description: l.description.clone(),
        }
    }
}
