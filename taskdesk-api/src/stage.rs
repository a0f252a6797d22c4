use crate::Uuid;

id_type!(StageId);

/// Palette offered when creating or editing a stage
pub const STAGE_COLORS: [&str; 12] = [
    "#f87171", "#fbbf24", "#34d399", "#60a5fa", "#a78bfa", "#f472b6", "#facc15", "#38bdf8",
    "#4ade80", "#f97316", "#a3e635", "#f43f5e",
];

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, alias = "sortOder")]
    pub sort_order: i64,
    #[serde(default)]
    pub project_id: Option<Uuid>,
}

impl Stage {
    /// Sorts `stages` the way stage pickers show them
    pub fn sort(stages: &mut [Stage]) {
        stages.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
    }

    /// Sort order a stage appended after `stages` gets
    pub fn next_sort_order(stages: &[Stage]) -> i64 {
        stages.iter().map(|s| s.sort_order).max().unwrap_or(0) + 1
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStage {
    pub name: String,
    pub color: String,
    pub project_id: Uuid,
    pub sort_order: i64,
}
