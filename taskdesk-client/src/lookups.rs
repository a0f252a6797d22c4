use crate::{
    api::{Error, Label, Priority, Stage, User, Uuid},
    Client, Transport,
};

/// Catalogs used to show names instead of ids
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lookups {
    pub priorities: Vec<Priority>,
    pub stages: Vec<Stage>,
    pub labels: Vec<Label>,
    pub users: Vec<User>,
}

/// Name of the entry of `items` whose id is `raw`
fn name_in<'a, T>(
    items: &'a [T],
    raw: &str,
    id: impl Fn(&T) -> Uuid,
    name: impl Fn(&'a T) -> &'a str,
) -> Option<&'a str> {
    let wanted = Uuid::try_parse(raw.trim()).ok()?;
    items.iter().find(|i| id(*i) == wanted).map(name)
}

impl Lookups {
    pub fn new(
        priorities: Vec<Priority>,
        mut stages: Vec<Stage>,
        labels: Vec<Label>,
        users: Vec<User>,
    ) -> Lookups {
        Stage::sort(&mut stages);
        Lookups {
            priorities,
            stages,
            labels,
            users,
        }
    }

    pub async fn load<T: Transport>(client: &Client<T>, project: Uuid) -> Result<Lookups, Error> {
        let priorities = client.all::<Priority>().await?;
        let stages = client.stages_by_project(project).await?;
        let labels = client.all::<Label>().await?;
        Ok(Lookups::new(priorities, stages, labels, User::directory()))
    }

    pub fn priority_name(&self, raw: &str) -> Option<&str> {
        name_in(&self.priorities, raw, |p| p.id.0, |p| p.name.as_str())
    }

    pub fn stage_name(&self, raw: &str) -> Option<&str> {
        name_in(&self.stages, raw, |s| s.id.0, |s| s.name.as_str())
    }

    pub fn label_name(&self, raw: &str) -> Option<&str> {
        name_in(&self.labels, raw, |l| l.id.0, |l| l.name.as_str())
    }

    pub fn user_name(&self, raw: &str) -> Option<&str> {
        name_in(&self.users, raw, |u| u.id.0, |u| u.name.as_str())
    }

    pub fn user_display(&self, raw: &str) -> String {
        self.user_name(raw).unwrap_or(raw).to_string()
    }

    pub fn priority(&self, id: &Uuid) -> Option<&Priority> {
        self.priorities.iter().find(|p| p.id.0 == *id)
    }

    pub fn stage(&self, id: &Uuid) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id.0 == *id)
    }

    pub fn next_stage_order(&self) -> i64 {
        Stage::next_sort_order(&self.stages)
    }
}
