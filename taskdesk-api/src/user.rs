use crate::{uuid, Uuid};

id_type!(UserId);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl User {
    /// Directory of known users; the REST collaborator has no user endpoint
    pub fn directory() -> Vec<User> {
        [
            (uuid!("00000000-0000-0000-0000-000000000001"), "Alice", "alice@example.com"),
            (uuid!("00000000-0000-0000-0000-000000000002"), "Bob", "bob@example.com"),
            (uuid!("00000000-0000-0000-0000-000000000003"), "Charlie", "charlie@example.com"),
        ]
        .into_iter()
        .map(|(id, name, email): (Uuid, &str, &str)| User {
            id: UserId(id),
            name: String::from(name),
            email: String::from(email),
            avatar: None,
        })
        .collect()
    }
}
