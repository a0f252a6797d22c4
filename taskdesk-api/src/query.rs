use std::{fmt, str::FromStr};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub enum SortDirection {
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn toggled(self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<SortDirection, ()> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(())
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Sort {
    pub by: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(by: impl Into<String>, direction: SortDirection) -> Sort {
        Sort {
            by: by.into(),
            direction,
        }
    }
}

/// Paging and ordering of a list request, with a zero-based page index
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ListQuery {
    pub page: usize,
    pub size: usize,
    pub sort: Option<Sort>,
}

impl ListQuery {
    pub fn new(page: usize, size: usize) -> ListQuery {
        ListQuery {
            page,
            size,
            sort: None,
        }
    }

    pub fn sorted(mut self, sort: Sort) -> ListQuery {
        self.sort = Some(sort);
        self
    }

    /// Query-string form: `page`, `size`, `sortBy`, `direction`
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut res = vec![
            (String::from("page"), self.page.to_string()),
            (String::from("size"), self.size.to_string()),
        ];
        if let Some(sort) = &self.sort {
            res.push((String::from("sortBy"), sort.by.clone()));
            res.push((String::from("direction"), sort.direction.to_string()));
        }
        res
    }

    /// In-body form: `page`, `limit`, `sortBy`, `sortDirection`, merged into `body`
    pub fn merge_into(&self, body: &mut serde_json::Map<String, serde_json::Value>) {
        body.insert(String::from("page"), self.page.into());
        body.insert(String::from("limit"), self.size.into());
        if let Some(sort) = &self.sort {
            body.insert(String::from("sortBy"), sort.by.clone().into());
            body.insert(
                String::from("sortDirection"),
                sort.direction.as_str().into(),
            );
        }
    }
}
