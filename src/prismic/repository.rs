use serde::Deserialize;

/// Root of the content API, used to find the ref to query against.
#[derive(Deserialize, Debug, Clone)]
pub struct Repository {
    #[serde(default)]
    pub refs: Vec<Ref>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Ref {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub is_master_ref: bool,
}

impl Repository {
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}
