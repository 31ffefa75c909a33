use serde::Deserialize;

/// How a list in the final field of a top-level struct or tuple is laid out.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListLengthPolicy {
    /// Every nested list carries a 4-byte item count.
    #[default]
    Prefixed,
    /// The final list field has no count and is read to the end of the argument.
    Greedy,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodecOptions {
    pub trailing_list: ListLengthPolicy,
}

impl CodecOptions {
    pub fn greedy_trailing_list(&self) -> bool {
        self.trailing_list == ListLengthPolicy::Greedy
    }
}
