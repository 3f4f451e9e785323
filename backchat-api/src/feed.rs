/// Messages delivered over a change feed scoped to one subject.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum FeedMessage {
    Pong,

    /// A comment row of the subscribed subject was inserted, updated or
    /// deleted. No row contents are carried; consumers re-read the list.
    Changed(ChangeKind),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}
