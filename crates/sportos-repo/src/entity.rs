//! Identity and table binding shared by every persisted record.

use std::fmt;

/// A persisted database record.
///
/// Implementors supply their primary-key value and the stable table
/// discriminator used by the audit log.
pub trait Entity {
    /// Primary-key value of this record.
    fn id(&self) -> &str;

    /// Table discriminator recorded against audit entries.
    fn kind(&self) -> EntityKind;
}

/// Closed set of persisted table names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Player,
    Coach,
    Place,
    Event,
    Match,
    Practice,
    Team,
    UserPost,
    ApiJournal,
    Audit,
}

impl EntityKind {
    /// The table name, also the `entity` column value in the audit log.
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Player => "player",
            Self::Coach => "coach",
            Self::Place => "place",
            Self::Event => "event",
            Self::Match => "match",
            Self::Practice => "practice",
            Self::Team => "team",
            Self::UserPost => "user_post",
            Self::ApiJournal => "api_journal",
            Self::Audit => "audit",
        }
    }

    /// Inverse of [`EntityKind::table_name`], for values read back from rows.
    pub fn from_table_name(name: &str) -> Option<Self> {
        match name {
            "user" => Some(Self::User),
            "player" => Some(Self::Player),
            "coach" => Some(Self::Coach),
            "place" => Some(Self::Place),
            "event" => Some(Self::Event),
            "match" => Some(Self::Match),
            "practice" => Some(Self::Practice),
            "team" => Some(Self::Team),
            "user_post" => Some(Self::UserPost),
            "api_journal" => Some(Self::ApiJournal),
            "audit" => Some(Self::Audit),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}
