use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    /// Only admins may change a class routine.
    pub fn can_edit_routine(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Posting, editing and deleting announcements.
    pub fn can_post_note(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can_use_notepad(self) -> bool {
        matches!(self, Role::Teacher | Role::Admin)
    }

    /// Students are pinned to their own class.
    pub fn can_select_class(self) -> bool {
        matches!(self, Role::Teacher | Role::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: String,
    pub role: Role,
}
