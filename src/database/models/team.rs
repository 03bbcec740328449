use serde::{Deserialize, Serialize};

use super::macros::string_enum;

string_enum! {
    /// A requester's standing on a team, as reported by the authorization provider.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum TeamRole {
        Owner => "owner",
        Manager => "manager",
        Member => "member",
        None => "none",
    }
}

impl TeamRole {
    /// Owners and managers may act on behalf of the whole roster.
    pub fn is_manager(&self) -> bool {
        matches!(self, TeamRole::Owner | TeamRole::Manager)
    }

    /// Any approved member of the team, regardless of rank.
    pub fn is_approved(&self) -> bool {
        !matches!(self, TeamRole::None)
    }
}

impl Default for TeamRole {
    fn default() -> Self {
        TeamRole::None
    }
}

string_enum! {
    /// Which of the schedule's two teams an attendance row belongs to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum TeamType {
        Host => "host",
        Invited => "invited",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_roles() {
        assert!(TeamRole::Owner.is_manager());
        assert!(TeamRole::Manager.is_manager());
        assert!(!TeamRole::Member.is_manager());
        assert!(TeamRole::Member.is_approved());
        assert!(!TeamRole::None.is_approved());
    }

    #[test]
    fn team_type_parses_case_insensitively() {
        assert_eq!("HOST".parse::<TeamType>(), Ok(TeamType::Host));
        assert_eq!("invited".parse::<TeamType>(), Ok(TeamType::Invited));
        assert!("guest".parse::<TeamType>().is_err());
    }
}
