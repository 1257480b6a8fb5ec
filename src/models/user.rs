use diesel::prelude::*;

/// User record as stored by the persistence layer.
///
/// Derives Queryable/Selectable for reads and Insertable/AsChangeset so the
/// whole record can be upserted by id. The primary key is never part of the
/// changeset, which keeps `id` immutable once a row exists.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub elo: Option<i32>,
    pub tier: Option<String>,
    pub total_matches: Option<i32>,
    pub wins: Option<i32>,
    pub avatar: Option<String>,
}

/// Partial update for a stored user.
///
/// `None` means "leave the stored value as it is". There is no way to clear a
/// field through a patch; `id` and `email` are not patchable at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub elo: Option<i32>,
    pub tier: Option<String>,
    pub total_matches: Option<i32>,
    pub wins: Option<i32>,
    pub avatar: Option<String>,
}

impl UserPatch {
    /// Returns true when the patch would not change anything.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.elo.is_none()
            && self.tier.is_none()
            && self.total_matches.is_none()
            && self.wins.is_none()
            && self.avatar.is_none()
    }
}

impl User {
    /// Overwrites every field that is present in `patch`.
    pub fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(elo) = patch.elo {
            self.elo = Some(elo);
        }
        if let Some(tier) = patch.tier {
            self.tier = Some(tier);
        }
        if let Some(total_matches) = patch.total_matches {
            self.total_matches = Some(total_matches);
        }
        if let Some(wins) = patch.wins {
            self.wins = Some(wins);
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }
    }
}
