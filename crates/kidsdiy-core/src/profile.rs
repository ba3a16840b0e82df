// Partial profile update. Only fields that are set reach the PATCH body.

use serde::Serialize;

use kidsdiy_api::models::ProfileRecord;

/// Body of `PATCH /api/account/user-profile/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<u64>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Drop fields that would not change `current`.
    #[must_use]
    pub fn diff_against(self, current: &ProfileRecord) -> Self {
        fn keep<T: PartialEq>(new: Option<T>, old: Option<&T>) -> Option<T> {
            new.filter(|n| Some(n) != old)
        }

        Self {
            first_name: keep(self.first_name, Some(&current.first_name)),
            last_name: keep(self.last_name, Some(&current.last_name)),
            email: keep(self.email, current.email.as_ref()),
            biography: keep(self.biography, current.biography.as_ref()),
            phone_number: keep(self.phone_number, current.phone_number.as_ref()),
            date_of_birth: keep(self.date_of_birth, current.date_of_birth.as_ref()),
            organization: keep(self.organization, current.organization.as_ref()),
            role: keep(self.role, current.role.as_ref()),
            interests: keep(self.interests, Some(&current.interests)),
        }
    }
}
