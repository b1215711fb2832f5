use serde::{Deserialize, Serialize};

/// Account profile as served by `GET profile/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub mobile_number: String,
    /// Reference to the stored picture (URL or path), if any.
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Draft for `PATCH profile/update/`.
///
/// Only fields that are set are transmitted; the server keeps everything
/// else untouched (partial-update semantics).
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub gender: Option<String>,
    pub mobile_number: Option<String>,
    /// New picture as (filename, bytes), uploaded as a file part.
    pub profile_picture: Option<(String, Vec<u8>)>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.company_name.is_none()
            && self.gender.is_none()
            && self.mobile_number.is_none()
            && self.profile_picture.is_none()
    }

    /// The set text fields as multipart (name, value) pairs.
    pub(crate) fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(v) = &self.first_name {
            fields.push(("first_name", v.clone()));
        }
        if let Some(v) = &self.last_name {
            fields.push(("last_name", v.clone()));
        }
        if let Some(v) = &self.company_name {
            fields.push(("company_name", v.clone()));
        }
        if let Some(v) = &self.gender {
            fields.push(("gender", v.clone()));
        }
        if let Some(v) = &self.mobile_number {
            fields.push(("mobile_number", v.clone()));
        }
        fields
    }
}
