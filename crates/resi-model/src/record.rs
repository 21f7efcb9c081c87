//! Typed resident record produced by row validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::field::TargetField;

/// Canonical gender buckets stored by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "Nam")]
    Male,
    #[serde(rename = "Nữ")]
    Female,
    #[serde(rename = "Khác")]
    Other,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Nam",
            Gender::Female => "Nữ",
            Gender::Other => "Khác",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Registry workflow status of a resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidentStatus {
    #[default]
    Active,
    PendingApproval,
}

impl ResidentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ResidentStatus::Active => "active",
            ResidentStatus::PendingApproval => "pending_approval",
        }
    }
}

impl FromStr for ResidentStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(ResidentStatus::Active),
            "pending_approval" => Ok(ResidentStatus::PendingApproval),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

/// A resident row ready for persistence.
///
/// Field names are the residents table columns. Absent values are omitted
/// when serialized, so the insert payload only carries known columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_card: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hometown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethnicity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub religion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ward: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_party_member: Option<bool>,
    /// `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_join_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_head_of_household: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResidentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ResidentRecord {
    /// Whether the record carries a value for `field`.
    pub fn has_value(&self, field: TargetField) -> bool {
        match field {
            TargetField::FullName => self.full_name.is_some(),
            TargetField::PhoneNumber => self.phone_number.is_some(),
            TargetField::Address => self.address.is_some(),
            TargetField::Dob => self.dob.is_some(),
            TargetField::Gender => self.gender.is_some(),
            TargetField::Email => self.email.is_some(),
            TargetField::IdentityCard => self.identity_card.is_some(),
            TargetField::Education => self.education.is_some(),
            TargetField::Hometown => self.hometown.is_some(),
            TargetField::Profession => self.profession.is_some(),
            TargetField::Ethnicity => self.ethnicity.is_some(),
            TargetField::Religion => self.religion.is_some(),
            TargetField::Unit => self.unit.is_some(),
            TargetField::Province => self.province.is_some(),
            TargetField::Ward => self.ward.is_some(),
            TargetField::IsPartyMember => self.is_party_member.is_some(),
            TargetField::PartyJoinDate => self.party_join_date.is_some(),
            TargetField::IsHeadOfHousehold => self.is_head_of_household.is_some(),
            TargetField::SpecialStatus => self.special_status.is_some(),
            TargetField::SpecialNotes => self.special_notes.is_some(),
        }
    }

    /// Slot for a free-text field, `None` for typed fields.
    pub fn text_slot(&mut self, field: TargetField) -> Option<&mut Option<String>> {
        match field {
            TargetField::FullName => Some(&mut self.full_name),
            TargetField::PhoneNumber => Some(&mut self.phone_number),
            TargetField::Address => Some(&mut self.address),
            TargetField::Dob => Some(&mut self.dob),
            TargetField::Email => Some(&mut self.email),
            TargetField::IdentityCard => Some(&mut self.identity_card),
            TargetField::Education => Some(&mut self.education),
            TargetField::Hometown => Some(&mut self.hometown),
            TargetField::Profession => Some(&mut self.profession),
            TargetField::Ethnicity => Some(&mut self.ethnicity),
            TargetField::Religion => Some(&mut self.religion),
            TargetField::Unit => Some(&mut self.unit),
            TargetField::Province => Some(&mut self.province),
            TargetField::Ward => Some(&mut self.ward),
            TargetField::PartyJoinDate => Some(&mut self.party_join_date),
            TargetField::SpecialStatus => Some(&mut self.special_status),
            TargetField::SpecialNotes => Some(&mut self.special_notes),
            TargetField::Gender | TargetField::IsPartyMember | TargetField::IsHeadOfHousehold => {
                None
            }
        }
    }

    /// Slot for a boolean field, `None` for every other field.
    pub fn flag_slot(&mut self, field: TargetField) -> Option<&mut Option<bool>> {
        match field {
            TargetField::IsPartyMember => Some(&mut self.is_party_member),
            TargetField::IsHeadOfHousehold => Some(&mut self.is_head_of_household),
            _ => None,
        }
    }

    /// Name used in operator-facing reports.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or("(unnamed)")
    }
}
