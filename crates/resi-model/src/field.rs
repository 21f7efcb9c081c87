//! Target schema for resident records.
//!
//! The schema is a process-wide constant. Its declaration order is the
//! stable enumeration order used everywhere a field list is walked,
//! including tie-breaking in the rule-based mapper.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// How a field's raw cell value is parsed and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Person name, required, casing normalized.
    Name,
    /// Phone number, digits only, at least ten digits.
    Phone,
    /// Postal address, required, casing normalized.
    Address,
    /// Calendar date, unparseable input is an error.
    Date,
    /// One of the three gender buckets.
    Gender,
    /// Optional email, malformed input is a warning.
    Email,
    /// Optional identity card number, odd lengths are a warning.
    IdentityCard,
    /// Trimmed free text.
    Text,
    /// Truthy/falsy token, never an error.
    Flag,
    /// Calendar date where unparseable input is only a warning.
    OptionalDate,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Name => "name",
            FieldKind::Phone => "phone",
            FieldKind::Address => "address",
            FieldKind::Date => "date",
            FieldKind::Gender => "gender",
            FieldKind::Email => "email",
            FieldKind::IdentityCard => "identity card",
            FieldKind::Text => "text",
            FieldKind::Flag => "flag",
            FieldKind::OptionalDate => "optional date",
        }
    }
}

/// A destination field of the resident entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetField {
    FullName,
    PhoneNumber,
    Address,
    Dob,
    Gender,
    Email,
    IdentityCard,
    Education,
    Hometown,
    Profession,
    Ethnicity,
    Religion,
    Unit,
    Province,
    Ward,
    IsPartyMember,
    PartyJoinDate,
    IsHeadOfHousehold,
    SpecialStatus,
    SpecialNotes,
}

/// Static description of one schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub field: TargetField,
    /// camelCase identifier exchanged with reviewers and the assist service.
    pub id: &'static str,
    /// Column name in the residents table.
    pub column: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    /// Display label shown to operators.
    pub description: &'static str,
    /// Canonical header spellings used for exact, substring and similarity matching.
    pub examples: &'static [&'static str],
    /// Space-free keyword fragments used for containment matching.
    pub keywords: &'static [&'static str],
}

#[allow(clippy::too_many_arguments)]
const fn spec(
    field: TargetField,
    id: &'static str,
    column: &'static str,
    required: bool,
    kind: FieldKind,
    description: &'static str,
    examples: &'static [&'static str],
    keywords: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        field,
        id,
        column,
        required,
        kind,
        description,
        examples,
        keywords,
    }
}

/// The resident schema in enumeration order.
pub static SCHEMA: [FieldSpec; 20] = [
    spec(
        TargetField::FullName,
        "fullName",
        "full_name",
        true,
        FieldKind::Name,
        "Họ và tên đầy đủ",
        &["Họ tên", "Họ và tên", "Tên", "Tên đầy đủ", "Full name", "Name"],
        &["hoten", "hovaten", "fullname", "name"],
    ),
    spec(
        TargetField::PhoneNumber,
        "phoneNumber",
        "phone_number",
        true,
        FieldKind::Phone,
        "Số điện thoại",
        &[
            "Số điện thoại",
            "SĐT",
            "Điện thoại",
            "Di động",
            "Phone",
            "Phone number",
            "Mobile",
            "Tel",
        ],
        &["sdt", "dienthoai", "didong", "phone", "mobile", "tel"],
    ),
    spec(
        TargetField::Address,
        "address",
        "address",
        true,
        FieldKind::Address,
        "Địa chỉ thường trú",
        &[
            "Địa chỉ",
            "Địa chỉ thường trú",
            "Nơi ở",
            "Chỗ ở hiện tại",
            "Address",
        ],
        &["diachi", "noio", "thuongtru", "address"],
    ),
    spec(
        TargetField::Dob,
        "dob",
        "dob",
        true,
        FieldKind::Date,
        "Ngày sinh",
        &[
            "Ngày sinh",
            "Ngày tháng năm sinh",
            "Năm sinh",
            "Date of birth",
            "DOB",
            "Birthday",
        ],
        &["ngaysinh", "namsinh", "sinhnhat", "birth", "dob"],
    ),
    spec(
        TargetField::Gender,
        "gender",
        "gender",
        true,
        FieldKind::Gender,
        "Giới tính (Nam/Nữ/Khác)",
        &["Giới tính", "Phái", "Gender", "Sex"],
        &["gioitinh", "gender", "phai", "sex"],
    ),
    spec(
        TargetField::Email,
        "email",
        "email",
        false,
        FieldKind::Email,
        "Địa chỉ email",
        &["Email", "E-mail", "Thư điện tử"],
        &["email", "thudientu", "mail"],
    ),
    spec(
        TargetField::IdentityCard,
        "identityCard",
        "identity_card",
        false,
        FieldKind::IdentityCard,
        "Số CMND/CCCD",
        &[
            "CCCD",
            "CMND",
            "CMND/CCCD",
            "Căn cước",
            "Căn cước công dân",
            "Identity card",
            "ID card",
        ],
        &["cccd", "cmnd", "cancuoc", "identity", "idcard"],
    ),
    spec(
        TargetField::Education,
        "education",
        "education",
        false,
        FieldKind::Text,
        "Trình độ học vấn",
        &["Học vấn", "Trình độ học vấn", "Trình độ", "Education"],
        &["hocvan", "trinhdo", "bangcap", "education"],
    ),
    spec(
        TargetField::Hometown,
        "hometown",
        "hometown",
        false,
        FieldKind::Text,
        "Quê quán",
        &["Quê quán", "Nguyên quán", "Hometown"],
        &["quequan", "nguyenquan", "hometown", "que"],
    ),
    spec(
        TargetField::Profession,
        "profession",
        "profession",
        false,
        FieldKind::Text,
        "Nghề nghiệp",
        &["Nghề nghiệp", "Công việc", "Occupation", "Profession", "Job"],
        &["nghenghiep", "congviec", "occupation", "profession", "nghe", "job"],
    ),
    spec(
        TargetField::Ethnicity,
        "ethnicity",
        "ethnicity",
        false,
        FieldKind::Text,
        "Dân tộc",
        &["Dân tộc", "Ethnicity"],
        &["dantoc", "ethnic"],
    ),
    spec(
        TargetField::Religion,
        "religion",
        "religion",
        false,
        FieldKind::Text,
        "Tôn giáo",
        &["Tôn giáo", "Religion"],
        &["tongiao", "religion"],
    ),
    spec(
        TargetField::Unit,
        "unit",
        "unit",
        false,
        FieldKind::Text,
        "Tổ dân phố",
        &["Tổ dân phố", "Khu phố", "Unit"],
        &["todanpho", "khupho", "unit", "to", "kp"],
    ),
    spec(
        TargetField::Province,
        "province",
        "province",
        false,
        FieldKind::Text,
        "Tỉnh/Thành phố",
        &["Tỉnh", "Thành phố", "Tỉnh/Thành phố", "Province", "City"],
        &["thanhpho", "province", "tinh", "city"],
    ),
    spec(
        TargetField::Ward,
        "ward",
        "ward",
        false,
        FieldKind::Text,
        "Phường/Xã",
        &["Phường", "Phường/Xã", "Ward"],
        &["phuong", "ward", "xa"],
    ),
    spec(
        TargetField::IsPartyMember,
        "isPartyMember",
        "is_party_member",
        false,
        FieldKind::Flag,
        "Là đảng viên",
        &["Đảng viên", "Là đảng viên", "Party member"],
        &["dangvien", "partymember"],
    ),
    spec(
        TargetField::PartyJoinDate,
        "partyJoinDate",
        "party_join_date",
        false,
        FieldKind::OptionalDate,
        "Ngày vào Đảng",
        &["Ngày vào Đảng", "Ngày kết nạp Đảng", "Party join date"],
        &["vaodang", "ketnap", "joindate"],
    ),
    spec(
        TargetField::IsHeadOfHousehold,
        "isHeadOfHousehold",
        "is_head_of_household",
        false,
        FieldKind::Flag,
        "Là chủ hộ",
        &["Chủ hộ", "Là chủ hộ", "Head of household"],
        &["chuho", "household"],
    ),
    spec(
        TargetField::SpecialStatus,
        "specialStatus",
        "special_status",
        false,
        FieldKind::Text,
        "Diện đặc biệt",
        &[
            "Đặc điểm",
            "Diện đặc biệt",
            "Tình trạng đặc biệt",
            "Special status",
        ],
        &["dacdiem", "dacbiet", "special"],
    ),
    spec(
        TargetField::SpecialNotes,
        "specialNotes",
        "special_notes",
        false,
        FieldKind::Text,
        "Ghi chú",
        &["Ghi chú", "Ghi chú đặc biệt", "Notes"],
        &["ghichu", "note"],
    ),
];

impl TargetField {
    /// Every field in enumeration order.
    pub const ALL: [TargetField; 20] = [
        TargetField::FullName,
        TargetField::PhoneNumber,
        TargetField::Address,
        TargetField::Dob,
        TargetField::Gender,
        TargetField::Email,
        TargetField::IdentityCard,
        TargetField::Education,
        TargetField::Hometown,
        TargetField::Profession,
        TargetField::Ethnicity,
        TargetField::Religion,
        TargetField::Unit,
        TargetField::Province,
        TargetField::Ward,
        TargetField::IsPartyMember,
        TargetField::PartyJoinDate,
        TargetField::IsHeadOfHousehold,
        TargetField::SpecialStatus,
        TargetField::SpecialNotes,
    ];

    pub fn spec(self) -> &'static FieldSpec {
        &SCHEMA[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        self.spec().id
    }

    pub fn column(self) -> &'static str {
        self.spec().column
    }

    pub fn is_required(self) -> bool {
        self.spec().required
    }

    pub fn kind(self) -> FieldKind {
        self.spec().kind
    }

    pub fn description(self) -> &'static str {
        self.spec().description
    }

    /// Upper-cased first example, as printed in the import template.
    pub fn template_header(self) -> String {
        self.spec()
            .examples
            .first()
            .map_or_else(|| self.as_str().to_string(), |example| example.to_uppercase())
    }

    /// Required fields in enumeration order.
    pub fn required() -> impl Iterator<Item = TargetField> {
        Self::ALL.into_iter().filter(|field| field.is_required())
    }
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetField {
    type Err = ModelError;

    /// Accepts the camelCase identifier or the database column name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        SCHEMA
            .iter()
            .find(|spec| spec.id == needle || spec.column == needle)
            .map(|spec| spec.field)
            .ok_or_else(|| ModelError::UnknownField(needle.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_order_matches_enum_discriminants() {
        for (index, spec) in SCHEMA.iter().enumerate() {
            assert_eq!(spec.field as usize, index, "{} out of order", spec.id);
            assert_eq!(TargetField::ALL[index], spec.field);
        }
    }

    #[test]
    fn required_fields_are_the_five_core_fields() {
        let required: Vec<_> = TargetField::required().collect();
        assert_eq!(
            required,
            vec![
                TargetField::FullName,
                TargetField::PhoneNumber,
                TargetField::Address,
                TargetField::Dob,
                TargetField::Gender,
            ]
        );
    }

    #[test]
    fn parses_identifier_and_column() {
        assert_eq!(
            "identityCard".parse::<TargetField>().unwrap(),
            TargetField::IdentityCard
        );
        assert_eq!(
            "identity_card".parse::<TargetField>().unwrap(),
            TargetField::IdentityCard
        );
        assert!("householdId".parse::<TargetField>().is_err());
    }

    #[test]
    fn serde_uses_camel_case_identifier() {
        for field in TargetField::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.as_str()));
        }
    }
}
