//! Import template: canonical header row plus filled-in sample residents.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use resi_model::TargetField;
use thiserror::Error;

/// Columns of the template, in sheet order.
pub const TEMPLATE_FIELDS: [TargetField; 16] = [
    TargetField::FullName,
    TargetField::Dob,
    TargetField::Gender,
    TargetField::IdentityCard,
    TargetField::Address,
    TargetField::PhoneNumber,
    TargetField::Email,
    TargetField::Unit,
    TargetField::Profession,
    TargetField::Education,
    TargetField::Hometown,
    TargetField::Ethnicity,
    TargetField::Religion,
    TargetField::IsPartyMember,
    TargetField::PartyJoinDate,
    TargetField::SpecialStatus,
];

const SAMPLE_ADDRESS: &str = "40/03 Khu phố 3, Phường An Phú, Thành phố Hồ Chí Minh";

/// Example residents; operators delete these rows before filling in their own.
pub const SAMPLE_ROWS: [[&str; 16]; 5] = [
    [
        "NGUYỄN VĂN A", "15/05/1985", "Nam", "001085012345", SAMPLE_ADDRESS, "0901234567",
        "nguyenvana@email.com", "1", "Kỹ sư", "Đại học", "Hà Nội", "Kinh", "Không", "Có",
        "01/01/2010", "",
    ],
    [
        "TRƯƠNG THỊ B", "20/08/1990", "Nữ", "001090054321", SAMPLE_ADDRESS, "0912345678",
        "truongthib@email.com", "1", "Giáo viên", "Đại học", "TP.HCM", "Kinh", "Phật giáo",
        "Không", "", "",
    ],
    [
        "NGUYỄN VĂN C", "10/03/1978", "Nam", "001078098765", SAMPLE_ADDRESS, "0923456789",
        "nguyenvanc@email.com", "2", "Bác sĩ", "Thạc sĩ", "Đà Nẵng", "Kinh", "Không", "Có",
        "15/06/2005", "",
    ],
    [
        "LÊ THỊ D", "25/12/1995", "Nữ", "001095011111", SAMPLE_ADDRESS, "0934567890",
        "lethid@email.com", "2", "Nhân viên văn phòng", "Cao đẳng", "Cần Thơ", "Kinh",
        "Công giáo", "Không", "", "Gia đình chính sách",
    ],
    [
        "PHẠM VĂN E", "05/07/1982", "Nam", "001082022222", SAMPLE_ADDRESS, "0945678901",
        "phamvane@email.com", "3", "Kinh doanh", "Đại học", "Hải Phòng", "Kinh", "Không",
        "Không", "", "",
    ],
];

// Lets spreadsheet programs detect UTF-8 when opening the file.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TemplateError {
    /// The template is only produced as CSV.
    #[error("template must be written to a .csv file, got {path}")]
    UnsupportedExtension { path: PathBuf },

    #[error("failed to write template {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode template {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Header row derived from the schema.
pub fn template_headers() -> Vec<String> {
    TEMPLATE_FIELDS
        .iter()
        .map(|field| field.template_header())
        .collect()
}

/// Write the template CSV to `path`; returns the number of sample rows.
pub fn write_template(path: &Path) -> Result<usize, TemplateError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(TemplateError::UnsupportedExtension {
            path: path.to_path_buf(),
        });
    }

    let io_error = |source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_error = |source| TemplateError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(io_error)?;
    file.write_all(UTF8_BOM).map_err(io_error)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(template_headers()).map_err(csv_error)?;
    for row in &SAMPLE_ROWS {
        writer.write_record(row).map_err(csv_error)?;
    }
    writer.flush().map_err(io_error)?;

    tracing::info!(path = %path.display(), rows = SAMPLE_ROWS.len(), "wrote import template");
    Ok(SAMPLE_ROWS.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_follow_the_template_layout() {
        let headers = template_headers();
        assert_eq!(headers.len(), 16);
        assert_eq!(headers[0], "HỌ TÊN");
        assert_eq!(headers[5], "SỐ ĐIỆN THOẠI");
        assert_eq!(headers[15], "ĐẶC ĐIỂM");
    }

    #[test]
    fn rejects_non_csv_targets() {
        let dir = tempfile::tempdir().unwrap();
        let error = write_template(&dir.path().join("mau.xlsx")).unwrap_err();
        assert!(matches!(error, TemplateError::UnsupportedExtension { .. }));
    }
}
