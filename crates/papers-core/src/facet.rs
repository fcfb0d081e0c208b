//! Filter dimensions over the paper catalog.

use crate::{Paper, format_year};

/// Exam types offered as filter chips.
pub const EXAM_TYPES: &[&str] = &["cat1", "cat2", "fat"];

/// Year tokens offered as filter chips, newest first.
pub const YEARS: &[&str] = &["2026", "2025", "2024", "2023", "2022"];

/// Exam slots offered as filter chips.
pub const SLOTS: &[&str] = &[
    "a1", "a2", "b1", "b2", "c1", "c2", "d1", "d2", "e1", "e2", "f1", "f2", "g1", "g2",
];

/// One independent filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facet {
    ExamType,
    Semester,
    Slot,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::ExamType, Facet::Semester, Facet::Slot];

    /// Field name used by the papers service (and the upload form).
    pub fn field_name(self) -> &'static str {
        match self {
            Self::ExamType => "exam_type",
            Self::Semester => "semester_name",
            Self::Slot => "slot",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ExamType => "Type",
            Self::Semester => "Semester",
            Self::Slot => "Slot",
        }
    }

    /// The closed set of values shown for this facet. Values outside it are
    /// never counted or offered.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::ExamType => EXAM_TYPES,
            Self::Semester => YEARS,
            Self::Slot => SLOTS,
        }
    }

    /// Normalize a raw value for comparison. Exam type and slot compare
    /// case-insensitively; semester compares as the exact string.
    pub fn normalize(self, value: &str) -> String {
        match self {
            Self::ExamType | Self::Slot => value.to_lowercase(),
            Self::Semester => value.to_string(),
        }
    }

    /// Raw (un-normalized) value a paper carries for this facet.
    pub fn raw_value(self, paper: &Paper) -> &str {
        match self {
            Self::ExamType => &paper.exam_type,
            Self::Semester => &paper.semester_name,
            Self::Slot => &paper.slot,
        }
    }

    pub fn value_of(self, paper: &Paper) -> String {
        self.normalize(self.raw_value(paper))
    }

    /// Chip text for a candidate value.
    pub fn display_value(self, value: &str) -> String {
        match self {
            Self::ExamType => match value.to_lowercase().as_str() {
                "cat1" => "CAT 1".to_string(),
                "cat2" => "CAT 2".to_string(),
                other => other.to_uppercase(),
            },
            Self::Semester => format_year(value),
            Self::Slot => value.to_uppercase(),
        }
    }

    pub fn parse(name: &str) -> Option<Facet> {
        match name {
            "exam_type" | "type" => Some(Self::ExamType),
            "semester_name" | "year" => Some(Self::Semester),
            "slot" => Some(Self::Slot),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(exam_type: &str, slot: &str, semester: &str) -> Paper {
        Paper {
            filename: "p.pdf".into(),
            course_title: None,
            course_code: None,
            slot: slot.into(),
            exam_type: exam_type.into(),
            semester_name: semester.into(),
        }
    }

    #[test]
    fn exam_type_and_slot_are_case_folded() {
        let p = paper("CAT1", "B2", "Fallsem");
        assert_eq!(Facet::ExamType.value_of(&p), "cat1");
        assert_eq!(Facet::Slot.value_of(&p), "b2");
    }

    #[test]
    fn semester_is_exact() {
        let p = paper("fat", "a1", "Fallsem");
        assert_eq!(Facet::Semester.value_of(&p), "Fallsem");
        assert_eq!(Facet::Semester.normalize("FALLSEM"), "FALLSEM");
    }

    #[test]
    fn display_values() {
        assert_eq!(Facet::ExamType.display_value("cat2"), "CAT 2");
        assert_eq!(Facet::ExamType.display_value("fat"), "FAT");
        assert_eq!(Facet::Semester.display_value("2025"), "2025-26");
        assert_eq!(Facet::Slot.display_value("g1"), "G1");
    }

    #[test]
    fn field_names_round_trip_through_parse() {
        for facet in Facet::ALL {
            assert_eq!(Facet::parse(facet.field_name()), Some(facet));
        }
        assert_eq!(Facet::parse("type"), Some(Facet::ExamType));
        assert_eq!(Facet::parse("bogus"), None);
    }
}
