//! Waste Category Labels
//!
//! The classifier outputs one of four fixed categories. The set is
//! closed at compile time and mirrors the class order the model was
//! trained with.

use serde::{Deserialize, Serialize};

/// Number of classes the model outputs
pub const CLASS_COUNT: usize = 4;

/// Accent color shown for predictions that fall outside the known set
pub const UNKNOWN_ACCENT_COLOR: &str = "#6366f1";

/// Waste category predicted by the classifier.
///
/// `Unknown` is a defensive sentinel for a model emitting an
/// out-of-range class index (e.g. a version mismatch). It is never an
/// error; the UI stays functional and shows a neutral result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WasteLabel {
    /// Class 0 - recyclable inorganic (bottles, paper, cans)
    RecyclableInorganic,
    /// Class 1 - non-recyclable inorganic (styrofoam, layered packaging)
    NonRecyclableInorganic,
    /// Class 2 - hazardous/toxic waste (batteries, expired medicine)
    Hazardous,
    /// Class 3 - organic waste (food scraps, leaves)
    Organic,
    /// Out-of-range class index
    Unknown,
}

/// The four real categories, in model output order
pub const ALL_LABELS: [WasteLabel; CLASS_COUNT] = [
    WasteLabel::RecyclableInorganic,
    WasteLabel::NonRecyclableInorganic,
    WasteLabel::Hazardous,
    WasteLabel::Organic,
];

impl WasteLabel {
    /// Map a model output index to its label.
    ///
    /// Out-of-range indices map to `Unknown` rather than failing.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::RecyclableInorganic,
            1 => Self::NonRecyclableInorganic,
            2 => Self::Hazardous,
            3 => Self::Organic,
            _ => Self::Unknown,
        }
    }

    /// Class index of this label, if it is a real category
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::RecyclableInorganic => Some(0),
            Self::NonRecyclableInorganic => Some(1),
            Self::Hazardous => Some(2),
            Self::Organic => Some(3),
            Self::Unknown => None,
        }
    }

    /// User-facing category name (Indonesian, as trained/deployed)
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::RecyclableInorganic => "Anorganik Daur Ulang",
            Self::NonRecyclableInorganic => "Anorganik Tidak Daur Ulang",
            Self::Hazardous => "B3 (Bahan Berbahaya dan Beracun)",
            Self::Organic => "Organik",
            Self::Unknown => "Tidak Diketahui",
        }
    }

    /// Accent color used for this category in the UI
    pub fn accent_color(&self) -> &'static str {
        match self {
            Self::RecyclableInorganic => "#22c55e",
            Self::NonRecyclableInorganic => "#ef4444",
            Self::Hazardous => "#f59e0b",
            Self::Organic => "#8b5cf6",
            Self::Unknown => UNKNOWN_ACCENT_COLOR,
        }
    }
}

impl std::fmt::Display for WasteLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for (i, label) in ALL_LABELS.iter().enumerate() {
            assert_eq!(WasteLabel::from_index(i), *label);
            assert_eq!(label.index(), Some(i));
        }
    }

    #[test]
    fn test_out_of_range_index_is_unknown() {
        assert_eq!(WasteLabel::from_index(4), WasteLabel::Unknown);
        assert_eq!(WasteLabel::from_index(usize::MAX), WasteLabel::Unknown);
        assert_eq!(WasteLabel::Unknown.index(), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(WasteLabel::Organic.to_string(), "Organik");
        assert_eq!(WasteLabel::Unknown.to_string(), "Tidak Diketahui");
    }

    #[test]
    fn test_every_label_has_a_color() {
        for label in ALL_LABELS.iter().chain([WasteLabel::Unknown].iter()) {
            let color = label.accent_color();
            assert!(color.starts_with('#') && color.len() == 7);
        }
    }
}
