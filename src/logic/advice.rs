//! Disposal Advice Lookup
//!
//! Static tips per waste category plus the color derivation the UI
//! uses for its background gradients. Pure functions over a fixed
//! four-entry table.

use serde::Serialize;

use super::labels::WasteLabel;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Static guidance for one waste category
#[derive(Debug, Clone, Serialize)]
pub struct AdviceRecord {
    pub icon: &'static str,
    pub title: &'static str,
    pub body: &'static str,
    /// Accent color of the category ("#rrggbb")
    pub accent_color: &'static str,
}

/// Derived colors for rendering one advice card
#[derive(Debug, Clone, Serialize)]
pub struct AdviceColors {
    pub border: String,
    pub text: String,
    pub bg_start: String,
    pub bg_end: String,
}

// ============================================================================
// STATIC TABLE
// ============================================================================

const RECYCLABLE_TIPS: AdviceRecord = AdviceRecord {
    icon: "♻️",
    title: "Tips Daur Ulang Anorganik",
    body: "Sampah ini dapat didaur ulang! Pastikan membersihkannya dan memilahnya \
           dengan benar. Termasuk botol plastik bersih, kertas, kardus, dan kaleng. \
           Dengan daur ulang, kita mengurangi kebutuhan bahan baku baru!",
    accent_color: "#22c55e",
};

const NON_RECYCLABLE_TIPS: AdviceRecord = AdviceRecord {
    icon: "🗑️",
    title: "Tips Sampah Anorganik Umum",
    body: "Sampah ini umumnya sulit atau tidak dapat didaur ulang. Buanglah ke \
           tempat sampah umum. Upayakan mengurangi penggunaan produk yang \
           menghasilkan sampah jenis ini. Contoh: styrofoam, plastik kemasan berlapis.",
    accent_color: "#ef4444",
};

const HAZARDOUS_TIPS: AdviceRecord = AdviceRecord {
    icon: "⚠️",
    title: "PERHATIAN! Limbah B3",
    body: "JANGAN dibuang ke tempat sampah biasa! Buanglah ke fasilitas khusus \
           penampungan limbah B3 untuk menghindari pencemaran lingkungan dan bahaya \
           kesehatan. Contoh: baterai bekas, lampu TL, obat kadaluarsa.",
    accent_color: "#f59e0b",
};

const ORGANIC_TIPS: AdviceRecord = AdviceRecord {
    icon: "🌱",
    title: "Tips Pengelolaan Sampah Organik",
    body: "Sampah organik dapat diolah menjadi kompos atau pupuk. Cara fantastis \
           untuk mengurangi limbah dan menyuburkan tanah! Pertimbangkan membuat \
           kompos di rumah. Contoh: sisa makanan, kulit buah, daun kering.",
    accent_color: "#8b5cf6",
};

// ============================================================================
// PUBLIC API
// ============================================================================

/// Get the advice record for a label.
///
/// Total over the label set; `Unknown` falls back to the organic entry
/// so the UI always has something sensible to render.
pub fn get_advice(label: WasteLabel) -> &'static AdviceRecord {
    match label {
        WasteLabel::RecyclableInorganic => &RECYCLABLE_TIPS,
        WasteLabel::NonRecyclableInorganic => &NON_RECYCLABLE_TIPS,
        WasteLabel::Hazardous => &HAZARDOUS_TIPS,
        WasteLabel::Organic | WasteLabel::Unknown => &ORGANIC_TIPS,
    }
}

/// Derive the render colors for a label's advice card.
///
/// Border and text use the label's accent color directly; the two
/// background stops are the accent lightened toward white by fixed
/// amounts, matching the deployed UI exactly.
pub fn advice_colors(label: WasteLabel) -> AdviceColors {
    let base = label.accent_color();

    AdviceColors {
        border: base.to_string(),
        text: base.to_string(),
        bg_start: lighten_color(base, 0.7),
        bg_end: lighten_color(base, 0.9),
    }
}

// ============================================================================
// COLOR UTILITIES
// ============================================================================

/// Parse "#rrggbb" (leading '#' optional) into channels
pub fn hex_to_rgb(hex_color: &str) -> Option<(u8, u8, u8)> {
    let hex = hex_color.trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Format channels as "#rrggbb"
pub fn rgb_to_hex(rgb: (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.0, rgb.1, rgb.2)
}

/// Interpolate a color toward white by `amount` in [0, 1].
///
/// Per channel: `c' = min(255, c + (255 - c) * amount)`, truncated to
/// an integer. An unparsable input is returned unchanged.
pub fn lighten_color(hex_color: &str, amount: f32) -> String {
    let Some((r, g, b)) = hex_to_rgb(hex_color) else {
        return hex_color.to_string();
    };

    let lighten = |c: u8| -> u8 {
        let raised = c as f32 + (255.0 - c as f32) * amount;
        (raised as u32).min(255) as u8
    };

    rgb_to_hex((lighten(r), lighten(g), lighten(b)))
}

// ============================================================================
// TESTS
// ============================================================================
