//! Free-text district labels, as typed into import spreadsheets, resolved
//! to canonical district codes.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::DISTRICT;

/// Short labels commonly typed without the "Quận"/"Huyện" prefix.
const TYPED_LABELS: &[(&str, &str)] = &[
    ("Gò Vấp", "GVAP"),
    ("Phú Nhuận", "PNHUAN"),
    ("Thủ Đức", "TDUC"),
    ("Bình Thạnh", "BTHANH"),
    ("Bình Tân", "BTAN"),
    ("Bình Chánh", "BCHANH"),
    ("Tân Bình", "TBINH"),
    ("Tân Phú", "TPHU"),
    ("Nhà Bè", "NBE"),
    ("Hóc Môn", "HMON"),
    ("Củ Chi", "CCHI"),
    ("Cần Giờ", "CGIO"),
    ("Đức Hòa", "DHOA"),
    ("Bến Lức", "BLUC"),
    ("Cần Giuộc", "CGIUOC"),
];

static LABEL_TO_CODE: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (label, code) in TYPED_LABELS {
        map.insert(normalize(label), *code);
    }
    for (code, label) in DISTRICT {
        map.insert(normalize(code), *code);
        map.insert(normalize(label), *code);
        // "Quận 2 (Cũ)" is also typed as plain "Quận 2"
        if let Some(stripped) = label.strip_suffix("(Cũ)") {
            map.insert(normalize(stripped), *code);
        }
    }
    map
});

fn normalize(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Canonical code for a typed district label, e.g. `"Quận 1"` → `"1"`.
pub fn resolve(label: &str) -> Option<&'static str> {
    LABEL_TO_CODE.get(&normalize(label)).copied()
}
