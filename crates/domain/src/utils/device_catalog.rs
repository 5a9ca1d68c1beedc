//! Phone and ATA item numbers with the names shown on the order sheet

/// `(item number, display name)` for every device tracked by item number.
pub const DEVICE_CATALOG: &[(&str, &str)] = &[
    ("HT812", "HT812 ATA"),
    ("HT814", "HT814 ATA"),
    ("HT818", "HT818 ATA"),
    ("2200-49530-001", "OBi300"),
    ("2200-49532-001", "OBi302"),
    ("2200-49550-001", "OBi504"),
    ("2200-49552-001", "OBi508"),
    ("2200-49235-001", "D230"),
    ("2200-49230-001", "D230 IP Base Kit"),
    ("GRP2614", "GRP2614 - VoIP phone"),
    ("GRP2615", "GRP2615 - VoIP phone"),
    ("GRP2616", "GRP2616 - VoIP phone"),
    ("2200-66800-001", "IP 8300"),
    ("2200-66700-001", "IP 8500"),
    ("2200-66070-001", "IP 8800"),
    ("KX-TGP600G", "KX Base"),
    ("KX-TGP600", "KX Bundle"),
    ("KX-TPA65", "KX Desktop"),
    ("KX-TPA60", "KX Handset"),
    ("KX-UDT131", "KX Rugged"),
    ("KX-UDT121", "KX Slim"),
    ("KX-TGC352B", "KX-TGC352B"),
    ("2200-86240-019", "Trio C60"),
    ("2200-18061-025", "VVX 1500"),
    ("2200-48820-001", "VVX 250"),
    ("2200-46135-001", "VVX 300"),
    ("2200-46135-025", "VVX 300"),
    ("2200-48300-001", "VVX 301"),
    ("2200-48300-025", "VVX 301"),
    ("2200-46161-025", "VVX 310"),
    ("2200-48350-001", "VVX 311"),
    ("2200-48350-025", "VVX 311"),
    ("G2200-48350-025", "VVX 311/TAA"),
    ("2200-48830-001", "VVX 350"),
    ("2200-46157-001", "VVX 400"),
    ("2200-46157-025", "VVX 400"),
    ("2200-46157-025-VQMON", "VVX 400"),
    ("2200-48400-001", "VVX 401"),
    ("2200-48400-025", "VVX 401"),
    ("2200-46162-025", "VVX 410"),
    ("2200-48450-001", "VVX 411"),
    ("2200-48450-025", "VVX 411"),
    ("2200-48840-001", "VVX 450"),
    ("2200-48842-025", "VVX 450 OBI"),
    ("2200-44500-001", "VVX 500"),
    ("2200-44500-025", "VVX 500"),
    ("2200-48500-001", "VVX 501"),
    ("2200-48500-025", "VVX 501"),
    ("2200-44600-018", "VVX 600"),
    ("2200-44600-025", "VVX 600"),
    ("2200-48600-001", "VVX 601"),
    ("2200-48600-025", "VVX 601"),
    ("2200-48822-001", "VVX250 OBI"),
    ("2200-48832-001", "VVX350 OBI"),
    ("2200-48842-001", "VVX450 OBI"),
    ("2200-86850-001", "Rove 30"),
    ("2200-88080-001", "Rove 20"),
    ("2200-86810-001", "Rove 40"),
    ("WP820", "WP820 WiFi Phone"),
    ("8301", "Algo"),
    ("8180G2", "Algo 81"),
    ("SN5600/4B/EUI", "Patton 56"),
    ("SN5301/4B/EUI", "Patton 53"),
    ("SN5501/4B/EUI", "Patton 55"),
];

pub fn device_item_numbers() -> Vec<&'static str> {
    DEVICE_CATALOG.iter().map(|(item, _)| *item).collect()
}

/// Display name for an item, falling back to the item number itself.
pub fn device_display_name(item_number: &str) -> &str {
    DEVICE_CATALOG
        .iter()
        .find(|(item, _)| *item == item_number)
        .map_or(item_number, |(_, name)| *name)
}

/// 12 uppercase hexadecimal characters.
pub fn is_mac_address(serial: &str) -> bool {
    serial.len() == 12 && serial.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}
