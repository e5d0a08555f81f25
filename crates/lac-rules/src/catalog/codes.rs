//! SSDA903 code lists.

pub(super) const ETHNICITY: &[&str] = &[
    "WBRI", "WIRI", "WOTH", "WIRT", "WROM", "MWBC", "MWBA", "MWAS", "MOTH", "AIND", "APKN",
    "ABAN", "AOTH", "BCRB", "BAFR", "BOTH", "CHNE", "OOTH", "REFU", "NOBT",
];

pub(super) const REASON_NEW_EPISODE: &[&str] = &["S", "P", "L", "T", "U", "B"];

pub(super) const LEGAL_STATUS: &[&str] = &[
    "C1", "C2", "D1", "E1", "V2", "V3", "V4", "J1", "J2", "J3", "L1", "L2", "L3",
];

/// Legal statuses for short breaks; these children are not looked after.
pub(super) const SHORT_BREAK_LEGAL_STATUS: &[&str] = &["V3", "V4"];

pub(super) const CATEGORY_OF_NEED: &[&str] = &["N1", "N2", "N3", "N4", "N5", "N6", "N7", "N8"];

pub(super) const PLACEMENT_TYPE: &[&str] = &[
    "A3", "A4", "A5", "A6", "H5", "K1", "K2", "P1", "P2", "P3", "R1", "R2", "R3", "R5", "S1",
    "T0", "T1", "T2", "T3", "T4", "U1", "U2", "U3", "U4", "U5", "U6", "Z1",
];

/// Placement in youth custody or prison.
pub(super) const YOUTH_CUSTODY: &str = "R5";

pub(super) const REASON_EPISODE_CEASED: &[&str] = &[
    "E11", "E12", "E2", "E3", "E4A", "E4B", "E13", "E41", "E45", "E46", "E47", "E48", "E5",
    "E6", "E7", "E8", "E9", "E14", "E15", "E16", "E17", "X1",
];

pub(super) const PLACEMENT_PROVIDER: &[&str] = &["PR0", "PR1", "PR2", "PR3", "PR4", "PR5"];

/// Placements that never carry a provider code.
pub(super) const PLACEMENT_WITHOUT_PROVIDER: &[&str] = &["T0", "T1", "T2", "T3", "T4", "Z1"];

pub(super) const PARTICIPATION: &[&str] =
    &["PN0", "PN1", "PN2", "PN3", "PN4", "PN5", "PN6", "PN7"];
