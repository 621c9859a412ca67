//! Privacy-extension flags derived from the reported extension list.

use serde::Serialize;

pub const UBLOCK_MARKER: &str = "ublock origin (lite)";
pub const PRIVACY_BADGER_MARKER: &str = "privacy badger";
pub const NOSCRIPT_MARKER: &str = "noscript";
pub const CANVASBLOCKER_MARKER: &str = "canvasblocker";

/// Marker phrases in flag order: ublock, privacy badger, noscript, canvasblocker.
pub const EXTENSION_MARKERS: [&str; 4] = [
    UBLOCK_MARKER,
    PRIVACY_BADGER_MARKER,
    NOSCRIPT_MARKER,
    CANVASBLOCKER_MARKER,
];

/// One flag per known privacy extension.
///
/// Matching is case-sensitive substring containment, so
/// `"uBlock Origin (Lite)"` does not set `ublock`. Historical rows were
/// derived this way; changing it would shift the meaning of stored data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtensionFlags {
    pub ublock: bool,
    pub privacy_badger: bool,
    pub noscript: bool,
    pub canvasblocker: bool,
}

impl ExtensionFlags {
    #[must_use]
    pub fn from_extensions<S: AsRef<str>>(extensions: &[S]) -> Self {
        let any_contains =
            |marker: &str| extensions.iter().any(|ext| ext.as_ref().contains(marker));
        Self {
            ublock: any_contains(UBLOCK_MARKER),
            privacy_badger: any_contains(PRIVACY_BADGER_MARKER),
            noscript: any_contains(NOSCRIPT_MARKER),
            canvasblocker: any_contains(CANVASBLOCKER_MARKER),
        }
    }

    /// Flags as stored: 0/1 integers in marker order.
    #[must_use]
    pub fn as_ints(self) -> [i64; 4] {
        [
            i64::from(self.ublock),
            i64::from(self.privacy_badger),
            i64::from(self.noscript),
            i64::from(self.canvasblocker),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_sets_no_flags() {
        let flags = ExtensionFlags::from_extensions::<&str>(&[]);
        assert_eq!(flags.as_ints(), [0, 0, 0, 0]);
    }

    #[test]
    fn substring_match_sets_flag() {
        let flags = ExtensionFlags::from_extensions(&[
            "./extensions/firefox-xpi/privacy badger-latest.xpi",
            "canvasblocker-1.11.xpi",
        ]);
        assert!(flags.privacy_badger);
        assert!(flags.canvasblocker);
        assert!(!flags.ublock);
        assert!(!flags.noscript);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let flags = ExtensionFlags::from_extensions(&["uBlock Origin (Lite)", "NoScript"]);
        assert_eq!(flags.as_ints(), [0, 0, 0, 0]);

        let flags = ExtensionFlags::from_extensions(&["ublock origin (lite) 2025.1"]);
        assert_eq!(flags.as_ints(), [1, 0, 0, 0]);
    }

    #[test]
    fn any_entry_can_set_a_flag() {
        let flags = ExtensionFlags::from_extensions(&["other", "noscript", "another"]);
        assert!(flags.noscript);
    }
}
