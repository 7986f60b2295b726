//! Status-word diagnostics.
//!
//! Maps the INS of the last command and the status word the applet answered with to a
//! human-readable text. Several status words are shared between unrelated conditions, so the
//! text is advisory and must not drive control flow.

/// A row of the diagnostic table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StatusEntry {
    pub ins: u8,
    pub sw: u16,
    pub text: &'static str,
}

const fn entry(ins: u8, sw: u16, text: &'static str) -> StatusEntry {
    StatusEntry { ins, sw, text }
}

/// Applet-specific meanings, keyed by INS and status word.
pub static TABLE: &[StatusEntry] = &[
    // SELECT
    entry(0xA4, 0x6A82, "Application or file not found"),
    entry(0xA4, 0x6A86, "Incorrect parameters P1-P2"),
    entry(0xA4, 0x6982, "Security status not satisfied: wrong file password"),
    entry(0xA4, 0x6700, "Wrong length of the file identifier"),
    // READ BINARY
    entry(0xB0, 0x6982, "Security access denied: read access not granted"),
    entry(0xB0, 0x6986, "Command not allowed: no file selected"),
    entry(0xB0, 0x6B00, "Wrong parameters: offset outside the file"),
    entry(0xB0, 0x6700, "Wrong length: Le exceeds the file size"),
    // UPDATE BINARY
    entry(0xD6, 0x6985, "Update access denied"),
    entry(0xD6, 0x6986, "Command not allowed: no file selected"),
    entry(0xD6, 0x6B00, "Wrong parameters: offset outside the file"),
    entry(0xD6, 0x6700, "Wrong length: data exceeds the file size"),
    // CREATE PASSWORD
    entry(0xE1, 0x6A89, "Password ID already exists"),
    entry(0xE1, 0x6A84, "Not enough memory for a new password"),
    entry(0xE1, 0x6982, "Security access denied: wrong master password"),
    // CHANGE / UNBLOCK PASSWORD
    entry(0x24, 0x6A88, "Password ID not found"),
    entry(0x24, 0x6982, "Security access denied: wrong master password"),
    entry(0x24, 0x6983, "Password blocked: retry limit exceeded"),
    // DELETE PASSWORD
    entry(0xE4, 0x6A88, "Password ID not found"),
    entry(0xE4, 0x6982, "Security access denied: wrong master password"),
    // GET DATA / GET CONFIGURATION
    entry(0x30, 0x6A88, "Referenced data or configuration tag not found"),
    // AUTHENTICATE TAG
    entry(0x88, 0x6A80, "Wrong data: invalid challenge length"),
    entry(0x88, 0x6985, "Conditions not satisfied: authentication key not available"),
    // PASS-THROUGH
    entry(0xCA, 0x6985, "Conditions not satisfied: no pass-through data pending"),
    // SET CONFIGURATION
    entry(0x20, 0x6A80, "Wrong data: invalid configuration value"),
    entry(0x20, 0x6985, "Conditions not satisfied: configuration locked"),
    // PERSONALIZE DATA
    entry(0xE2, 0x6A80, "Wrong data: invalid DGI"),
    entry(0xE2, 0x6A84, "Not enough memory for the personalization data"),
    entry(0xE2, 0x6985, "Conditions not satisfied: personalization already finalized"),
    // BACKEND TEST
    entry(0xBE, 0x6F00, "Backend test failed"),
    entry(0xBE, 0x6985, "Conditions not satisfied: backend tests disabled"),
];

/// Generic ISO/IEC 7816-4 meanings, used when no applet-specific row matches.
static GENERIC: &[(u16, &str)] = &[
    (0x9000, "Success"),
    (0x6700, "Wrong length"),
    (0x6982, "Security status not satisfied"),
    (0x6983, "Authentication method blocked"),
    (0x6985, "Conditions of use not satisfied"),
    (0x6986, "Command not allowed"),
    (0x6A80, "Incorrect parameters in the data field"),
    (0x6A82, "File or application not found"),
    (0x6A84, "Not enough memory space"),
    (0x6A86, "Incorrect parameters P1-P2"),
    (0x6A88, "Referenced data not found"),
    (0x6B00, "Wrong parameters P1-P2"),
    (0x6D00, "Instruction code not supported"),
    (0x6E00, "Class not supported"),
    (0x6F00, "No precise diagnosis"),
];

/// Looks up the text for the status word returned to the command with the INS.
pub fn lookup(ins: u8, sw: u16) -> Option<&'static str> {
    TABLE
        .iter()
        .find(|entry| entry.ins == ins && entry.sw == sw)
        .map(|entry| entry.text)
        .or_else(|| {
            GENERIC
                .iter()
                .find(|(generic, _)| *generic == sw)
                .map(|(_, text)| *text)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_disambiguates_by_ins() {
        assert_eq!(Some("Update access denied"), lookup(0xD6, 0x6985));
        assert_eq!(
            Some("Conditions not satisfied: personalization already finalized"),
            lookup(0xE2, 0x6985),
        );
    }

    #[test]
    fn test_lookup_falls_back_to_generic() {
        assert_eq!(Some("Success"), lookup(0xA4, 0x9000));
        assert_eq!(Some("Class not supported"), lookup(0x88, 0x6E00));
        assert_eq!(None, lookup(0xA4, 0x1234));
    }

    #[test]
    fn test_table_has_no_duplicate_keys() {
        for (i, a) in TABLE.iter().enumerate() {
            assert!(TABLE[i + 1..]
                .iter()
                .all(|b| (a.ins, a.sw) != (b.ins, b.sw)));
        }
    }
}
