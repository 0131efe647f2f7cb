//! Identifiers of function pages and of the functions on the info page.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Represents a function page, a namespace grouping related functions.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum FunctionPage {
    /// Protocol and firmware information, see [`InfoFunction`].
    Info = 0x00,

    /// Profile management. Declared by the protocol, but not part of every
    /// firmware build.
    GeneralProfiles = 0x01,

    /// Vendor gimmicks such as lighting effects.
    Gimmicks = 0xfd,

    /// Functions meant for firmware development.
    Debug = 0xfe,

    /// Reserved for error reports. Never addressed by a request.
    Error = 0xff,
}

/// The number of function pages this firmware build supports.
pub const PAGE_COUNT: usize = 3;

/// The function pages this firmware build supports, in the order they are
/// reported to the host.
pub const SUPPORTED_PAGES: [FunctionPage; PAGE_COUNT] =
    [FunctionPage::Info, FunctionPage::Gimmicks, FunctionPage::Debug];

const _: () = {
    let mut i = 0;
    while i < PAGE_COUNT {
        assert!(
            SUPPORTED_PAGES[i] as u8 != FunctionPage::Error as u8,
            "the error page cannot be supported"
        );

        let mut j = i + 1;
        while j < PAGE_COUNT {
            assert!(
                SUPPORTED_PAGES[i] as u8 != SUPPORTED_PAGES[j] as u8,
                "supported pages have to be distinct"
            );
            j += 1;
        }
        i += 1;
    }
};

/// Looks up the position of a raw page ID in [`SUPPORTED_PAGES`].
pub fn page_index(page: u8) -> Option<usize> {
    SUPPORTED_PAGES.iter().position(|&supported| u8::from(supported) == page)
}

/// Represents a function of the [`FunctionPage::Info`] page.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum InfoFunction {
    /// Replies with the protocol version as major, minor and patch bytes.
    Version = 0x00,

    /// Replies with one of the [`FwInfoField`]s.
    FwInfo = 0x01,

    /// Replies with the IDs of all supported function pages.
    SupportedFunctionPages = 0x02,

    /// Replies with the IDs of all supported functions on a page.
    SupportedFunctions = 0x03,
}

impl InfoFunction {
    /// All functions of the info page, in ascending order.
    pub const ALL: [InfoFunction; 4] = [
        Self::Version,
        Self::FwInfo,
        Self::SupportedFunctionPages,
        Self::SupportedFunctions,
    ];
}

/// Represents a field that can be queried using [`InfoFunction::FwInfo`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum FwInfoField {
    /// The vendor of the firmware.
    Vendor = 0x00,

    /// The version string of the firmware.
    Version = 0x01,

    /// The display name of the device.
    DeviceName = 0x02,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_ids() {
        let raw: Vec<u8> = SUPPORTED_PAGES.iter().map(|&page| page.into()).collect();
        assert_eq!(raw, [0x00, 0xfd, 0xfe]);
        assert_eq!(FunctionPage::try_from(0x01u8).ok(), Some(FunctionPage::GeneralProfiles));
        assert!(FunctionPage::try_from(0x02u8).is_err());
    }

    #[test]
    fn page_lookup() {
        assert_eq!(page_index(0x00), Some(0));
        assert_eq!(page_index(0xfe), Some(2));
        assert_eq!(page_index(0x01), None);
        assert_eq!(page_index(0xff), None);
    }
}
