mod common;

use common::device;
use oiproto::{
    capability::CapabilityTable,
    error::{CUSTOM_DESCRIPTION_LENGTH, ProtocolError},
    page::{FunctionPage, SUPPORTED_PAGES, page_index},
    report::{LONG_REPORT_LENGTH, ReportKind, SHORT_REPORT_LENGTH},
    transport::error_report,
};
use proptest::prelude::*;

fn page() -> impl Strategy<Value = FunctionPage> {
    prop::sample::select(SUPPORTED_PAGES.to_vec())
}

proptest! {
    /// Pages missing from the declared page list never support any function.
    #[test]
    fn prop_unknown_pages_unsupported(
        page in any::<u8>().prop_filter("declared page", |&page| page_index(page).is_none()),
        function in any::<u8>(),
    ) {
        let table = CapabilityTable::new()
            .with_page(FunctionPage::Info, 0..=u8::MAX)
            .unwrap();
        prop_assert!(!table.is_supported(page, function));
    }

    /// Exactly the configured functions of a page are supported.
    #[test]
    fn prop_configured_functions_supported(
        page in page(),
        functions in prop::collection::vec(any::<u8>(), 0..32),
        probe in any::<u8>(),
    ) {
        let table = CapabilityTable::new()
            .with_page(page, functions.iter().copied())
            .unwrap();

        for &function in &functions {
            prop_assert!(table.is_supported(page.into(), function));
        }
        prop_assert_eq!(table.is_supported(page.into(), probe), functions.contains(&probe));
    }

    /// Buffers of any length other than a report length are dropped.
    #[test]
    fn prop_wrong_length_dropped(
        raw in prop::collection::vec(any::<u8>(), 0..64)
            .prop_filter("report length", |raw| {
                raw.len() != SHORT_REPORT_LENGTH && raw.len() != LONG_REPORT_LENGTH
            }),
    ) {
        let (ctx, dispatcher) = device();
        prop_assert_eq!(dispatcher.dispatch(&ctx, &raw).unwrap(), None);
        prop_assert!(ctx.transport().sent().is_empty());
    }

    /// Buffers starting with an unknown report ID are dropped.
    #[test]
    fn prop_unknown_report_id_dropped(
        id in any::<u8>().prop_filter("report ID", |&id| id != 0x20 && id != 0x21),
        long in any::<bool>(),
    ) {
        let (ctx, dispatcher) = device();
        let mut raw = vec![0u8; if long { LONG_REPORT_LENGTH } else { SHORT_REPORT_LENGTH }];
        raw[0] = id;

        prop_assert_eq!(dispatcher.dispatch(&ctx, &raw).unwrap(), None);
        prop_assert!(ctx.transport().sent().is_empty());
    }

    /// Every well-formed request is answered by exactly one report of the
    /// same kind.
    #[test]
    fn prop_well_formed_answered_once(
        long in any::<bool>(),
        page in any::<u8>(),
        function in any::<u8>(),
        data in prop::collection::vec(any::<u8>(), 29),
    ) {
        let (ctx, dispatcher) = device();
        let len = if long { LONG_REPORT_LENGTH } else { SHORT_REPORT_LENGTH };
        let mut raw = vec![if long { 0x21 } else { 0x20 }, page, function];
        raw.extend_from_slice(&data[..len - 3]);

        let response = dispatcher.dispatch(&ctx, &raw).unwrap().unwrap();
        let sent = ctx.transport().sent();

        prop_assert_eq!(sent.len(), 1);
        prop_assert_eq!(sent[0].len(), len);
        prop_assert_eq!(sent[0][0], raw[0]);
        prop_assert_eq!(response.kind().length(), len);
    }

    /// Invalid value errors carry their position through encoding.
    #[test]
    fn prop_invalid_value_round_trip(position in any::<u8>(), long in any::<bool>()) {
        let kind = if long { ReportKind::Long } else { ReportKind::Short };
        let err = ProtocolError::InvalidValue { position };
        let report = error_report(kind, &err);

        prop_assert_eq!(&report.data()[..2], &[0x01, position]);
        prop_assert!(report.data()[2..].iter().all(|&b| b == 0));
        prop_assert_eq!(ProtocolError::from_payload(report.data()), Ok(err));
    }

    /// Custom descriptions are truncated and never overrun the report.
    #[test]
    fn prop_custom_description_truncated(description in "[a-z ]{0,64}", long in any::<bool>()) {
        let kind = if long { ReportKind::Long } else { ReportKind::Short };
        let report = error_report(kind, &ProtocolError::custom(&description));
        let data = report.data();

        let kept = description.len().min(CUSTOM_DESCRIPTION_LENGTH).min(kind.data_length() - 1);
        prop_assert_eq!(data.len(), kind.data_length());
        prop_assert_eq!(data[0], 0xfe);
        prop_assert_eq!(&data[1..=kept], &description.as_bytes()[..kept]);
        prop_assert!(data[1 + kept..].iter().all(|&b| b == 0));
    }
}
