//! Tests for the task and work-order type codecs.
use flowchart::codec::{self, TaskType, TypeFlag, WorkOrderType};
use flowchart::error::CodecError;
use proptest::prelude::*;
use proptest::sample::subsequence;

#[test]
fn test_encode_task_types() {
    assert_eq!(codec::encode::<TaskType>(&["dataCollecting"]), Ok(1));
    assert_eq!(
        codec::encode::<TaskType>(&["dataArchiving", "dataCleaning", "dataAnalysis"]),
        Ok(16 | 2 | 4)
    );
    assert_eq!(codec::encode::<WorkOrderType>(&["data_security", "data_fusion"]), Ok(9));
}

#[test]
fn test_encode_errors() {
    assert_eq!(codec::encode::<TaskType>(&[]), Err(CodecError::Empty));
    assert_eq!(
        codec::encode::<TaskType>(&["dataCollecting", "dataMining"]),
        Err(CodecError::Unknown("dataMining".to_string()))
    );
    assert_eq!(
        codec::encode::<TaskType>(&["dataCleaning", "dataCleaning"]),
        Err(CodecError::Duplicate("dataCleaning".to_string()))
    );
    // Names are case sensitive and belong to one vocabulary only.
    assert!(codec::encode::<TaskType>(&["DataCleaning"]).is_err());
    assert!(codec::encode::<WorkOrderType>(&["dataCleaning"]).is_err());
}

#[test]
fn test_decode_is_canonical_and_ignores_unknown_bits() {
    assert_eq!(
        codec::decode::<TaskType>(8 | 1),
        vec!["dataCollecting", "dataReporting"]
    );
    assert_eq!(codec::decode::<TaskType>(0), Vec::<&str>::new());
    assert_eq!(codec::decode::<WorkOrderType>(1 << 10 | 2), vec!["data_distribution"]);
    assert_eq!(codec::decode::<WorkOrderType>(-1).len(), WorkOrderType::ALL.len());
}

#[test]
fn test_encode_json() {
    assert_eq!(
        codec::encode_json::<TaskType>(r#"["dataAnalysis","dataReporting"]"#),
        Ok(12)
    );
    assert_eq!(codec::encode_json::<TaskType>("[]"), Err(CodecError::Empty));
    assert!(matches!(
        codec::encode_json::<TaskType>("dataAnalysis"),
        Err(CodecError::Malformed(_))
    ));
    assert!(matches!(
        codec::encode_json::<TaskType>("[1, 2]"),
        Err(CodecError::Malformed(_))
    ));
}

#[test]
fn test_mask_helpers() {
    let mask = codec::set(0, TaskType::DataCleaning.bit());
    assert!(codec::contains(mask, 2));
    assert!(!codec::contains(mask, 2 | 4));
    assert!(!codec::contains(mask, 0));
    assert_eq!(codec::without(7, 2), 5);
    assert_eq!(codec::without(5, 2), 5);
    assert_eq!(codec::union(1, 8), 9);
    assert_eq!(codec::intersection(7, 12), 4);
}

#[test]
fn test_flag_names() {
    assert_eq!(TaskType::from_name("dataArchiving"), Some(TaskType::DataArchiving));
    assert_eq!(TaskType::from_name("data_fusion"), None);
    assert_eq!(WorkOrderType::DataGovernance.to_string(), "data_governance");
    assert_eq!(WorkOrderType::DataGovernance.bit(), 4);

    // Every flag is a distinct power of two.
    let all = TaskType::ALL.iter().fold(0, |acc, f| {
        assert_eq!(f.bit().count_ones(), 1);
        assert_eq!(acc & f.bit(), 0);
        acc | f.bit()
    });
    assert_eq!(all, 31);
}

fn names<F: TypeFlag>() -> Vec<&'static str> {
    F::ALL.iter().map(|f| f.name()).collect()
}

proptest! {
    /// Property: decoding an encoded name set yields the same set
    #[test]
    fn test_task_type_round_trip(subset in subsequence(names::<TaskType>(), 1..=TaskType::ALL.len())) {
        let mask = codec::encode::<TaskType>(&subset).expect("subset is valid");
        let mut decoded = codec::decode::<TaskType>(mask);
        let mut expected = subset.clone();
        decoded.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn test_work_order_type_round_trip(subset in subsequence(names::<WorkOrderType>(), 1..=WorkOrderType::ALL.len())) {
        let mask = codec::encode::<WorkOrderType>(&subset).expect("subset is valid");
        prop_assert_eq!(codec::decode::<WorkOrderType>(mask).len(), subset.len());
        let all_set = subset.iter().all(|name| {
            let bit = WorkOrderType::from_name(name).map(|f| f.bit()).unwrap_or(0);
            codec::contains(mask, bit)
        });
        prop_assert!(all_set, "mask {} misses a name of {:?}", mask, subset);
    }

    /// Property: decode never panics and only reports known bits
    #[test]
    fn test_decode_any_mask(mask in any::<i32>()) {
        let decoded = codec::decode::<TaskType>(mask);
        let reencoded = if decoded.is_empty() { 0 } else {
            codec::encode::<TaskType>(&decoded).expect("decoded names are valid")
        };
        prop_assert_eq!(reencoded, mask & 31);
    }
}
