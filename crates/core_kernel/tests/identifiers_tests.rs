//! Unit tests for the identifier types
//!
//! Covers creation, parsing, conversion and display formatting.

use core_kernel::{BeneficiaryId, CustomerId, DeclarationId, PlanId};
use proptest::prelude::*;
use uuid::Uuid;

mod customer_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = CustomerId::new();
        let id2 = CustomerId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = CustomerId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = CustomerId::new_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(CustomerId::prefix(), "CUS");
        assert_eq!(BeneficiaryId::prefix(), "BEN");
        assert_eq!(DeclarationId::prefix(), "HDC");
    }

    #[test]
    fn test_from_str_without_prefix() {
        let uuid = Uuid::new_v4();
        let parsed: CustomerId = uuid.to_string().parse().unwrap();
        assert_eq!(*parsed.as_uuid(), uuid);
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("CUS-not-a-uuid".parse::<CustomerId>().is_err());
    }

    #[test]
    fn test_suffix_longer_than_display_returns_whole_string() {
        let id = CustomerId::new();
        assert_eq!(id.suffix(100), id.to_string());
    }
}

mod plan_id_tests {
    use super::*;

    #[test]
    fn test_plan_id_conversions() {
        let id = PlanId::from(7);
        let raw: i64 = id.into();
        assert_eq!(raw, 7);
        assert_eq!(PlanId::new(7), id);
    }

    #[test]
    fn test_plan_id_parse_error() {
        assert!("seven".parse::<PlanId>().is_err());
    }
}

proptest! {
    #[test]
    fn prop_customer_suffix_is_tail_of_display(bytes in any::<[u8; 16]>(), n in 0usize..8) {
        let id = CustomerId::from_uuid(Uuid::from_bytes(bytes));
        let suffix = id.suffix(n);
        prop_assert_eq!(suffix.len(), n);
        prop_assert!(id.to_string().ends_with(&suffix));
    }
}
