//! Integration tests for the Order aggregate and User entity.
//!
//! These tests exercise the public domain API the way the use-case layer
//! does: build, append, validate.

use domain::{DomainError, Item, Order, OrderStatus, User, UserId};

mod order_totals {
    use super::*;

    #[test]
    fn total_matches_sum_of_lines_in_insertion_order() {
        let lines = [
            ("SKU-A", 3, 0.1),
            ("SKU-B", 7, 0.2),
            ("SKU-C", 1, 1234.5),
            ("SKU-D", 11, 0.3),
        ];

        let mut order = Order::new(UserId::new());
        let mut expected = 0.0;
        for (sku, qty, price) in lines {
            order.add_item(Item::new(sku, qty, price)).unwrap();
            expected += price * f64::from(qty);
            assert_eq!(order.total(), expected);
        }
        assert_eq!(order.item_count(), lines.len());
    }

    #[test]
    fn many_items_keep_exact_running_total() {
        let mut order = Order::new(UserId::new());
        let mut expected = 0.0;
        for n in 1..=100 {
            let price = f64::from(n) * 0.25;
            order.add_item(Item::new(format!("SKU-{n}"), n, price)).unwrap();
            expected += price * f64::from(n);
        }
        assert_eq!(order.total(), expected);
        assert_eq!(order.items().len(), 100);
    }

    #[test]
    fn rejected_items_are_never_partially_applied() {
        let mut order = Order::new(UserId::new());
        order.add_item(Item::new("SKU1", 2, 10.0)).unwrap();

        let bad = [
            Item::new("", 1, 1.0),
            Item::new("SKU2", 0, 1.0),
            Item::new("SKU3", -5, 1.0),
            Item::new("SKU4", 1, -10.0),
        ];
        for item in bad {
            let err = order.add_item(item).unwrap_err();
            assert!(matches!(err, DomainError::InvalidItem(_)));
        }

        assert_eq!(order.item_count(), 1);
        assert_eq!(order.total(), 20.0);
    }
}

mod order_validation {
    use super::*;

    #[test]
    fn reference_scenario_is_valid() {
        let mut order = Order::new(UserId::new());
        order.add_item(Item::new("SKU1", 2, 10.0)).unwrap();
        order.add_item(Item::new("SKU2", 1, 15.0)).unwrap();

        assert!(order.validate().is_ok());
        assert_eq!(order.total(), 35.0);
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.items()[0].sku, "SKU1");
        assert_eq!(order.items()[1].sku, "SKU2");
    }

    #[test]
    fn order_without_items_is_invalid() {
        let order = Order::new(UserId::new());
        assert!(matches!(
            order.validate(),
            Err(DomainError::InvalidOrder(_))
        ));
    }
}

mod user_validation {
    use super::*;

    #[test]
    fn invalid_users_are_rejected() {
        for (name, email) in [("", "a@b.com"), ("Bob", ""), ("Bob", "not-an-email")] {
            let user = User::new(name, email);
            assert!(
                matches!(user.validate(), Err(DomainError::InvalidUser(_))),
                "expected {name:?}/{email:?} to be rejected"
            );
        }
    }

    #[test]
    fn valid_user_is_accepted() {
        let user = User::new("Bob", "bob@x.co");
        assert!(user.validate().is_ok());
        assert!(!user.id().is_nil());
    }
}
