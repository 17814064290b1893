use proptest::prelude::*;

use crate::feed::Feed;
use crate::invariants::{assert_like_in_lockstep, assert_totals_monotonic};
use crate::session::UserInfo;

/// A positive amount as a visitor might type it, paired with its value in
/// cents.
fn typed_amount() -> impl Strategy<Value = (String, i64)> {
    (0u32..100_000, 0u32..100, 0usize..4)
        .prop_filter("amount must be positive", |(yuan, cents, _)| yuan + cents > 0)
        .prop_map(|(yuan, cents, style)| {
            let text = match style {
                0 if cents == 0 => format!("{yuan}"),
                0 | 1 => format!("{yuan}.{cents:02}"),
                2 if cents % 10 == 0 => format!(" {yuan}.{} ", cents / 10),
                _ => format!("{yuan}.{cents:02}00"),
            };
            (text, i64::from(yuan) * 100 + i64::from(cents))
        })
}

/// Text with a non-zero digit past the second decimal.
fn sub_cent_amount() -> impl Strategy<Value = String> {
    (0u32..1000, 0u32..100, 1u32..10).prop_map(|(yuan, cents, extra)| format!("{yuan}.{cents:02}{extra}"))
}

fn cents_text(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

proptest! {
    #[test]
    fn totals_are_the_exact_sum_of_every_call(calls in prop::collection::vec(typed_amount(), 0..20)) {
        let mut user = UserInfo::default();
        for (text, _) in &calls {
            let next = user.record_donation(text).unwrap();
            assert_totals_monotonic(&user, &next);
            user = next;
        }

        let sum: i64 = calls.iter().map(|(_, cents)| cents).sum();
        prop_assert_eq!(user.donation_count as usize, calls.len());
        prop_assert_eq!(user.donated_amount.to_string(), cents_text(sum));
        prop_assert_eq!(user.donated_amount.cents(), sum);
    }

    #[test]
    fn sub_cent_input_never_counts(before in typed_amount(), text in sub_cent_amount()) {
        let user = UserInfo::default().record_donation(&before.0).unwrap();
        prop_assert!(user.record_donation(&text).is_err());
        prop_assert_eq!(user.donation_count, 1);
        prop_assert_eq!(user.donated_amount.cents(), before.1);
    }

    #[test]
    fn double_toggle_restores_the_moment(index in 0usize..3, presses in 0usize..5) {
        let mut feed = Feed::default();
        let id = feed.moments()[index].id.clone();
        for _ in 0..presses {
            feed.toggle_like(&id).unwrap();
        }

        let before = feed.get(&id).unwrap().clone();
        let once = feed.toggle_like(&id).unwrap().clone();
        assert_like_in_lockstep(&before, &once);
        let twice = feed.toggle_like(&id).unwrap().clone();
        prop_assert_eq!(twice, before);
    }
}
