#![allow(dead_code)]

use crate::app::AppState;
use crate::feed::Moment;
use crate::session::UserInfo;
use crate::types::View;

/// Cumulative totals never go down between two observations.
pub fn assert_totals_monotonic(before: &UserInfo, after: &UserInfo) {
    assert!(
        after.donation_count >= before.donation_count,
        "donation_count decreased from {} to {}",
        before.donation_count,
        after.donation_count
    );
    assert!(
        after.donated_amount >= before.donated_amount,
        "donated_amount decreased from {} to {}",
        before.donated_amount,
        after.donated_amount
    );
}

/// The like counter moves with the flag: exactly one step per toggle.
pub fn assert_like_in_lockstep(before: &Moment, after: &Moment) {
    assert_ne!(before.is_liked, after.is_liked, "like flag did not flip");
    let expected = if after.is_liked {
        before.likes + 1
    } else {
        before.likes - 1
    };
    assert_eq!(
        after.likes, expected,
        "likes moved from {} to {} while is_liked became {}",
        before.likes, after.likes, after.is_liked
    );
}

/// A certificate on screen always has a donation behind it.
pub fn assert_certificate_backed(state: &AppState) {
    if state.screen() == View::Certificate {
        assert!(
            state.user.donation_count > 0,
            "certificate shown with no donations"
        );
        assert!(state.certificate.is_some(), "certificate screen without data");
    }
}

/// The donor ticker only exists alongside the detail screen.
pub fn assert_detail_consistent(state: &AppState) {
    assert_eq!(
        state.detail.is_some(),
        state.router.current() == View::Detail,
        "detail state out of sync with view {:?}",
        state.router.current()
    );
}

/// Run all stateless app invariants.
pub fn assert_all_app_invariants(state: &AppState) {
    assert_certificate_backed(state);
    assert_detail_consistent(state);
}
