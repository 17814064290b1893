use crate::app::{reduce, Action, AppState, Effect};
use crate::donation::{FlowState, INVALID_AMOUNT_MESSAGE};
use crate::invariants::{assert_all_app_invariants, assert_totals_monotonic};
use crate::money::Amount;
use crate::router::NavAction;
use crate::session::{DEMO_NAME, UserInfo};
use crate::types::View;

fn step(state: &AppState, action: Action) -> (AppState, Vec<Effect>) {
    let t = reduce(state, action).expect("action should be accepted");
    assert_all_app_invariants(&t.state);
    (t.state, t.effects)
}

fn on_detail(id: &str) -> AppState {
    let (state, _) = step(&AppState::default(), Action::OpenEntity { id: id.into() });
    state
}

fn settlement_ticket(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::ScheduleSettlement(s) => Some(s.ticket),
            _ => None,
        })
        .expect("no settlement scheduled")
}

/// Open the modal, pick `action`, confirm, and let settlement complete.
fn donate(state: &AppState, pick: Action) -> AppState {
    let (state, _) = step(state, Action::OpenDonation);
    let (state, _) = step(&state, pick);
    let (state, effects) = step(&state, Action::ConfirmDonation);
    let ticket = settlement_ticket(&effects);
    let (state, _) = step(&state, Action::SettlementCompleted { ticket });
    state
}

#[test]
fn test_preset_donation_lands_on_certificate() {
    let state = on_detail("lp1");
    let state = donate(&state, Action::SelectPreset { amount: 50 });

    assert_eq!(state.screen(), View::Certificate);
    assert_eq!(state.user.donation_count, 1);
    assert_eq!(state.user.donated_amount.to_string(), "50.00");
    assert_eq!(state.user.name, DEMO_NAME);
    assert!(state.user.is_logged_in);
    assert_eq!(state.certificate.as_ref().unwrap().amount, Amount::from_yuan(50));
    assert!(state.detail.is_none());
    assert!(!state.flow.is_open());
}

#[test]
fn test_default_preset_is_twenty() {
    let state = on_detail("lm1");
    let (state, _) = step(&state, Action::OpenDonation);
    let (state, effects) = step(&state, Action::ConfirmDonation);
    match &effects[..] {
        [Effect::ScheduleSettlement(s)] => assert_eq!(s.amount, Amount::from_yuan(20)),
        other => panic!("unexpected effects {other:?}"),
    }
    assert!(state.flow.is_processing());
}

#[test]
fn test_totals_accumulate_across_donations() {
    let mut state = on_detail("lp2");
    state = donate(&state, Action::SelectPreset { amount: 50 });

    // Back to a detail screen via profile → home.
    let (s, _) = step(&state, Action::Navigate { to: NavAction::Back });
    let (s, _) = step(&s, Action::Navigate { to: NavAction::Tab(View::Home) });
    let (s, _) = step(&s, Action::OpenEntity { id: "ls3".into() });
    let before = s.user.clone();
    let s = donate(&s, Action::SetCustomAmount { value: "20.5".into() });
    assert_totals_monotonic(&before, &s.user);

    assert_eq!(s.user.donation_count, 2);
    assert_eq!(s.user.donated_amount.to_string(), "70.50");
    assert_eq!(s.user.last_donation, Some(Amount::from_cents(2050)));
}

#[test]
fn test_double_confirm_settles_once() {
    let state = on_detail("lp1");
    let (state, _) = step(&state, Action::OpenDonation);
    let (state, first) = step(&state, Action::ConfirmDonation);
    let (state, second) = step(&state, Action::ConfirmDonation);
    assert_eq!(first.len(), 1);
    assert!(second.is_empty());

    let ticket = settlement_ticket(&first);
    let (state, _) = step(&state, Action::SettlementCompleted { ticket });
    let (state, _) = step(&state, Action::SettlementCompleted { ticket });
    assert_eq!(state.user.donation_count, 1);
    assert_eq!(state.user.donated_amount.to_string(), "20.00");
}

#[test]
fn test_invalid_custom_amount_never_reaches_totals() {
    let state = on_detail("lp1");
    let (state, _) = step(&state, Action::OpenDonation);
    let (state, _) = step(&state, Action::SetCustomAmount { value: "abc".into() });
    let (state, effects) = step(&state, Action::ConfirmDonation);

    assert!(effects.is_empty());
    assert_eq!(state.user, UserInfo::default());
    match state.flow.state() {
        FlowState::AmountSelection { error, .. } => {
            assert_eq!(error.as_deref(), Some(INVALID_AMOUNT_MESSAGE))
        }
        other => panic!("unexpected flow state {other:?}"),
    }
}

#[test]
fn test_settlement_failure_returns_to_selection() {
    let state = on_detail("lp1");
    let (state, _) = step(&state, Action::OpenDonation);
    let (state, effects) = step(&state, Action::ConfirmDonation);
    let ticket = settlement_ticket(&effects);

    let (state, _) = step(
        &state,
        Action::SettlementFailed {
            ticket,
            reason: "支付通道繁忙".into(),
        },
    );
    assert_eq!(state.screen(), View::Detail);
    assert_eq!(state.user.donation_count, 0);
    assert!(matches!(
        state.flow.state(),
        FlowState::AmountSelection { error: Some(msg), .. } if msg == "支付通道繁忙"
    ));

    // A late success for the failed attempt is ignored.
    let (state, _) = step(&state, Action::SettlementCompleted { ticket });
    assert_eq!(state.user.donation_count, 0);
}

#[test]
fn test_navigation_locked_while_settling() {
    let state = on_detail("lp1");
    let (state, _) = step(&state, Action::OpenDonation);
    let (state, _) = step(&state, Action::ConfirmDonation);

    assert!(reduce(&state, Action::Navigate { to: NavAction::Back }).is_err());
    assert!(reduce(&state, Action::CloseDonation).is_err());
    assert!(reduce(&state, Action::SelectPreset { amount: 10 }).is_err());
}

#[test]
fn test_leaving_detail_cancels_ticker_and_resets_flow() {
    let state = on_detail("lp1");
    let (state, _) = step(&state, Action::OpenDonation);
    let (state, _) = step(&state, Action::SelectPreset { amount: 200 });
    let (state, effects) = step(&state, Action::Navigate { to: NavAction::Back });

    assert_eq!(effects, vec![Effect::CancelScreenTasks]);
    assert!(state.detail.is_none());
    assert!(!state.flow.is_open());

    let (state, _) = step(&state, Action::OpenEntity { id: "lp1".into() });
    assert!(!state.flow.is_open());
}

#[test]
fn test_certificate_save_and_share() {
    let state = donate(&on_detail("lp1"), Action::SelectPreset { amount: 10 });

    let (state, effects) = step(&state, Action::SaveCertificate);
    assert_eq!(effects, vec![Effect::ScheduleCertificateSave]);
    let (state, effects) = step(&state, Action::SaveCertificate);
    assert!(effects.is_empty(), "save already running");

    let (state, _) = step(&state, Action::CertificateSaved);
    assert!(!state.is_saving_certificate);
    assert_eq!(state.notice.as_deref(), Some(crate::certificate::SAVED_NOTICE));

    let (state, _) = step(&state, Action::DismissNotice);
    let (state, _) = step(&state, Action::Navigate { to: NavAction::ShareCertificate });
    assert_eq!(state.screen(), View::Profile);
    assert_eq!(state.notice.as_deref(), Some(crate::certificate::SHARED_NOTICE));
}
