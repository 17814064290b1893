use crate::app::{reduce, Action, AppState, Effect};
use crate::assistant::{CHAT_FAILURE_FALLBACK, CHAT_GREETING};
use crate::errors::CoreError;
use crate::invariants::{assert_all_app_invariants, assert_like_in_lockstep};
use crate::money::Amount;
use crate::router::NavAction;
use crate::types::{EntityType, View};

fn step(state: &AppState, action: Action) -> (AppState, Vec<Effect>) {
    let t = reduce(state, action).expect("action should be accepted");
    assert_all_app_invariants(&t.state);
    (t.state, t.effects)
}

fn nav(state: &AppState, to: NavAction) -> AppState {
    step(state, Action::Navigate { to }).0
}

fn donated(amounts: &[u32]) -> AppState {
    let mut state = AppState::default();
    for amount in amounts {
        state = nav(&state, NavAction::Tab(View::Home));
        state = step(&state, Action::OpenEntity { id: "p1".into() }).0;
        state = step(&state, Action::OpenDonation).0;
        state = step(&state, Action::SelectPreset { amount: *amount }).0;
        let (s, effects) = step(&state, Action::ConfirmDonation);
        let ticket = match &effects[..] {
            [Effect::ScheduleSettlement(s)] => s.ticket,
            other => panic!("unexpected effects {other:?}"),
        };
        state = step(&s, Action::SettlementCompleted { ticket }).0;
        state = nav(&state, NavAction::Back);
    }
    state
}

#[test]
fn test_category_list_and_back() {
    let state = nav(&AppState::default(), NavAction::OpenCategory(EntityType::SpecialFund));
    assert_eq!(state.screen(), View::SpecialFundList);
    assert!(!state.router.shows_tab_bar());
    let state = nav(&state, NavAction::Back);
    assert_eq!(state.screen(), View::Home);
}

#[test]
fn test_certificate_unreachable_without_donations() {
    let state = nav(&AppState::default(), NavAction::Tab(View::Profile));
    let err = reduce(&state, Action::Navigate { to: NavAction::ShowCertificate }).unwrap_err();
    assert!(matches!(err, CoreError::NotAllowed(_)));
}

#[test]
fn test_certificate_from_profile_shows_latest_amount() {
    let state = donated(&[50, 10]);
    assert_eq!(state.screen(), View::Profile);
    assert_eq!(state.user.donated_amount.to_string(), "60.00");

    let state = nav(&state, NavAction::ShowCertificate);
    assert_eq!(state.screen(), View::Certificate);
    assert_eq!(state.certificate.as_ref().unwrap().amount, Amount::from_yuan(10));

    let state = nav(&state, NavAction::Back);
    assert_eq!(state.screen(), View::Profile);
}

#[test]
fn test_settings_falls_back_to_home_screen() {
    let state = nav(&AppState::default(), NavAction::Sidebar(View::Settings));
    assert_eq!(state.router.current(), View::Settings);
    assert_eq!(state.screen(), View::Home);
    let state = nav(&state, NavAction::Tab(View::Community));
    assert_eq!(state.screen(), View::Community);
}

#[test]
fn test_like_toggle_round_trip() {
    let state = nav(&AppState::default(), NavAction::Tab(View::Community));
    let before = state.feed.get("m1").unwrap().clone();

    let (liked, _) = step(&state, Action::ToggleLike { id: "m1".into() });
    let after = liked.feed.get("m1").unwrap();
    assert_like_in_lockstep(&before, after);
    assert_eq!((after.likes, after.is_liked), (25, true));

    let (unliked, _) = step(&liked, Action::ToggleLike { id: "m1".into() });
    assert_eq!(unliked.feed.get("m1"), Some(&before));
}

#[test]
fn test_chat_failure_appends_one_fallback() {
    let state = nav(&AppState::default(), NavAction::Sidebar(View::Chat));
    let (state, effects) = step(&state, Action::SendChat { input: "hello".into() });
    let pending = match &effects[..] {
        [Effect::RequestChat(p)] => p.clone(),
        other => panic!("unexpected effects {other:?}"),
    };
    assert!(state.chat.is_loading());
    assert!(matches!(
        reduce(&state, Action::SendChat { input: "again".into() }),
        Err(CoreError::Busy)
    ));

    let (state, _) = step(
        &state,
        Action::ChatReplied {
            pending,
            outcome: Err("network down".into()),
        },
    );
    let contents: Vec<_> = state.chat.messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, [CHAT_GREETING, "hello", CHAT_FAILURE_FALLBACK]);
    assert!(!state.chat.is_loading());
}

#[test]
fn test_chat_reply_after_leaving_is_discarded() {
    let state = nav(&AppState::default(), NavAction::Sidebar(View::Chat));
    let (state, effects) = step(&state, Action::SendChat { input: "hi".into() });
    let pending = match &effects[..] {
        [Effect::RequestChat(p)] => p.clone(),
        other => panic!("unexpected effects {other:?}"),
    };

    let state = nav(&state, NavAction::Sidebar(View::Analytics));
    let state = nav(&state, NavAction::Sidebar(View::Chat));
    let (state, _) = step(
        &state,
        Action::ChatReplied {
            pending,
            outcome: Ok("late reply".into()),
        },
    );
    assert_eq!(state.chat.messages().len(), 1);
    assert!(!state.chat.is_loading());
}

#[test]
fn test_image_generation_only_on_studio() {
    assert!(reduce(
        &AppState::default(),
        Action::GenerateImage {
            prompt: "lighthouse".into()
        }
    )
    .is_err());

    let state = nav(&AppState::default(), NavAction::Sidebar(View::Images));
    let (state, effects) = step(
        &state,
        Action::GenerateImage {
            prompt: "lighthouse".into(),
        },
    );
    let pending = match &effects[..] {
        [Effect::RequestImage(p)] => p.clone(),
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, _) = step(
        &state,
        Action::ImageGenerated {
            pending,
            outcome: Ok("data:image/png;base64,iVBORw0KGgo=".into()),
        },
    );
    assert_eq!(state.studio.images().len(), 1);
    assert_eq!(state.studio.images()[0].prompt, "lighthouse");
}

#[test]
fn test_unknown_tab_target_falls_back_to_home() {
    let state = nav(&AppState::default(), NavAction::Tab(View::Community));
    let action: Action =
        serde_json::from_str(r#"{"type":"navigate","to":{"type":"tab","target":"WALLET"}}"#).unwrap();
    assert_eq!(
        action,
        Action::Navigate {
            to: NavAction::Tab(View::Home)
        }
    );
    let (state, _) = step(&state, action);
    assert_eq!(state.screen(), View::Home);
}
