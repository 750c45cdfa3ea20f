use super::*;
use crate::net::config::WidgetConfig;
use crate::net::widget::InertWidgetHost;
use crate::state::session::SessionStore;
use crate::state::storage::MemoryStorage;
use crate::util::clock::FixedClock;

const NOW: i64 = 1_700_000_000;

fn logged_in_bridge() -> WidgetBridge {
    let store = SessionStore::load(Box::new(MemoryStorage::new()), Box::new(FixedClock::at(NOW)));
    store.set(IdentityRecord {
        id: 7,
        first_name: "Ada".to_owned(),
        last_name: None,
        username: None,
        photo_url: None,
        auth_date: NOW - 60,
        hash: "c0ffee".to_owned(),
    });
    WidgetBridge::new(Box::new(InertWidgetHost), store, WidgetConfig::default())
}

#[test]
fn signals_start_logged_out_even_with_stored_session() {
    let ctx = SessionContext::new(logged_in_bridge());
    assert_eq!(ctx.user.get_untracked(), None);
    assert_eq!(ctx.phase.get_untracked(), BridgePhase::Idle);
}

#[test]
fn sync_copies_stored_session_into_signals() {
    let ctx = SessionContext::new(logged_in_bridge());
    ctx.sync();
    assert_eq!(ctx.user.get_untracked().map(|user| user.id), Some(7));
    assert_eq!(ctx.phase.get_untracked(), BridgePhase::Authenticated);
}

#[test]
fn logout_after_sync_clears_signals() {
    let ctx = SessionContext::new(logged_in_bridge());
    ctx.sync();
    ctx.logout();
    assert_eq!(ctx.user.get_untracked(), None);
    assert_eq!(ctx.phase.get_untracked(), BridgePhase::Idle);
}
