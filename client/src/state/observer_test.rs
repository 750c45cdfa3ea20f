use super::*;
use std::cell::RefCell;
use std::rc::Rc;

fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) -> Box<dyn Fn(&i32)>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let log_for_factory = Rc::clone(&log);
    let factory = move |name: &str| -> Box<dyn Fn(&i32)> {
        let log = Rc::clone(&log_for_factory);
        let name = name.to_owned();
        Box::new(move |value: &i32| log.borrow_mut().push(format!("{name}:{value}")))
    };
    (log, factory)
}

#[test]
fn new_subscriber_receives_replay_immediately() {
    let observers = ReplayObservers::new(7);
    let (log, observer) = recorder();
    let _sub = observers.subscribe(observer("a"));
    assert_eq!(*log.borrow(), vec!["a:7"]);
}

#[test]
fn late_subscriber_gets_latest_value_without_new_emission() {
    let observers = ReplayObservers::new(0);
    observers.emit(1);
    observers.emit(2);
    let (log, observer) = recorder();
    let _sub = observers.subscribe(observer("late"));
    assert_eq!(*log.borrow(), vec!["late:2"]);
}

#[test]
fn emissions_are_delivered_in_registration_order() {
    let observers = ReplayObservers::new(0);
    let (log, observer) = recorder();
    let _a = observers.subscribe(observer("a"));
    let _b = observers.subscribe(observer("b"));
    let _c = observers.subscribe(observer("c"));
    log.borrow_mut().clear();

    observers.emit(5);
    assert_eq!(*log.borrow(), vec!["a:5", "b:5", "c:5"]);
}

#[test]
fn dropping_subscription_stops_delivery() {
    let observers = ReplayObservers::new(0);
    let (log, observer) = recorder();
    let sub = observers.subscribe(observer("a"));
    drop(sub);
    observers.emit(1);
    assert_eq!(*log.borrow(), vec!["a:0"]);
    assert!(observers.is_empty());
}

#[test]
fn unsubscribe_removes_only_that_observer() {
    let observers = ReplayObservers::new(0);
    let (log, observer) = recorder();
    let a = observers.subscribe(observer("a"));
    let _b = observers.subscribe(observer("b"));
    a.unsubscribe();
    log.borrow_mut().clear();

    observers.emit(3);
    assert_eq!(*log.borrow(), vec!["b:3"]);
    assert_eq!(observers.len(), 1);
}

#[test]
fn detached_subscription_outlives_its_handle() {
    let observers = ReplayObservers::new(0);
    let (log, observer) = recorder();
    observers.subscribe(observer("a")).detach();
    observers.emit(9);
    assert_eq!(*log.borrow(), vec!["a:0", "a:9"]);
}

#[test]
fn subscribe_with_replays_supplied_value() {
    let observers = ReplayObservers::new(1);
    let (log, observer) = recorder();
    let _sub = observers.subscribe_with(&42, observer("a"));
    assert_eq!(*log.borrow(), vec!["a:42"]);
    assert_eq!(observers.last(), 1);
}

#[test]
fn observer_subscribing_during_delivery_sees_only_its_replay() {
    let observers = ReplayObservers::new(0);
    let log = Rc::new(RefCell::new(Vec::new()));
    let held = Rc::new(RefCell::new(Vec::new()));

    let observers_for_cb = observers.clone();
    let log_for_cb = Rc::clone(&log);
    let held_for_cb = Rc::clone(&held);
    let _outer = observers.subscribe(move |value: &i32| {
        if *value == 1 {
            let log = Rc::clone(&log_for_cb);
            let sub = observers_for_cb.subscribe(move |inner: &i32| log.borrow_mut().push(*inner));
            held_for_cb.borrow_mut().push(sub);
        }
    });

    observers.emit(1);
    assert_eq!(*log.borrow(), vec![1]);
    observers.emit(2);
    assert_eq!(*log.borrow(), vec![1, 2]);
}

#[test]
fn observer_removed_mid_delivery_is_skipped() {
    let observers = ReplayObservers::new(0);
    let (log, observer) = recorder();
    let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let victim_for_cb = Rc::clone(&victim);
    let _killer = observers.subscribe(move |value: &i32| {
        if *value == 1 {
            victim_for_cb.borrow_mut().take();
        }
    });
    *victim.borrow_mut() = Some(observers.subscribe(observer("victim")));
    log.borrow_mut().clear();

    observers.emit(1);
    assert!(log.borrow().is_empty());
}

#[test]
fn subscription_outliving_observable_drops_cleanly() {
    let observers = ReplayObservers::new(0);
    let sub = observers.subscribe(|_: &i32| {});
    drop(observers);
    sub.unsubscribe();
}
