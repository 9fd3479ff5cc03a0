//! Tests for `Ref` and `Subscription`.

use super::Ref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |v: &T| sink.lock().unwrap().push(v.clone()))
}

mod get_set {
    use super::*;

    #[test]
    fn new_holds_initial_value() {
        let cell = Ref::new(Some("a".to_string()));

        assert_eq!(cell.get(), Some("a".to_string()));
    }

    #[test]
    fn default_uses_type_default() {
        let cell: Ref<Option<u16>> = Ref::default();

        assert_eq!(cell.get(), None);
    }

    #[test]
    fn set_replaces_value() {
        let cell = Ref::new(false);

        cell.set(true);

        assert!(cell.get());
    }

    #[test]
    fn clones_share_the_same_cell() {
        let writer = Ref::new(0_u16);
        let reader = writer.clone();

        writer.set(404);

        assert_eq!(reader.get(), 404);
    }

    #[test]
    fn with_borrows_without_clone() {
        let cell = Ref::new(vec![1, 2, 3]);

        let len = cell.with(Vec::len);

        assert_eq!(len, 3);
    }

    #[test]
    fn debug_shows_value() {
        let cell = Ref::new(200_u16);

        assert_eq!(format!("{cell:?}"), "Ref(200)");
    }

    #[test]
    fn ref_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Ref<Option<String>>>();
    }
}

mod on_change {
    use super::*;

    #[test]
    fn callback_receives_every_write() {
        let cell = Ref::new(0);
        let (seen, callback) = recorder::<i32>();
        let _subscription = cell.on_change(callback);

        cell.set(1);
        cell.set(1);
        cell.set(2);

        assert_eq!(*seen.lock().unwrap(), vec![1, 1, 2]);
    }

    #[test]
    fn callback_not_invoked_on_registration() {
        let cell = Ref::new(5);
        let (seen, callback) = recorder::<i32>();
        let _subscription = cell.on_change(callback);

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn dropping_subscription_stops_notifications() {
        let cell = Ref::new(0);
        let (seen, callback) = recorder::<i32>();
        let subscription = cell.on_change(callback);

        cell.set(1);
        drop(subscription);
        cell.set(2);

        assert_eq!(*seen.lock().unwrap(), vec![1]);
        assert_eq!(cell.listener_count(), 0);
    }

    #[test]
    fn unsubscribe_removes_only_its_callback() {
        let cell = Ref::new(0);
        let (first_seen, first) = recorder::<i32>();
        let (second_seen, second) = recorder::<i32>();
        let first_sub = cell.on_change(first);
        let _second_sub = cell.on_change(second);

        first_sub.unsubscribe();
        cell.set(7);

        assert!(first_seen.lock().unwrap().is_empty());
        assert_eq!(*second_seen.lock().unwrap(), vec![7]);
    }

    #[test]
    fn detach_keeps_callback_registered() {
        let cell = Ref::new(0);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        cell.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .detach();
        cell.set(1);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cell.listener_count(), 1);
    }

    #[test]
    fn callback_may_read_the_cell() {
        let cell = Ref::new(0);
        let reader = cell.clone();
        let (seen, callback) = recorder::<i32>();
        let _sub = cell.on_change(move |_| callback(&reader.get()));

        cell.set(3);

        assert_eq!(*seen.lock().unwrap(), vec![3]);
    }

    #[test]
    fn subscription_outliving_cell_is_harmless() {
        let cell = Ref::new(0);
        let subscription = cell.on_change(|_| {});

        drop(cell);
        drop(subscription);
    }
}

mod subscribe {
    use super::*;

    #[tokio::test]
    async fn receiver_observes_write() {
        let cell = Ref::new(false);
        let mut rx = cell.subscribe();

        cell.set(true);

        tokio::time::timeout(Duration::from_secs(1), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert!(*rx.borrow_and_update());
    }

    #[tokio::test]
    async fn receiver_sees_latest_value_only() {
        let cell = Ref::new(0);
        let mut rx = cell.subscribe();

        cell.set(1);
        cell.set(2);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 2);
        assert!(!rx.has_changed().unwrap());
    }
}
