#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use serial_test::serial;

    use crate::manager::token_manager::get_token_manager;
    use crate::sources::transport::BodyEncoding::Json;
    use crate::tests::common::{configured_manager, ok_json, ManualClock, MockTransport, FIRST};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_one_acquisition() {
        let transport = MockTransport::with_delay(Duration::from_millis(100));
        transport.on(FIRST, Json, ok_json(json!({"access_token": "shared", "expires_in": 3600})));
        let manager = Arc::new(configured_manager(&transport, &ManualClock::new()).await);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.get_token().await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "shared");
        }
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn token_info_does_not_wait_for_acquisition() {
        let transport = MockTransport::with_delay(Duration::from_millis(500));
        transport.on(FIRST, Json, ok_json(json!({"access_token": "slow"})));
        let manager = Arc::new(configured_manager(&transport, &ManualClock::new()).await);

        let fetching = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.get_token().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        // acquisition is still in flight and holds the lock
        let info = manager.get_token_info();
        assert!(info.is_configured);
        assert!(!info.has_token);
        assert!(manager.is_configured());

        assert_eq!(fetching.await.unwrap().unwrap(), "slow");
        assert!(manager.get_token_info().has_token);
    }

    #[tokio::test]
    #[serial]
    async fn process_wide_manager_is_created_once() {
        let first = get_token_manager().await.unwrap();
        first.configure("global-id", "global-secret", "global-ws").await.unwrap();

        let second = get_token_manager().await.unwrap();
        assert!(Arc::ptr_eq(first, second));
        // a second lookup does not reset state
        assert!(second.is_configured());
        assert!(!second.get_token_info().has_token);
    }
}
