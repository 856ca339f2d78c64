use super::*;

#[tokio::test]
async fn app_state_clone_shares_pool() {
    let state = test_helpers::test_app_state();
    let cloned = state.clone();
    assert_eq!(cloned.pool.size(), state.pool.size());
}

#[tokio::test]
async fn test_app_state_does_not_connect() {
    // connect_lazy defers connection until first use.
    let state = test_helpers::test_app_state();
    assert_eq!(state.pool.size(), 0);
}
