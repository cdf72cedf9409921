//! Durable command usage tracking.
//!
//! Counts live in a local SQLite database so they survive restarts. Every
//! call acquires and releases the connection on its own; no transaction is
//! held across calls.

mod error;
mod store;

pub use error::UsageError;
pub use store::UsageStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_increment_counts_each_call() {
        let store = UsageStore::in_memory().unwrap();

        for _ in 0..3 {
            store.increment("boom").await.unwrap();
        }
        store.increment("quack").await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], ("boom".into(), 3));
        assert_eq!(all[1], ("quack".into(), 1));
    }

    #[tokio::test]
    async fn test_increment_isolated_per_command() {
        let store = UsageStore::in_memory().unwrap();

        store.increment("a").await.unwrap();
        store.increment("a").await.unwrap();

        let all = store.list_all().await.unwrap();
        let count_b = all.iter().find(|(c, _)| c == "b");
        assert!(count_b.is_none());
        assert_eq!(all, vec![("a".into(), 2)]);
    }

    #[tokio::test]
    async fn test_list_all_sorted_descending() {
        let store = UsageStore::in_memory().unwrap();

        for _ in 0..5 {
            store.increment("popular").await.unwrap();
        }
        for _ in 0..2 {
            store.increment("middling").await.unwrap();
        }
        store.increment("rare").await.unwrap();

        let all = store.list_all().await.unwrap();
        let counts: Vec<i64> = all.iter().map(|(_, n)| *n).collect();
        assert_eq!(counts, vec![5, 2, 1]);
    }

    #[tokio::test]
    async fn test_ties_both_present_in_any_order() {
        let store = UsageStore::in_memory().unwrap();

        store.increment("x").await.unwrap();
        store.increment("y").await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|(c, n)| c == "x" && *n == 1));
        assert!(all.iter().any(|(c, n)| c == "y" && *n == 1));
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let store = UsageStore::in_memory().unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_counts_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.db");

        {
            let store = UsageStore::open(&path).unwrap();
            store.increment("boom").await.unwrap();
            store.increment("boom").await.unwrap();
        }

        let store = UsageStore::open(&path).unwrap();
        let all = store.list_all().await.unwrap();
        assert_eq!(all, vec![("boom".into(), 2)]);
    }

    #[tokio::test]
    async fn test_concurrent_increments_lose_nothing() {
        let store = UsageStore::in_memory().unwrap();

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.increment("boom").await })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let all = store.list_all().await.unwrap();
        assert_eq!(all, vec![("boom".into(), 20)]);
    }
}
