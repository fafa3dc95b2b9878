// Property: purge outcomes account for every unit of work
//
// - With purging enabled, every URL allowed and every provider call
//   succeeding, there is exactly one outcome per URL and one provider call
//   per distinct host
// - With purging disabled there is exactly one outcome, whatever the input
// - The allow-list filter never lets a disallowed host through and is idempotent

mod common;

use cdn_purge::host::normalized_host;
use cdn_purge::models::DISABLED_MESSAGE;
use cdn_purge::{DomainAllowList, PurgeManager};
use common::{enabled_config, RecordingProvider};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::runtime::Runtime;

const ALLOWED_HOSTS: &[&str] = &["a.com", "b.com", "example.com", "www.example.com"];
const ALL_HOSTS: &[&str] = &["a.com", "b.com", "example.com", "www.example.com", "evil.com", "c.org"];

fn allowed_url() -> impl Strategy<Value = String> {
    (
        prop::sample::select(ALLOWED_HOSTS),
        prop::sample::select(vec!["http", "https"]),
        "[a-z0-9]{1,8}",
    )
        .prop_map(|(host, scheme, path)| format!("{}://{}/{}", scheme, host, path))
}

fn any_url() -> impl Strategy<Value = String> {
    prop_oneof![
        (prop::sample::select(ALL_HOSTS), "[a-z0-9]{0,8}")
            .prop_map(|(host, path)| format!("https://{}/{}", host, path)),
        prop::sample::select(ALL_HOSTS).prop_map(|host| host.to_string()),
        "[ -~]{0,20}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_one_outcome_per_url(urls in prop::collection::vec(allowed_url(), 0..40)) {
        let rt = Runtime::new().unwrap();

        let result: Result<(), TestCaseError> = rt.block_on(async {
            let provider = Arc::new(RecordingProvider::new());
            let manager = PurgeManager::new(Arc::new(enabled_config()), provider.clone());

            let outcomes = manager.purge_pages(urls.clone()).await;

            prop_assert_eq!(outcomes.len(), urls.len());
            prop_assert!(outcomes.iter().all(|o| o.succeeded));

            let distinct_hosts: HashSet<String> =
                urls.iter().map(|u| cdn_purge::host::extract_host(u)).collect();
            prop_assert_eq!(provider.purge_calls().len(), distinct_hosts.len());

            Ok(())
        });

        result?;
    }

    #[test]
    fn prop_disabled_yields_single_outcome(urls in prop::collection::vec(any_url(), 1..60)) {
        let rt = Runtime::new().unwrap();

        let result: Result<(), TestCaseError> = rt.block_on(async {
            let provider = Arc::new(RecordingProvider::new());
            let mut config = enabled_config();
            config.purge_enabled = false;
            let manager = PurgeManager::new(Arc::new(config), provider.clone());

            let outcomes = manager.purge_pages(urls).await;

            prop_assert_eq!(outcomes.len(), 1);
            prop_assert!(!outcomes[0].succeeded);
            prop_assert_eq!(outcomes[0].message.as_str(), DISABLED_MESSAGE);
            prop_assert!(provider.purge_calls().is_empty());

            Ok(())
        });

        result?;
    }

    #[test]
    fn prop_filter_only_allowed_and_idempotent(urls in prop::collection::vec(any_url(), 0..40)) {
        let list = DomainAllowList::new(ALLOWED_HOSTS);

        let once = list.filter_to_allowed_domains(urls.clone());
        let twice = list.filter_to_allowed_domains(once.clone());

        prop_assert_eq!(&once, &twice);
        for url in &once {
            let host = normalized_host(url);
            prop_assert!(ALLOWED_HOSTS.contains(&host.as_str()), "host {} leaked through", host);
        }

        // Order preserved: `once` is a subsequence of the input
        let mut input = urls.iter();
        for url in &once {
            prop_assert!(input.any(|u| u == url));
        }
    }

    #[test]
    fn prop_never_purges_disallowed_host(urls in prop::collection::vec(any_url(), 0..30)) {
        let rt = Runtime::new().unwrap();

        let result: Result<(), TestCaseError> = rt.block_on(async {
            let provider = Arc::new(RecordingProvider::new());
            let manager = PurgeManager::new(Arc::new(enabled_config()), provider.clone());

            manager.purge_pages(urls).await;

            for (_, request) in provider.purge_calls() {
                if let cdn_purge::PurgeRequest::Files(files) = request {
                    for file in files {
                        let host = normalized_host(&file);
                        prop_assert!(ALLOWED_HOSTS.contains(&host.as_str()));
                    }
                }
            }

            Ok(())
        });

        result?;
    }
}
