use chrono::{Duration, TimeZone, Utc};
use context_memory::{
    render_summary_prompt_at, AiResult, AppliedFile, ConversationState, MemoryConfig,
    TRUNCATION_NOTICE,
};
use proptest::prelude::*;

fn turn() -> impl Strategy<Value = (String, Option<AiResult>)> {
    let request = "[a-zA-Z ]{0,300}";
    let result = proptest::option::of(
        (
            proptest::collection::vec(("[a-z]{1,8}", any::<bool>()), 0..6),
            proptest::collection::vec("[a-z-]{2,10}", 0..3),
            proptest::option::of("[a-zA-Z ]{0,120}"),
        )
            .prop_map(|(files, packages, action_summary)| AiResult {
                action_summary,
                applied_files: files
                    .into_iter()
                    .map(|(name, created)| {
                        let path = format!("src/{name}.jsx");
                        if created {
                            AppliedFile::created(path).with_component(name)
                        } else {
                            AppliedFile::modified(path)
                        }
                    })
                    .collect(),
                packages_added: packages,
                ..Default::default()
            }),
    );
    (request, result)
}

proptest! {
    #[test]
    fn log_never_exceeds_threshold_and_counts_never_shrink(turns in proptest::collection::vec(turn(), 1..40)) {
        let config = MemoryConfig::default();
        let mut state = ConversationState::new();
        let mut expected_interactions = 0u64;
        let mut previous = (0u64, 0usize, 0usize, 0usize, 0usize);

        for (request, result) in &turns {
            state.append(request, result.as_ref(), &config);
            if result.is_some() {
                expected_interactions += 1;
            }
            prop_assert!(state.messages.len() <= config.max_messages);

            let summary = &state.summary;
            let current = (
                summary.total_interactions,
                summary.files_created.len(),
                summary.files_modified.len(),
                summary.components_created.len(),
                summary.packages_added.len(),
            );
            prop_assert!(current.0 >= previous.0);
            prop_assert!(current.1 >= previous.1);
            prop_assert!(current.2 >= previous.2);
            prop_assert!(current.3 >= previous.3);
            prop_assert!(current.4 >= previous.4);
            previous = current;
        }
        prop_assert_eq!(state.summary.total_interactions, expected_interactions);
    }

    #[test]
    fn digest_length_is_bounded(turns in proptest::collection::vec(turn(), 0..30), topic in "[a-z ]{0,3000}") {
        let config = MemoryConfig::default();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut state = ConversationState::started_at(start);
        for (i, (request, result)) in turns.iter().enumerate() {
            state.append_at(start + Duration::minutes(i as i64), request, result.as_ref(), &config);
        }
        state.set_topic(topic);

        let text = render_summary_prompt_at(&state, start + Duration::days(3), &config);
        prop_assert!(
            text.chars().count() <= config.summary_max_chars + TRUNCATION_NOTICE.chars().count()
        );
    }
}

#[test]
fn twenty_five_single_messages_stay_within_window() {
    let config = MemoryConfig::default();
    let mut state = ConversationState::new();
    for i in 0..25 {
        state.append(&format!("message {i}"), None, &config);
        if i == 20 {
            // 21st message triggers the cut
            assert_eq!(state.messages.len(), 15);
        }
        assert!(state.messages.len() <= config.max_messages);
    }
    assert_eq!(state.messages.last().map(|m| m.content.as_str()), Some("message 24"));
}

#[test]
fn state_round_trips_through_json() {
    let config = MemoryConfig::default();
    let mut state = ConversationState::new();
    state.append("Add a footer", Some(&AiResult::default()), &config);
    let raw = serde_json::to_string(&state).unwrap();
    let restored = ConversationState::from_json_str(&raw).unwrap();
    assert_eq!(restored, state);
}
