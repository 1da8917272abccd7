//! Benchmark for condition parsing, evaluation and survey navigation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ohmage_condition::condition::cache::{check_condition, clear_cache};
use ohmage_condition::condition::parser::Condition;
use ohmage_condition::{ResponseValue, Responses, Survey};

const CONDITIONS: [&str; 5] = [
    "q1 == 3",
    "q1 > 2 and q2 != SKIPPED",
    "q1 < 2 or q3 == NOT_DISPLAYED",
    "! (q1 >= 4 and (q2 == 1 or q2 == 2)) and q4",
    "((q1 <= 5) and (q3 != \"none\")) or ! q2",
];

/// Responses covering every prompt referenced in `CONDITIONS`
fn create_responses() -> Responses {
    let mut responses = Responses::new();
    responses.insert("q1".to_string(), ResponseValue::number(3));
    responses.insert("q2".to_string(), ResponseValue::Choices(vec![1.into(), 4.into()]));
    responses.insert("q3".to_string(), ResponseValue::NOT_DISPLAYED);
    responses.insert("q4".to_string(), ResponseValue::text("yes"));
    responses
}

/// Create a survey with a chain of conditional prompts
fn create_test_survey() -> Survey {
    let mut prompts = vec![r#"{"id": "p0", "prompt_type": "number"}"#.to_string()];
    for i in 1..100 {
        prompts.push(format!(
            r#"{{"id": "p{}", "prompt_type": "number", "condition": "p{} >= {} or p0 == 0", "skippable": true}}"#,
            i,
            i - 1,
            i % 7
        ));
    }
    let json = format!(r#"{{"id": "bench", "prompts": [{}]}}"#, prompts.join(","));
    Survey::from_json_str(&json).unwrap()
}

fn benchmark_condition_parsing(c: &mut Criterion) {
    c.bench_function("condition_parsing", |b| {
        b.iter(|| {
            for cond in &CONDITIONS {
                let _ = black_box(Condition::parse(black_box(cond)));
            }
        })
    });
}

fn benchmark_condition_evaluation(c: &mut Criterion) {
    let responses = create_responses();

    c.bench_function("check_condition_cold", |b| {
        b.iter(|| {
            clear_cache();
            for cond in &CONDITIONS {
                let _ = black_box(check_condition(cond, black_box(&responses)));
            }
        })
    });

    c.bench_function("check_condition_cached", |b| {
        // Warm up cache
        for cond in &CONDITIONS {
            let _ = check_condition(cond, &responses);
        }

        b.iter(|| {
            for cond in &CONDITIONS {
                let _ = black_box(check_condition(cond, black_box(&responses)));
            }
        })
    });
}

fn benchmark_survey_navigation(c: &mut Criterion) {
    let survey = create_test_survey();

    c.bench_function("survey_full_walk", |b| {
        b.iter(|| {
            let mut navigator = survey.start();
            let mut answer = 0i64;
            while let Ok(Some(_)) = navigator.next_prompt() {
                answer = (answer + 3) % 10;
                let _ = navigator.answer(ResponseValue::from(answer));
            }
            black_box(navigator.into_responses())
        })
    });
}

criterion_group!(
    benches,
    benchmark_condition_parsing,
    benchmark_condition_evaluation,
    benchmark_survey_navigation
);
criterion_main!(benches);
