use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pathfinder_core::model::{Question, Quiz, Section};
use pathfinder_core::tracker::QuizTracker;

fn make_quiz(sections: usize, per_section: usize) -> Quiz {
    let mut next_id = 0u32;
    Quiz {
        id: "bench".into(),
        title: "Bench".into(),
        description: String::new(),
        sections: (0..sections)
            .map(|s| Section {
                id: format!("section-{s}"),
                title: format!("Section {s}"),
                description: String::new(),
                questions: (0..per_section)
                    .map(|_| {
                        next_id += 1;
                        Question::multiple_choice(
                            next_id,
                            format!("Question {next_id}"),
                            ["a", "b", "c", "d", "e"],
                        )
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");

    for (sections, per_section) in [(3, 2), (10, 10), (50, 40)] {
        let quiz = make_quiz(sections, per_section);
        group.bench_function(format!("{sections}x{per_section}"), |b| {
            b.iter(|| {
                let mut tracker = QuizTracker::new(quiz.clone()).unwrap();
                while !tracker.is_last() {
                    tracker.select_option(2).unwrap();
                    tracker.advance().unwrap();
                }
                while !tracker.is_first() {
                    tracker.retreat();
                }
                black_box(tracker.cursor())
            })
        });
    }

    group.finish();
}

fn bench_progress(c: &mut Criterion) {
    let mut group = c.benchmark_group("progress");

    for (sections, per_section) in [(3, 2), (50, 40)] {
        let mut tracker = QuizTracker::new(make_quiz(sections, per_section)).unwrap();
        while !tracker.is_last() {
            tracker.select_option(1).unwrap();
            tracker.advance().unwrap();
        }
        group.bench_function(format!("{sections}x{per_section}"), |b| {
            b.iter(|| black_box(&tracker).progress())
        });
        group.bench_function(format!("{sections}x{per_section}/current"), |b| {
            b.iter(|| black_box(&tracker).current_question().number)
        });
    }

    group.finish();
}

criterion_group!(benches, bench_walk, bench_progress);
criterion_main!(benches);
