use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use ditdah::catalog::build_catalog;
use ditdah::morse;
use ditdah::session::quiz::QuizSession;

fn bench_build_catalog(c: &mut Criterion) {
    c.bench_function("build_catalog (seeded)", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(black_box(7));
            build_catalog(&mut rng)
        })
    });
}

fn bench_encode_words(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(7);
    let catalog = build_catalog(&mut rng);
    let challenges: Vec<&str> = catalog
        .iter()
        .flat_map(|level| level.challenges.iter().map(String::as_str))
        .collect();

    c.bench_function("encode every catalog challenge", |b| {
        b.iter(|| {
            challenges
                .iter()
                .map(|c| morse::encode(black_box(c)).len())
                .sum::<usize>()
        })
    });
}

fn bench_quiz_pass(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(7);
    let catalog = build_catalog(&mut rng);
    let level = catalog.get(catalog.len() - 1).cloned().unwrap_or_else(|| {
        ditdah::catalog::Level::new("empty", Vec::new())
    });

    c.bench_function("answer a full level", |b| {
        b.iter(|| {
            let now = std::time::Instant::now();
            let mut quiz = QuizSession::for_level(0, &level, now);
            while quiz.challenge().is_some() {
                for symbol in morse::symbol::parse_symbols(quiz.expected()) {
                    quiz.push_symbol(symbol, now);
                }
                quiz.submit();
                quiz.next(now);
            }
            black_box(quiz.summary().correct)
        })
    });
}

criterion_group!(benches, bench_build_catalog, bench_encode_words, bench_quiz_pass);
criterion_main!(benches);
