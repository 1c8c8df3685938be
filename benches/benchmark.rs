use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hybrid_book_recommender::{
    Book, Corpus, ItemQuery, Loan, PreferenceProfile, Recommender, RecommenderConfig, RelevanceMode, SeededRandom,
    SelectionMode, UserQuery,
};

const GENRES: [&str; 6] = ["romance", "horror", "fantasy_scifi", "mystery_thriller", "self_improvement", "comics"];
const LANGUAGES: [&str; 2] = ["indonesian", "english"];
const COVERS: [&str; 2] = ["paperback", "hardcover"];

fn synthetic_books(count: usize) -> Vec<Book> {
    (0..count)
        .map(|i| Book {
            id: format!("B{i:05}"),
            title: format!("Book {i}"),
            author: format!("Author {}", i % 97),
            genre: format!("{{{},{}}}", GENRES[i % GENRES.len()], GENRES[(i / 7) % GENRES.len()]),
            language: LANGUAGES[i % LANGUAGES.len()].to_string(),
            cover_type: COVERS[(i / 3) % COVERS.len()].to_string(),
            content_type: if i % 5 == 0 { "non_fiction" } else { "fiction" }.to_string(),
            usage: if i % 9 == 0 { "For Sale" } else { "For Rent" }.to_string(),
            themes: None,
        })
        .collect()
}

/// Deterministic pseudo-random loans, readers cluster around a few genres
fn synthetic_loans(books: usize, users: usize, per_user: usize) -> Vec<Loan> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut loans = Vec::with_capacity(users * per_user);
    for u in 0..users {
        for _ in 0..per_user {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let book = (u * 31 + (state as usize % 40)) % books;
            loans.push(Loan::new(format!("U{u:04}"), format!("B{book:05}")));
        }
    }
    loans
}

fn synthetic_profiles(count: usize) -> Vec<PreferenceProfile> {
    (0..count)
        .map(|i| PreferenceProfile {
            id: format!("R{i:04}"),
            preferred_language: LANGUAGES[i % LANGUAGES.len()].to_string(),
            favorite_genres: vec![GENRES[i % GENRES.len()].to_string(), GENRES[(i + 2) % GENRES.len()].to_string()],
            preferred_formats: vec![COVERS[i % COVERS.len()].to_string()],
            ..Default::default()
        })
        .collect()
}

fn recommender_benchmark(c: &mut Criterion) {
    let books = synthetic_books(800);
    let loans = synthetic_loans(800, 400, 12);
    let profiles = synthetic_profiles(200);

    c.bench_function("build_corpus", |b| {
        b.iter(|| Corpus::build(books.clone(), &loans, profiles.clone()));
    });

    let corpus = Corpus::build(books.clone(), &loans, profiles.clone());
    let rec = Recommender::new(corpus, RecommenderConfig::default())
        .expect("default config is valid")
        .with_random(SeededRandom::new(7));

    let deterministic = ItemQuery::new("B00042", 10);
    c.bench_function("recommend_by_item", |b| {
        b.iter(|| rec.recommend_by_item(black_box(&deterministic)));
    });

    let hybrid = ItemQuery::new("B00042", 10).mode(SelectionMode::Hybrid);
    c.bench_function("recommend_by_item_hybrid", |b| {
        b.iter(|| rec.recommend_by_item(black_box(&hybrid)));
    });

    let user = UserQuery::Id("R0007".into());
    c.bench_function("recommend_by_user", |b| {
        b.iter(|| rec.recommend_by_user(black_box(&user), 10));
    });

    c.bench_function("evaluate", |b| {
        b.iter(|| rec.evaluate(5, RelevanceMode::GenreOrLanguage, Some(&[0.3][..])));
    });
}

criterion_group!(benches, recommender_benchmark);
criterion_main!(benches);
