use casebook_core::capabilities::Capabilities;
use casebook_core::config::ProjectConfig;
use casebook_core::model::{Corpus, RawCaseRow};
use casebook_search::{IndexCache, RankingEngine};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

const TIERS: [usize; 3] = [100, 1_000, 5_000];

const TOPICS: [&str; 6] = [
    "馬達異音",
    "皮帶斷裂",
    "sensor 無訊號",
    "飛板燒毀",
    "轉速變慢",
    "漏水 洩漏",
];

const CAUSES: [&str; 4] = ["軸承磨損導致異音", "皮帶老化", "無", "光電感應器髒污"];

fn synthetic_corpus(size: usize) -> Corpus {
    Corpus::from_rows((0..size).map(|i| RawCaseRow {
        model: Some(if i % 2 == 0 { "HGT-421" } else { "420單向軸承" }.into()),
        topic: Some(format!("{} #{i}", TOPICS[i % TOPICS.len()]).as_str().into()),
        cause: Some(CAUSES[i % CAUSES.len()].into()),
        resolution: Some("更換料件後測試正常".into()),
        ..RawCaseRow::default()
    }))
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank.tiered");
    let engine = RankingEngine::new(&ProjectConfig::default(), Capabilities::all());

    for size in TIERS {
        let corpus = synthetic_corpus(size);
        group.throughput(Throughput::Elements(size as u64));

        let mut cache = IndexCache::new();
        let _ = cache.get_or_build(&corpus, Capabilities::all());
        group.bench_with_input(BenchmarkId::new("warm", size), &corpus, |b, corpus| {
            b.iter(|| black_box(engine.rank("馬達 聲音 很大", corpus, &mut cache).ranked.len()));
        });

        group.bench_with_input(BenchmarkId::new("cold", size), &corpus, |b, corpus| {
            b.iter(|| {
                let mut cache = IndexCache::new();
                black_box(engine.rank("皮帶 壞掉", corpus, &mut cache).ranked.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rank);
criterion_main!(benches);
