use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qr_age_verify::fields::extract_facts;
use qr_age_verify::payload::{decode_decimal, sniff, split_payload};
use qr_age_verify::synth::SyntheticPayload;
use qr_age_verify::{PipelineConfig, RawPayload, Verifier};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

fn bench_decimal_decode(c: &mut Criterion) {
    let digits = SyntheticPayload::compressed(1990).to_bytes().unwrap();
    c.bench_function("decode_decimal_compressed_card", |b| {
        b.iter(|| decode_decimal(black_box(&digits)))
    });
}

fn bench_parse_legacy(c: &mut Criterion) {
    let dob = NaiveDate::from_ymd_opt(1995, 3, 10).unwrap();
    let bytes = SyntheticPayload::legacy(dob).to_bytes().unwrap();
    c.bench_function("parse_legacy_payload", |b| {
        b.iter(|| {
            let sniffed = sniff(black_box(&bytes), 64);
            let table = split_payload(&sniffed, 64 * 1024).unwrap();
            extract_facts(&table, sniffed.format).unwrap()
        })
    });
}

fn bench_parse_compressed(c: &mut Criterion) {
    let bytes = SyntheticPayload::compressed(1990).to_bytes().unwrap();
    c.bench_function("parse_compressed_payload", |b| {
        b.iter(|| {
            let sniffed = sniff(black_box(&bytes), 64);
            let table = split_payload(&sniffed, 64 * 1024).unwrap();
            extract_facts(&table, sniffed.format).unwrap()
        })
    });
}

fn bench_verify_payload(c: &mut Criterion) {
    let verifier = Verifier::new().with_config(PipelineConfig::default());
    let payload = RawPayload::from_bytes(SyntheticPayload::compressed(2010).to_bytes().unwrap());
    c.bench_function("verify_payload_compressed", |b| {
        b.iter(|| verifier.verify_payload(black_box(&payload), today()).unwrap())
    });
}

criterion_group!(
    benches,
    bench_decimal_decode,
    bench_parse_legacy,
    bench_parse_compressed,
    bench_verify_payload
);
criterion_main!(benches);
