// Signing benchmarks for the transaction pipeline.
//
// Covers body encoding, signing with growing signatory sets, signature
// verification and the SHA-384 transaction hash reported in records.

use bytes::Bytes;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use hashgraph_client::crypto::PrivateKey;
use hashgraph_client::envelope::{TokenMintBody, TransactionBody, TransactionData};
use hashgraph_client::identity::{Address, TxIdClock};
use hashgraph_client::signing::{gather_signatories, SignedTransaction};
use hashgraph_client::{Context, Signatory};

fn sample_body() -> TransactionBody {
    let payer = Address::new(0, 0, 2);
    TransactionBody {
        tx_id: TxIdClock::new().next(payer),
        node: Address::new(0, 0, 3),
        max_fee: 100_000_000,
        valid_duration_secs: 120,
        memo: "bench mint".into(),
        data: TransactionData::TokenMint(TokenMintBody {
            token: Address::new(0, 0, 5005),
            amount: 1_000,
        }),
    }
}

fn keys(count: u8) -> Vec<Signatory> {
    (1..=count)
        .map(|seed| Signatory::from(PrivateKey::from_bytes(&[seed; 32])))
        .collect()
}

fn bench_encode_body(c: &mut Criterion) {
    let body = sample_body();
    c.bench_function("envelope/encode_body", |b| {
        b.iter(|| body.to_bytes().unwrap());
    });
}

fn bench_sign_with_signatories(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let body = sample_body();
    let body_bytes = Bytes::from(body.to_bytes().unwrap());
    let mut group = c.benchmark_group("signing/signatory_set");

    for count in [1u8, 3, 7] {
        let ctx = Context {
            signatory: Some(Signatory::list(keys(count))),
            ..Context::default()
        };
        let set = gather_signatories(&ctx, None);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &set, |b, set| {
            b.iter(|| {
                runtime
                    .block_on(set.sign(body.tx_id, &body.memo, body_bytes.clone()))
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_verify_and_hash(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let body = sample_body();
    let body_bytes = Bytes::from(body.to_bytes().unwrap());
    let ctx = Context {
        signatory: Some(Signatory::list(keys(3))),
        ..Context::default()
    };
    let signatures = runtime
        .block_on(gather_signatories(&ctx, None).sign(body.tx_id, &body.memo, body_bytes.clone()))
        .unwrap();
    let signed = SignedTransaction {
        body_bytes,
        signatures,
    };

    c.bench_function("signing/verify_signatures", |b| {
        b.iter(|| assert!(signed.verify_signatures()));
    });
    c.bench_function("signing/transaction_hash", |b| {
        b.iter(|| signed.hash().unwrap());
    });
}

criterion_group!(
    benches,
    bench_encode_body,
    bench_sign_with_signatories,
    bench_verify_and_hash
);
criterion_main!(benches);
