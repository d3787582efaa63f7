//! # FinP2P EVM Adapter Benchmarks
//!
//! | Subsystem | Path | Target |
//! |-----------|------|--------|
//! | fp-01 Signature Codec | typed-data hash, sign, verify | < 1ms |
//! | fp-02 Leg/Phase | full resolution incl. signature check | < 1ms |
//! | fp-04 Receipt Parser | decode one transaction's logs | < 100us |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fp_01_signature_codec::{fin_id_to_address, sign_hash, verify};
use fp_02_leg_phase::{LegPhaseApi, LegPhaseRequest, LegPhaseService};
use fp_04_receipt_parser::{AdapterEvent, ReceiptDecoder, ReceiptParser};
use fp_tests::fixtures::{asset_term, message, sign_as, usd, Investor, CONTRACT};
use shared_types::{Asset, AssetType, ExecutionContext, PrimaryType, ReleaseType};
use std::time::Duration;

// ============================================================================
// FP-01: Signature Codec
// ============================================================================

fn bench_signature_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("fp-01-signature-codec");
    group.measurement_time(Duration::from_secs(5));

    let seller = Investor::random();
    let buyer = Investor::random();

    for primary_type in [PrimaryType::Selling, PrimaryType::Loan] {
        let msg = message(
            primary_type,
            &buyer.fin_id,
            &seller.fin_id,
            asset_term("bank-us:102:bench", "10"),
            usd("1050.25"),
        );
        let signed = sign_as(&msg, &seller);
        let digest = signed.hash().unwrap();
        let address = fin_id_to_address(&seller.fin_id).unwrap();

        group.bench_with_input(
            BenchmarkId::new("typed_data_hash", primary_type),
            &signed,
            |b, signed| b.iter(|| black_box(signed.hash().unwrap())),
        );
        group.bench_with_input(BenchmarkId::new("sign", primary_type), &digest, |b, digest| {
            b.iter(|| black_box(sign_hash(digest, &seller.key).unwrap()))
        });
        group.bench_with_input(
            BenchmarkId::new("verify", primary_type),
            &signed.signature,
            |b, signature| b.iter(|| black_box(verify(&digest, signature, &address).unwrap())),
        );
    }

    group.finish();
}

// ============================================================================
// FP-02: Leg/Phase Resolution
// ============================================================================

fn bench_leg_phase(c: &mut Criterion) {
    let mut group = c.benchmark_group("fp-02-leg-phase");

    let service = LegPhaseService::default();
    let seller = Investor::random();
    let buyer = Investor::random();
    let msg = message(
        PrimaryType::Selling,
        &buyer.fin_id,
        &seller.fin_id,
        asset_term("bank-us:102:bench", "10"),
        usd("1050.25"),
    );
    let signed = sign_as(&msg, &seller);
    let asset = Asset::new("bank-us:102:bench", AssetType::FinP2P);
    let request = LegPhaseRequest {
        source: seller.fin_id.clone(),
        destination: Some(buyer.fin_id.clone()),
        quantity: "10".to_string(),
        phase: None,
        operation_id: None,
        release_type: ReleaseType::Release,
    };

    group.bench_function("resolve_asset_leg", |b| {
        b.iter(|| black_box(service.resolve_leg_phase(&asset, &signed, &request).unwrap()))
    });

    group.finish();
}

// ============================================================================
// FP-04: Receipt Parsing
// ============================================================================

fn bench_receipt_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("fp-04-receipt-parser");

    let parser = ReceiptParser::for_contract(CONTRACT);
    let from = Investor::random();
    let to = Investor::random();
    let event = AdapterEvent::Transfer {
        asset: Asset::new("bank-us:102:bench", AssetType::FinP2P),
        from: from.fin_id.clone(),
        to: to.fin_id.clone(),
        quantity: "10".to_string(),
        ctx: ExecutionContext::new("plan-bench", 3),
    };
    let tx_hash = [0x11; 32];

    // Foreign logs ahead of the operator event, as token contracts emit them.
    for noise in [0usize, 4, 16] {
        let mut logs = vec![event.to_log([0x22; 20]); noise];
        logs.push(event.to_log(CONTRACT));

        group.throughput(Throughput::Elements(logs.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", noise), &logs, |b, logs| {
            b.iter(|| black_box(parser.parse(&tx_hash, logs, 1_700_000_000).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_signature_codec, bench_leg_phase, bench_receipt_parser);
criterion_main!(benches);
